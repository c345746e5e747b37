//! 오퍼레이션 디스패처.
//!
//! 폼에서 전달된 오퍼레이션 이름을 미러 API 호출 시퀀스로 변환한다.
//! 자격증명 스코핑, 입력 유효성 검증, 팬아웃 쿼터 가드가 여기 모인다.
//! 디스패치 후 렌더에 필요한 읽기(최근 타임라인, 연락처, 구독 목록)도
//! 이 모듈의 post-step으로 제공한다.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::GlassError;
use crate::models::contact::{Contact, WELL_KNOWN_CONTACT_ID};
use crate::models::credential::UserId;
use crate::models::subscription::{subscription_flags, Collection, SubscriptionFlags};
use crate::models::timeline::{Attachment, MenuAction, MenuItem, TimelineItem};
use crate::ports::attachment_fetcher::AttachmentFetcher;
use crate::ports::credential_store::CredentialStore;
use crate::ports::timeline_service::{TimelineService, TimelineServiceFactory};

/// 전체 사용자 팬아웃 가드 임계값
///
/// 이 수를 넘으면 API 호출을 하나도 보내지 않고 중단한다.
pub const FANOUT_LIMIT: usize = 10;

/// 렌더 시 조회할 최근 타임라인 아이템 수
pub const TIMELINE_RENDER_COUNT: u32 = 3;

// insertItemWithAction 고정 카드
const LUNCH_CARD_TEXT: &str = "What did you have for lunch?";
const LUNCH_CARD_SPEAKABLE: &str = "What did you eat? Bacon?";
const CUSTOM_MENU_ID: &str = "safe-for-later";
const CUSTOM_MENU_LABEL: &str = "Drill Into";

// insertTimelineAllUsers 고정 카드
const BROADCAST_TEXT: &str = "Did you know cats have 167 bones in their tails? Mee-wow!";

/// 폼이 선택할 수 있는 오퍼레이션 — 닫힌 enum
///
/// 원본 샘플은 raw 문자열 switch로 처리했지만, 여기서는 알 수 없는
/// 이름을 파싱 단계에서 명시적으로 걸러낸다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// 사용자 텍스트(+선택 첨부) 카드 삽입
    InsertItem,
    /// 메뉴 액션이 달린 고정 카드 삽입
    InsertItemWithAction,
    /// 알려진 전체 사용자에게 고정 카드 팬아웃
    InsertTimelineAllUsers,
    /// 컬렉션 구독 등록
    InsertSubscription,
    /// 구독 해제
    DeleteSubscription,
    /// 잘 알려진 연락처 삽입
    InsertContact,
    /// 연락처 삭제
    DeleteContact,
}

impl Operation {
    /// 폼 필드 원문에서 파싱. 알 수 없는 이름은 `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "insertItem" => Some(Self::InsertItem),
            "insertItemWithAction" => Some(Self::InsertItemWithAction),
            "insertTimelineAllUsers" => Some(Self::InsertTimelineAllUsers),
            "insertSubscription" => Some(Self::InsertSubscription),
            "deleteSubscription" => Some(Self::DeleteSubscription),
            "insertContact" => Some(Self::InsertContact),
            "deleteContact" => Some(Self::DeleteContact),
            _ => None,
        }
    }
}

/// 디스패치 후 페이지 렌더에 필요한 읽기 전용 상태
#[derive(Debug, Clone)]
pub struct RenderData {
    /// 최근 타임라인 아이템 (최대 3개)
    pub timeline: Vec<TimelineItem>,
    /// 잘 알려진 연락처 — 부재는 정상
    pub contact: Option<Contact>,
    /// 구독 존재 여부 환원 결과
    pub flags: SubscriptionFlags,
}

/// 팬아웃 결과 집계
///
/// 한 사용자의 실패가 나머지 전송을 가리지 않도록 개별 캡처한다.
#[derive(Debug, Default)]
struct FanoutReport {
    sent: usize,
    failed: usize,
}

/// 오퍼레이션 디스패처
///
/// 자격증명 저장소와 타임라인 서비스 팩토리에만 의존하며,
/// 세션 같은 주변 상태는 읽지 않는다 — 사용자는 항상 인자로 받는다.
pub struct Dispatcher {
    store: Arc<dyn CredentialStore>,
    factory: Arc<dyn TimelineServiceFactory>,
    fetcher: Arc<dyn AttachmentFetcher>,
    base_url: String,
    fanout_limit: usize,
}

impl Dispatcher {
    /// 새 디스패처 생성
    pub fn new(
        store: Arc<dyn CredentialStore>,
        factory: Arc<dyn TimelineServiceFactory>,
        fetcher: Arc<dyn AttachmentFetcher>,
        base_url: &str,
    ) -> Self {
        Self {
            store,
            factory,
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            fanout_limit: FANOUT_LIMIT,
        }
    }

    /// 팬아웃 임계값 변경 (테스트용)
    pub fn with_fanout_limit(mut self, limit: usize) -> Self {
        self.fanout_limit = limit;
        self
    }

    /// 폼 원문 오퍼레이션 디스패치
    ///
    /// 알 수 없는 오퍼레이션은 외부 상태를 건드리지 않고 빈 상태
    /// 메시지로 렌더를 진행시킨다 (원본 샘플의 관용적 동작 유지).
    pub async fn dispatch_raw(
        &self,
        operation: &str,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        match Operation::parse(operation) {
            Some(op) => self.dispatch(op, params, user_id).await,
            None => {
                warn!("알 수 없는 오퍼레이션 무시: {operation:?}");
                Ok(String::new())
            }
        }
    }

    /// 오퍼레이션 실행 → 사용자에게 보여줄 상태 메시지
    pub async fn dispatch(
        &self,
        operation: Operation,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        debug!("디스패치: {operation:?}, user={user_id}");
        match operation {
            Operation::InsertItem => self.insert_item(params, user_id).await,
            Operation::InsertItemWithAction => self.insert_item_with_action(user_id).await,
            Operation::InsertTimelineAllUsers => self.insert_timeline_all_users().await,
            Operation::InsertSubscription => self.insert_subscription(params, user_id).await,
            Operation::DeleteSubscription => self.delete_subscription(params, user_id).await,
            Operation::InsertContact => self.insert_contact(params, user_id).await,
            Operation::DeleteContact => self.delete_contact(params, user_id).await,
        }
    }

    /// 디스패치 후 렌더 준비 읽기
    ///
    /// 구독 존재 여부는 파생 상태이므로 요청마다 새로 조회한다.
    /// 연락처 부재는 에러가 아니다.
    pub async fn load_render_data(&self, user_id: &UserId) -> Result<RenderData, GlassError> {
        let client = self.client_for_user(user_id).await?;

        let timeline = client.list_timeline(TIMELINE_RENDER_COUNT).await?;
        let contact = client.get_contact(WELL_KNOWN_CONTACT_ID).await?;
        let subscriptions = client.list_subscriptions().await?;

        Ok(RenderData {
            timeline,
            contact,
            flags: subscription_flags(&subscriptions),
        })
    }

    /// 현재 사용자의 자격증명으로 스코프된 클라이언트
    async fn client_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Arc<dyn TimelineService>, GlassError> {
        let credential = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| GlassError::AuthRequired(format!("자격증명 없음: {user_id}")))?;
        Ok(self.factory.client_for(&credential))
    }

    async fn insert_item(
        &self,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        let message = param(params, "message").ok_or_else(|| GlassError::Validation {
            field: "message".to_string(),
            message: "카드 본문이 비어 있습니다".to_string(),
        })?;

        // 자격증명 확인이 먼저다 — 미인증 사용자 요청으로
        // 외부 페치가 나가면 안 된다.
        let client = self.client_for_user(user_id).await?;

        // imageUrl/contentType은 쌍으로만 의미가 있다.
        // 한쪽만 오면 첨부 없는 것으로 취급한다.
        let attachment = match (param(params, "imageUrl"), param(params, "contentType")) {
            (Some(image_url), Some(content_type)) => {
                let data = self.fetcher.fetch(image_url).await?;
                Some(Attachment {
                    content_type: content_type.to_string(),
                    data,
                })
            }
            _ => None,
        };

        let item = TimelineItem::with_text(message);
        client.insert_item(&item, attachment.as_ref()).await?;

        Ok("타임라인 아이템을 삽입했습니다.".to_string())
    }

    async fn insert_item_with_action(&self, user_id: &UserId) -> Result<String, GlassError> {
        let mut item = TimelineItem::with_text(LUNCH_CARD_TEXT);
        item.speakable_text = Some(LUNCH_CARD_SPEAKABLE.to_string());
        item.menu_items = vec![
            MenuItem::builtin(MenuAction::ReadAloud),
            MenuItem::builtin(MenuAction::Share),
            MenuItem::custom(
                CUSTOM_MENU_ID,
                CUSTOM_MENU_LABEL,
                format!("{}/static/images/drill.png", self.base_url),
            ),
        ];

        let client = self.client_for_user(user_id).await?;
        client.insert_item(&item, None).await?;

        Ok("답장할 수 있는 타임라인 아이템을 삽입했습니다.".to_string())
    }

    /// 전체 사용자 팬아웃
    ///
    /// 쿼터 가드는 API 호출이 하나라도 나가기 전에 평가한다 —
    /// 임계값 초과 시 부분 팬아웃은 존재하지 않는다.
    /// 개별 전송은 독립적이므로 동시에 실행하고, 실패는 사용자 단위로
    /// 캡처해 집계만 보고한다.
    async fn insert_timeline_all_users(&self) -> Result<String, GlassError> {
        let credentials = self.store.list().await?;
        let count = credentials.len();

        if count > self.fanout_limit {
            warn!("팬아웃 중단: 자격증명 {count}개 > 임계값 {}", self.fanout_limit);
            return Err(GlassError::QuotaGuard { count });
        }

        let sends = credentials.into_iter().map(|stored| async move {
            let client = self.factory.client_for(&stored.credential);
            let item = TimelineItem::with_text(BROADCAST_TEXT);
            (stored.user_id, client.insert_item(&item, None).await)
        });

        let mut report = FanoutReport::default();
        for (user_id, result) in futures::future::join_all(sends).await {
            match result {
                Ok(_) => report.sent += 1,
                Err(e) => {
                    warn!("팬아웃 전송 실패: user={user_id}: {e}");
                    report.failed += 1;
                }
            }
        }

        info!("팬아웃 완료: 성공 {}, 실패 {}", report.sent, report.failed);
        if report.failed == 0 {
            Ok(format!("고양이 카드를 {}명에게 전송했습니다.", report.sent))
        } else {
            Ok(format!(
                "고양이 카드 전송: 성공 {}명, 실패 {}명.",
                report.sent, report.failed
            ))
        }
    }

    async fn insert_subscription(
        &self,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        let raw = param(params, "subscriptionId").ok_or_else(|| GlassError::Validation {
            field: "subscriptionId".to_string(),
            message: "구독 컬렉션이 지정되지 않았습니다".to_string(),
        })?;
        let collection = Collection::parse(raw).ok_or_else(|| GlassError::Validation {
            field: "subscriptionId".to_string(),
            message: format!("알 수 없는 컬렉션: {raw}"),
        })?;

        let callback_url = format!("{}/notify", self.base_url);
        let client = self.client_for_user(user_id).await?;
        let subscription = client
            .insert_subscription(collection, user_id.as_str(), &callback_url)
            .await?;

        Ok(format!("구독 등록 완료: {}", subscription.id))
    }

    async fn delete_subscription(
        &self,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        let id = param(params, "subscriptionId").ok_or_else(|| GlassError::Validation {
            field: "subscriptionId".to_string(),
            message: "구독 ID가 지정되지 않았습니다".to_string(),
        })?;

        let client = self.client_for_user(user_id).await?;
        client.delete_subscription(id).await?;

        Ok(format!("구독 해제 완료: {id}"))
    }

    async fn insert_contact(
        &self,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        let id = param(params, "id").ok_or_else(|| GlassError::Validation {
            field: "id".to_string(),
            message: "연락처 ID가 지정되지 않았습니다".to_string(),
        })?;
        let name = param(params, "name").ok_or_else(|| GlassError::Validation {
            field: "name".to_string(),
            message: "연락처 이름이 지정되지 않았습니다".to_string(),
        })?;

        let contact = Contact::with_icon(
            id,
            name,
            format!("{}/static/images/chipotle-tube-640x360.jpg", self.base_url),
        );

        let client = self.client_for_user(user_id).await?;
        client.insert_contact(&contact).await?;

        Ok("연락처를 삽입했습니다. MyGlass에서 활성화하세요.".to_string())
    }

    async fn delete_contact(
        &self,
        params: &HashMap<String, String>,
        user_id: &UserId,
    ) -> Result<String, GlassError> {
        let id = param(params, "id").ok_or_else(|| GlassError::Validation {
            field: "id".to_string(),
            message: "연락처 ID가 지정되지 않았습니다".to_string(),
        })?;

        let client = self.client_for_user(user_id).await?;
        client.delete_contact(id).await?;

        Ok("연락처를 삭제했습니다.".to_string())
    }
}

/// 비어 있지 않은 폼 파라미터 조회 — 빈 문자열은 부재로 취급
fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
