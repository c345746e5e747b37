//! 타임라인 서비스(미러 API) 포트.
//!
//! 인스턴스 하나가 자격증명 하나에 바인딩된다 (capability-scoped).
//!
//! 구현: `glassware-mirror` crate (reqwest)

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::GlassError;
use crate::models::contact::Contact;
use crate::models::credential::Credential;
use crate::models::subscription::{Collection, Subscription};
use crate::models::timeline::{Attachment, TimelineItem};

/// 자격증명 스코프 타임라인 서비스 클라이언트
#[async_trait]
pub trait TimelineService: Send + Sync {
    /// 타임라인 아이템 삽입
    ///
    /// 첨부가 있으면 아이템 생성 후 첨부를 업로드한다.
    /// 서버가 할당한 필드가 채워진 아이템을 반환.
    async fn insert_item(
        &self,
        item: &TimelineItem,
        attachment: Option<&Attachment>,
    ) -> Result<TimelineItem, GlassError>;

    /// 최근 타임라인 아이템 조회
    async fn list_timeline(&self, max_results: u32) -> Result<Vec<TimelineItem>, GlassError>;

    /// 연락처 조회
    ///
    /// 제공자 "not found"는 정상 결과이므로 `Ok(None)`으로 구분해 반환한다.
    /// 그 외 제공자 에러는 그대로 전파.
    async fn get_contact(&self, id: &str) -> Result<Option<Contact>, GlassError>;

    /// 연락처 삽입
    async fn insert_contact(&self, contact: &Contact) -> Result<(), GlassError>;

    /// 연락처 삭제 (멱등)
    async fn delete_contact(&self, id: &str) -> Result<(), GlassError>;

    /// 구독 목록 조회
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, GlassError>;

    /// 구독 등록
    async fn insert_subscription(
        &self,
        collection: Collection,
        user_token: &str,
        callback_url: &str,
    ) -> Result<Subscription, GlassError>;

    /// 구독 해제
    async fn delete_subscription(&self, id: &str) -> Result<(), GlassError>;
}

/// 자격증명별 클라이언트 팩토리
///
/// `insertTimelineAllUsers` 팬아웃이 사용자마다 스코프된 클라이언트를
/// 만들 때 사용한다.
pub trait TimelineServiceFactory: Send + Sync {
    /// 주어진 자격증명에 바인딩된 클라이언트 생성
    fn client_for(&self, credential: &Credential) -> Arc<dyn TimelineService>;
}
