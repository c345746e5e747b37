//! 구독 모델.
//!
//! 컬렉션(timeline/location) 변경 푸시 알림 등록. 존재 여부는 렌더마다
//! `listSubscriptions`로 새로 조회한다 — 외부에서 상태가 바뀔 수 있으므로
//! 요청 간 캐시는 금지.

use serde::{Deserialize, Serialize};

/// 구독 대상 컬렉션
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// 타임라인 변경
    Timeline,
    /// 위치 변경
    Location,
}

impl Collection {
    /// 폼 필드 원문에서 파싱
    ///
    /// 원본 샘플은 location 구독 폼에 "locations"를 넣는 오타가 있어
    /// 복수형도 허용한다.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "timeline" => Some(Self::Timeline),
            "location" | "locations" => Some(Self::Location),
            _ => None,
        }
    }

    /// 와이어/구독 ID 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeline => "timeline",
            Self::Location => "location",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 구독 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// 구독 ID — 미러 API는 컬렉션명을 그대로 ID로 쓴다
    pub id: String,
    /// 구독 대상 컬렉션
    pub collection: Collection,
    /// 알림 콜백에서 사용자를 식별할 토큰
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    /// 알림을 수신할 콜백 URL
    pub callback_url: String,
}

/// 구독 목록을 UI 상태 불리언 두 개로 환원한 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionFlags {
    /// timeline 컬렉션 구독 존재 여부
    pub timeline_subscribed: bool,
    /// location 컬렉션 구독 존재 여부
    pub location_subscribed: bool,
}

/// 구독 목록 환원 — 순수 함수, 부수효과 없음
///
/// ID "timeline"/"location"을 스캔한다. 그 외 ID는 무시.
pub fn subscription_flags(subscriptions: &[Subscription]) -> SubscriptionFlags {
    let mut flags = SubscriptionFlags::default();
    for sub in subscriptions {
        match sub.id.as_str() {
            "timeline" => flags.timeline_subscribed = true,
            "location" => flags.location_subscribed = true,
            _ => {}
        }
    }
    flags
}
