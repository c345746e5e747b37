//! Glassware 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 자체 실패를 `GlassError`로 매핑한다.
//! "not found"는 제공자 측에서 정상적으로 발생할 수 있는 결과이므로
//! 별도 variant로 구분하며, 호출자가 존재 여부로 분기할 수 있게 한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 디스패치 실패 분류(인증/유효성/외부 서비스/쿼터 가드)와
/// 어댑터 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum GlassError {
    /// 자격증명 누락 또는 만료 — 웹 레이어가 OAuth 진입점으로 리다이렉트
    #[error("인증 필요: {0}")]
    AuthRequired(String),

    /// 필드 유효성 검증 실패 (사용자 입력 결함, 상태 변경 없음)
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 폼 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 외부 서비스(미러 API) 에러 — 제공자 상태를 그대로 노출
    #[error("외부 서비스 에러 ({status}): {message}")]
    External {
        /// HTTP 상태 코드
        status: u16,
        /// 제공자 응답 본문
        message: String,
    },

    /// 쿼터 가드 발동 — 팬아웃이 API 호출 전에 중단됨
    #[error("사용자 {count}명 발견, 쿼터 보호를 위해 전체 전송을 중단합니다")]
    QuotaGuard {
        /// 발견된 자격증명 수
        count: usize,
    },

    /// 리소스를 찾을 수 없음 (제공자 404)
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Contact", "Subscription")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// Rate Limit 초과 (429)
    #[error("요청 한도 초과, {retry_after_secs}초 후 재시도")]
    RateLimit {
        /// 재시도 대기 시간 (초)
        retry_after_secs: u64,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl GlassError {
    /// 재시도 가능한 에러인지 판별
    ///
    /// 네트워크 단절, 429, 503만 재시도 대상이다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GlassError::Network(_)
                | GlassError::RateLimit { .. }
                | GlassError::ServiceUnavailable(_)
        )
    }
}
