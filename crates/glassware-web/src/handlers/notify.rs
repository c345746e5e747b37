//! 구독 알림 콜백 핸들러.
//!
//! 미러 API가 구독된 컬렉션의 변경을 이 엔드포인트로 푸시한다.
//! 처리 자체는 로그가 전부다 — 제공자는 빠른 200을 기대한다.

use axum::http::StatusCode;
use tracing::info;

use crate::error::ApiError;

/// POST /notify — 구독 핑 수신
pub async fn notify(body: String) -> Result<StatusCode, ApiError> {
    let ping: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| ApiError::BadRequest(format!("알림 페이로드 파싱 실패: {e}")))?;

    info!(
        "구독 알림 수신: collection={}, userToken={}",
        ping.get("collection").and_then(|v| v.as_str()).unwrap_or("?"),
        ping.get("userToken").and_then(|v| v.as_str()).unwrap_or("?"),
    );

    Ok(StatusCode::OK)
}
