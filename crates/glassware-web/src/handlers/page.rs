//! 메인 페이지 핸들러.
//!
//! GET은 렌더만, POST는 폼 오퍼레이션을 디스패치한 뒤 같은 페이지를
//! 다시 렌더한다. 사용자 식별은 `userid` 쿠키로만 한다 — 암묵적
//! 세션 상태는 없다.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, warn};

use glassware_core::dispatch::RenderData;
use glassware_core::error::GlassError;
use glassware_core::models::credential::UserId;

use crate::view;
use crate::AppState;

/// 사용자 식별 쿠키 이름
pub const USER_COOKIE: &str = "userid";

/// 폼 제출 본문
///
/// 모든 필드가 선택적이다 — 어떤 오퍼레이션이 어떤 필드를 요구하는지는
/// 디스패처가 검증한다.
#[derive(Debug, Default, Deserialize)]
pub struct OperationForm {
    /// 실행할 오퍼레이션 이름
    #[serde(default)]
    pub operation: Option<String>,
    /// insertItem 카드 본문
    #[serde(default)]
    pub message: Option<String>,
    /// 첨부 이미지 URL
    #[serde(default, rename = "imageUrl")]
    pub image_url: Option<String>,
    /// 첨부 MIME 타입
    #[serde(default, rename = "contentType")]
    pub content_type: Option<String>,
    /// 연락처 ID
    #[serde(default)]
    pub id: Option<String>,
    /// 연락처 이름
    #[serde(default)]
    pub name: Option<String>,
    /// 구독 컬렉션/ID
    #[serde(default, rename = "subscriptionId")]
    pub subscription_id: Option<String>,
}

impl OperationForm {
    /// 존재하는 필드만 디스패처 파라미터 맵으로 변환
    fn into_params(self) -> HashMap<String, String> {
        let mut params = HashMap::new();
        let fields = [
            ("message", self.message),
            ("imageUrl", self.image_url),
            ("contentType", self.content_type),
            ("id", self.id),
            ("name", self.name),
            ("subscriptionId", self.subscription_id),
        ];
        for (key, value) in fields {
            if let Some(v) = value {
                params.insert(key.to_string(), v);
            }
        }
        params
    }
}

/// Cookie 헤더에서 userid 추출
pub(crate) fn user_from_cookies(headers: &HeaderMap) -> Option<UserId> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, val)) = pair.trim().split_once('=') {
                if key == USER_COOKIE && !val.is_empty() {
                    return Some(UserId::new(val));
                }
            }
        }
    }
    None
}

/// GET / — 현재 상태 렌더
pub async fn show_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(user) = user_from_cookies(&headers) else {
        return Redirect::to(&state.auth_entry_url).into_response();
    };
    render_for(&state, &user, String::new()).await
}

/// POST / — 오퍼레이션 디스패치 후 렌더
pub async fn handle_operation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<OperationForm>,
) -> Response {
    let Some(user) = user_from_cookies(&headers) else {
        return Redirect::to(&state.auth_entry_url).into_response();
    };

    let operation = form.operation.clone().unwrap_or_default();
    let params = form.into_params();

    let message = match state.dispatcher.dispatch_raw(&operation, &params, &user).await {
        Ok(message) => message,
        Err(GlassError::AuthRequired(reason)) => {
            warn!("재인증 필요: {reason}");
            return Redirect::to(&state.auth_entry_url).into_response();
        }
        // 나머지 디스패치 실패는 상태 메시지로 표면화한다 —
        // 폼 페이지는 5xx 대신 같은 페이지를 돌려준다.
        Err(e) => {
            warn!("디스패치 실패: {operation}: {e}");
            e.to_string()
        }
    };

    render_for(&state, &user, message).await
}

/// POST /signout — 쿠키 제거 후 OAuth 진입점으로
pub async fn signout(State(state): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, "userid=; Max-Age=0; Path=/")],
        Redirect::to(&state.auth_entry_url),
    )
        .into_response()
}

/// 렌더 준비 읽기 후 페이지 생성
async fn render_for(state: &AppState, user: &UserId, message: String) -> Response {
    match state.dispatcher.load_render_data(user).await {
        Ok(data) => Html(view::render_page(&state.base_url, &message, &data)).into_response(),
        Err(GlassError::AuthRequired(reason)) => {
            warn!("재인증 필요: {reason}");
            Redirect::to(&state.auth_entry_url).into_response()
        }
        Err(e) => {
            // 읽기 실패 시에도 빈 데이터로 페이지는 띄운다
            error!("렌더 데이터 조회 실패: {e}");
            let data = RenderData {
                timeline: Vec::new(),
                contact: None,
                flags: Default::default(),
            };
            let combined = if message.is_empty() {
                e.to_string()
            } else {
                format!("{message} ({e})")
            };
            Html(view::render_page(&state.base_url, &combined, &data)).into_response()
        }
    }
}
