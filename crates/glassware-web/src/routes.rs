//! 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// 애플리케이션 라우트 생성
pub fn app_routes() -> Router<AppState> {
    Router::new()
        // 메인 페이지 — GET 렌더, POST 오퍼레이션 디스패치
        .route(
            "/",
            get(handlers::page::show_page).post(handlers::page::handle_operation),
        )
        // 구독 알림 콜백
        .route("/notify", post(handlers::notify::notify))
        // 로그아웃
        .route("/signout", post(handlers::page::signout))
        // 헬스체크
        .route("/healthz", get(healthz))
}

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}
