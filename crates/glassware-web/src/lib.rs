//! # glassware-web
//!
//! Glassware 웹 표현 레이어.
//! Axum 기반 단일 페이지 폼 UI + 구독 알림 콜백.
//!
//! ## 기능
//! - 메인 페이지 렌더 (타임라인/연락처/구독 상태)
//! - 폼 오퍼레이션 디스패치
//! - 미인증 사용자 OAuth 진입점 리다이렉트
//! - 구독 알림 콜백 수신

pub mod error;
pub mod handlers;
pub mod routes;
pub mod view;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use glassware_core::config::{AppConfig, WebConfig};
use glassware_core::dispatch::Dispatcher;

/// 포트 바인드 최대 시도 횟수
const MAX_PORT_ATTEMPTS: u16 = 10;

/// 웹 서버 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    /// 오퍼레이션 디스패처
    pub dispatcher: Arc<Dispatcher>,
    /// 서비스 외부 공개 base URL
    pub base_url: String,
    /// 미인증 사용자를 보낼 OAuth 진입점
    pub auth_entry_url: String,
}

/// Glassware 웹 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 웹 서버 생성
    pub fn new(dispatcher: Arc<Dispatcher>, config: &AppConfig) -> Self {
        Self {
            config: config.web.clone(),
            state: AppState {
                dispatcher,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                auth_entry_url: config.auth.entry_url.clone(),
            },
        }
    }

    /// 서버 실행
    ///
    /// 기본 포트에서 시작하여, 포트가 이미 사용 중이면 다음 포트를 시도한다.
    /// 최대 10개 포트를 시도한 후 실패하면 에러를 반환한다.
    ///
    /// # Arguments
    /// * `shutdown_rx` - 종료 신호 수신 채널
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };

        let app = Router::new()
            .merge(routes::app_routes())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state);

        let base_port = self.config.port;
        let mut last_error = None;

        for attempt in 0..MAX_PORT_ATTEMPTS {
            let port = base_port.saturating_add(attempt);

            // 포트 오버플로우 체크
            if port < base_port && attempt > 0 {
                break;
            }

            let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
                Ok(a) => a,
                Err(e) => {
                    error!("잘못된 주소 {}:{} — {}", host, port, e);
                    continue;
                }
            };

            match TcpListener::bind(addr).await {
                Ok(listener) => {
                    if attempt > 0 {
                        warn!("포트 {} 사용 불가, 대체 포트 {} 사용", base_port, port);
                    }
                    info!("Glassware 웹 서버 시작: http://{}", addr);

                    let app = app.clone();
                    axum::serve(listener, app)
                        .with_graceful_shutdown(async move {
                            loop {
                                if *shutdown_rx.borrow() {
                                    info!("웹 서버 종료 신호 수신");
                                    break;
                                }
                                if shutdown_rx.changed().await.is_err() {
                                    break;
                                }
                            }
                        })
                        .await?;

                    info!("Glassware 웹 서버 종료");
                    return Ok(());
                }
                Err(e) => {
                    if e.kind() == std::io::ErrorKind::AddrInUse {
                        warn!("포트 {} 이미 사용 중, 다음 포트 시도...", port);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrInUse,
                format!(
                    "포트 {}-{} 모두 사용 불가",
                    base_port,
                    base_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
                ),
            )
        }))
    }

    /// 서버 URL 반환
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.config.port)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WebConfig::default();
        assert_eq!(config.port, 8080);
        assert!(!config.allow_external);
    }

    #[test]
    fn web_server_url() {
        let state = test_support::test_state();
        let server = WebServer {
            config: WebConfig::default(),
            state,
        };
        assert_eq!(server.url(), "http://localhost:8080");
    }

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn max_port_attempts_is_reasonable() {
        // 최소 1번, 최대 100번 사이
        assert!(MAX_PORT_ATTEMPTS >= 1);
        assert!(MAX_PORT_ATTEMPTS <= 100);
    }
}
