//! 자격증명별 클라이언트 팩토리.
//!
//! reqwest 클라이언트(커넥션 풀)는 하나만 만들어 공유하고,
//! 자격증명마다 스코프된 `HttpMirrorClient`를 찍어낸다.

use std::sync::Arc;
use std::time::Duration;

use glassware_core::error::GlassError;
use glassware_core::models::credential::Credential;
use glassware_core::ports::timeline_service::{TimelineService, TimelineServiceFactory};

use crate::client::HttpMirrorClient;

/// `TimelineServiceFactory` 포트 구현
pub struct HttpMirrorFactory {
    client: reqwest::Client,
    endpoint: String,
    max_retries: u32,
}

impl HttpMirrorFactory {
    /// 새 팩토리 생성
    ///
    /// 타임아웃은 여기서 reqwest 클라이언트에 들어가므로 이후 생성되는
    /// 모든 호출에 적용된다.
    pub fn new(endpoint: &str, timeout: Duration, max_retries: u32) -> Result<Self, GlassError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GlassError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            max_retries,
        })
    }
}

impl TimelineServiceFactory for HttpMirrorFactory {
    fn client_for(&self, credential: &Credential) -> Arc<dyn TimelineService> {
        Arc::new(
            HttpMirrorClient::with_client(self.client.clone(), &self.endpoint, credential)
                .with_max_retries(self.max_retries),
        )
    }
}
