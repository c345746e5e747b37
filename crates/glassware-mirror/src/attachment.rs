//! 첨부 페이로드 페처.
//!
//! `AttachmentFetcher` 포트 구현. `insertItem`의 imageUrl을 바이트로
//! 가져온다. 콘텐츠 타입은 폼 파라미터가 결정하므로 응답 헤더는
//! 보지 않는다.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use glassware_core::error::GlassError;
use glassware_core::ports::attachment_fetcher::AttachmentFetcher;

/// HTTP 첨부 페처 — `AttachmentFetcher` 포트 구현
pub struct HttpAttachmentFetcher {
    client: reqwest::Client,
}

impl HttpAttachmentFetcher {
    /// 새 페처 생성
    pub fn new(timeout: Duration) -> Result<Self, GlassError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GlassError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AttachmentFetcher for HttpAttachmentFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GlassError> {
        debug!("첨부 페치: {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GlassError::Network(format!("첨부 페치 실패: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GlassError::External {
                status: status.as_u16(),
                message: format!("첨부 페치 거부: {text}"),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GlassError::Network(format!("첨부 본문 읽기 실패: {e}")))?;
        debug!("첨부 페치 완료: {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
