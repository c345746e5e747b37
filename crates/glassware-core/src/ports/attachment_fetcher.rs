//! 첨부 페이로드 페처 포트.
//!
//! `insertItem`의 imageUrl 파라미터를 바이트로 가져온다.
//!
//! 구현: `glassware-mirror` crate (reqwest)

use async_trait::async_trait;

use crate::error::GlassError;

/// URL에서 첨부 바이트를 가져오는 페처
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// URL의 리소스를 읽어 바이트로 반환
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GlassError>;
}
