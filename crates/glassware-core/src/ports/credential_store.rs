//! 자격증명 저장소 포트.
//!
//! 디스패처 관점에서는 읽기 전용이다. 쓰기(OAuth 콜백 시 생성)는
//! 어댑터의 고유 메서드로만 노출한다.
//!
//! 구현: `glassware-storage` crate (rusqlite)

use async_trait::async_trait;

use crate::error::GlassError;
use crate::models::credential::{Credential, StoredCredential, UserId};

/// 자격증명 저장소
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 사용자의 자격증명 조회
    ///
    /// 없으면 `Ok(None)` — 호출자는 재인증 리다이렉트로 분기한다.
    async fn get(&self, user_id: &UserId) -> Result<Option<Credential>, GlassError>;

    /// 알려진 자격증명 전체 목록
    ///
    /// `insertTimelineAllUsers` 팬아웃과 쿼터 가드가 사용한다.
    async fn list(&self) -> Result<Vec<StoredCredential>, GlassError>;
}
