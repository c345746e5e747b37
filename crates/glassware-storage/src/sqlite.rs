//! SQLite 자격증명 저장소 어댑터.
//!
//! `CredentialStore` 포트 구현. 포트는 읽기 전용이고, 쓰기(OAuth 콜백이
//! 토큰을 저장할 때)는 이 타입의 고유 메서드로만 노출한다.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use glassware_core::error::GlassError;
use glassware_core::models::credential::{Credential, StoredCredential, UserId};
use glassware_core::ports::credential_store::CredentialStore;

use crate::migration;

/// SQLite 자격증명 저장소 — `CredentialStore` 포트 구현
pub struct SqliteCredentialStore {
    conn: Mutex<Connection>,
}

impl SqliteCredentialStore {
    /// 파일 기반 저장소 생성
    pub fn open(path: &Path) -> Result<Self, GlassError> {
        let conn = Connection::open(path)
            .map_err(|e| GlassError::Internal(format!("SQLite 열기 실패: {e}")))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            ",
        )
        .map_err(|e| GlassError::Internal(format!("PRAGMA 설정 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| GlassError::Internal(format!("마이그레이션 실패: {e}")))?;

        info!("자격증명 저장소 초기화: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 인메모리 저장소 생성 (테스트용)
    pub fn open_in_memory() -> Result<Self, GlassError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| GlassError::Internal(format!("인메모리 SQLite 생성 실패: {e}")))?;

        migration::run_migrations(&conn)
            .map_err(|e| GlassError::Internal(format!("마이그레이션 실패: {e}")))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// 자격증명 저장/갱신 — OAuth 콜백 협력자가 호출
    pub fn upsert(&self, user_id: &UserId, credential: &Credential) -> Result<(), GlassError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO credentials (user_id, credential, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                credential = excluded.credential,
                updated_at = excluded.updated_at",
            params![
                user_id.as_str(),
                credential.access_token,
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| GlassError::Internal(format!("자격증명 저장 실패: {e}")))?;
        debug!("자격증명 저장: {user_id}");
        Ok(())
    }

    /// 자격증명 삭제 (signout)
    pub fn remove(&self, user_id: &UserId) -> Result<(), GlassError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM credentials WHERE user_id = ?1",
            params![user_id.as_str()],
        )
        .map_err(|e| GlassError::Internal(format!("자격증명 삭제 실패: {e}")))?;
        debug!("자격증명 삭제: {user_id}");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, GlassError> {
        self.conn
            .lock()
            .map_err(|_| GlassError::Internal("저장소 락 오염".to_string()))
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Credential>, GlassError> {
        let conn = self.lock()?;
        let token: Option<String> = conn
            .query_row(
                "SELECT credential FROM credentials WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| GlassError::Internal(format!("자격증명 조회 실패: {e}")))?;
        Ok(token.map(Credential::new))
    }

    async fn list(&self) -> Result<Vec<StoredCredential>, GlassError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT user_id, credential FROM credentials ORDER BY user_id")
            .map_err(|e| GlassError::Internal(format!("자격증명 목록 조회 실패: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                let user_id: String = row.get(0)?;
                let token: String = row.get(1)?;
                Ok(StoredCredential {
                    user_id: UserId::new(user_id),
                    credential: Credential::new(token),
                })
            })
            .map_err(|e| GlassError::Internal(format!("자격증명 목록 조회 실패: {e}")))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| GlassError::Internal(format!("자격증명 행 변환 실패: {e}")))
    }
}
