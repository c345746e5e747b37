//! # glassware-storage
//!
//! 자격증명 저장소 어댑터.
//! `CredentialStore` 포트를 SQLite(rusqlite)로 구현한다.
//! 디스패처는 읽기만 하고, 쓰기는 OAuth 콜백/signout 경로에서만 일어난다.

pub mod migration;
pub mod sqlite;
