//! Hexagonal Architecture 포트 인터페이스.
//!
//! 구현: `glassware-mirror` (HTTP 어댑터), `glassware-storage` (SQLite)

pub mod attachment_fetcher;
pub mod credential_store;
pub mod timeline_service;
