//! # glassware-core
//!
//! Glassware 도메인 모델, 포트(trait) 정의, 에러 타입, 그리고
//! 오퍼레이션 디스패처.
//!
//! ## 구조
//!
//! - [`models`] — 미러 API 와이어 포맷 구조체 (serde Serialize/Deserialize)
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`dispatch`] — 오퍼레이션 → API 호출 시퀀스 변환 + 렌더 준비
//! - [`config`] — 애플리케이션 설정 구조체

pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod ports;
