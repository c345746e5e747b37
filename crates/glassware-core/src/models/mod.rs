//! 도메인 모델.
//!
//! 미러 API 와이어 포맷(camelCase JSON)과 일치하는 serde 구조체들.

pub mod contact;
pub mod credential;
pub mod subscription;
pub mod timeline;
