//! # glassware-mirror
//!
//! 미러 API HTTP 어댑터.
//! `TimelineService` / `TimelineServiceFactory` / `AttachmentFetcher`
//! 포트를 reqwest로 구현한다. bearer 인증, 호출별 타임아웃,
//! 읽기 호출 재시도(backoff)를 지원한다.

pub mod attachment;
pub mod client;
pub mod factory;
