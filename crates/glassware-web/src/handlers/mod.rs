//! HTTP 핸들러.

pub mod notify;
pub mod page;
