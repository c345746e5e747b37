//! 공유 연락처 모델.
//!
//! 이 샘플은 잘 알려진 고정 ID의 연락처 하나만 다룬다.
//! 존재 확인은 삽입/삭제 대칭을 위한 read-before-write 가드.

use serde::{Deserialize, Serialize};

/// 샘플이 사용하는 잘 알려진 연락처 ID
pub const WELL_KNOWN_CONTACT_ID: &str = "rust-quick-start";

/// 공유 연락처
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// 연락처 ID
    pub id: String,
    /// 표시 이름
    pub display_name: String,
    /// 아이콘 이미지 URL 목록
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    /// 수신 가능한 MIME 타입 (비어 있으면 전체 허용)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept_types: Vec<String>,
}

impl Contact {
    /// 아이콘 하나, 전체 콘텐츠 타입 허용 연락처 생성
    pub fn with_icon(id: impl Into<String>, display_name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            image_urls: vec![icon_url.into()],
            accept_types: Vec::new(),
        }
    }
}
