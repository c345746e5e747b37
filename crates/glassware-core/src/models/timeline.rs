//! 타임라인 아이템 모델.
//!
//! 사용자 디바이스에 표시되는 카드 한 장. 삽입 오퍼레이션마다 일시적으로
//! 생성되며 이 코어는 보관하지 않는다.

use serde::{Deserialize, Serialize};

/// 타임라인 아이템 (미러 API 카드)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    /// 서버가 할당한 아이템 ID (삽입 전에는 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 카드 본문 텍스트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// READ_ALOUD 메뉴에서 읽어줄 텍스트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakable_text: Option<String>,
    /// 알림 설정
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationConfig>,
    /// 메뉴 액션 (순서 유지)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub menu_items: Vec<MenuItem>,
    /// 첨부 참조 (조회 응답에만 존재)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<AttachmentRef>,
}

impl TimelineItem {
    /// 본문 텍스트만 있는 카드 생성, 알림 레벨 DEFAULT
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            notification: Some(NotificationConfig::default_level()),
            ..Self::default()
        }
    }
}

/// 알림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 알림 레벨
    pub level: NotificationLevel,
}

impl NotificationConfig {
    /// DEFAULT 레벨 설정 생성
    pub fn default_level() -> Self {
        Self {
            level: NotificationLevel::Default,
        }
    }
}

/// 알림 레벨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    /// 알림 없음
    None,
    /// 기본 알림
    Default,
}

/// 메뉴 아이템
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// 메뉴 액션 종류
    pub action: MenuAction,
    /// CUSTOM 액션 식별자 — 이후 콜백에서 어떤 메뉴였는지 인식할 때 필요
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// CUSTOM 액션 표시값 (순서 유지)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<MenuValue>,
}

impl MenuItem {
    /// 내장 액션 메뉴 생성 (id/values 없음)
    pub fn builtin(action: MenuAction) -> Self {
        Self {
            action,
            id: None,
            values: Vec::new(),
        }
    }

    /// CUSTOM 메뉴 생성
    pub fn custom(id: impl Into<String>, display_name: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            action: MenuAction::Custom,
            id: Some(id.into()),
            values: vec![MenuValue {
                display_name: display_name.into(),
                icon_url: Some(icon_url.into()),
            }],
        }
    }
}

/// 메뉴 액션 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuAction {
    /// 음성으로 읽기
    ReadAloud,
    /// 공유
    Share,
    /// 답장
    Reply,
    /// 삭제
    Delete,
    /// 앱 정의 커스텀 액션
    Custom,
}

/// 메뉴 표시값
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuValue {
    /// 메뉴에 표시되는 이름
    pub display_name: String,
    /// 아이콘 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// 삽입 시 함께 업로드할 첨부 페이로드
#[derive(Clone)]
pub struct Attachment {
    /// MIME 타입 (폼에서 전달된 값 그대로)
    pub content_type: String,
    /// 첨부 바이트
    pub data: Vec<u8>,
}

// 바이트 덤프가 로그를 덮지 않도록 길이만 출력한다
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// 조회 응답의 첨부 참조
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    /// 첨부 ID
    pub id: String,
    /// MIME 타입
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_item_wire_format() {
        let mut item = TimelineItem::with_text("Hello World!");
        item.speakable_text = Some("Hello".to_string());
        item.menu_items = vec![
            MenuItem::builtin(MenuAction::ReadAloud),
            MenuItem::custom("safe-for-later", "Drill Into", "https://example.com/drill.png"),
        ];

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["text"], "Hello World!");
        assert_eq!(json["speakableText"], "Hello");
        assert_eq!(json["notification"]["level"], "DEFAULT");
        assert_eq!(json["menuItems"][0]["action"], "READ_ALOUD");
        assert_eq!(json["menuItems"][1]["action"], "CUSTOM");
        assert_eq!(json["menuItems"][1]["id"], "safe-for-later");
        assert_eq!(json["menuItems"][1]["values"][0]["displayName"], "Drill Into");
        // 삽입 전에는 서버 할당 필드가 직렬화되지 않아야 함
        assert!(json.get("id").is_none());
        assert!(json.get("attachments").is_none());
    }

    #[test]
    fn deserialize_listed_item_with_attachment() {
        let json = r#"{
            "id": "item_1",
            "text": "Chipotle says hi!",
            "attachments": [{"id": "att_1", "contentType": "image/jpeg"}]
        }"#;
        let item: TimelineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_deref(), Some("item_1"));
        assert_eq!(item.attachments.len(), 1);
        assert_eq!(item.attachments[0].content_type.as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn attachment_debug_omits_bytes() {
        let att = Attachment {
            content_type: "image/jpeg".to_string(),
            data: vec![0u8; 1024],
        };
        let debug = format!("{att:?}");
        assert!(debug.contains("1024"));
        assert!(!debug.contains("[0"));
    }
}
