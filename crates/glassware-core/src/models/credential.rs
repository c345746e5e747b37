//! 자격증명 모델.
//!
//! OAuth 콜백(외부 협력자)이 생성하고, 디스패처는 요청마다 읽기만 한다.

use serde::{Deserialize, Serialize};

/// 사용자 식별자
///
/// 세션 전역 상태 대신 명시적으로 전달된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// 문자열에서 생성
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 내부 문자열 참조
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 불투명 bearer 토큰
///
/// 디스패처는 이 값을 해석하지 않고 미러 클라이언트에 그대로 넘긴다.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// 액세스 토큰 원문
    pub access_token: String,
}

impl Credential {
    /// 토큰 문자열에서 생성
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

// 토큰이 로그에 남지 않도록 Debug에서 마스킹한다
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("access_token", &"***").finish()
    }
}

/// 저장소 목록 조회 결과 — 사용자와 자격증명 쌍
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    /// 사용자 ID
    pub user_id: UserId,
    /// 자격증명
    pub credential: Credential,
}
