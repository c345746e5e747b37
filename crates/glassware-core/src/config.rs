//! 애플리케이션 설정.
//!
//! JSON 설정 파일로 저장/로드한다. 파일이 없으면 기본 설정을 생성해
//! 저장한 뒤 반환한다.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::GlassError;

/// 전체 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 이 서비스의 외부 공개 base URL — 콜백/정적 이미지 URL 유도에 사용
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 미러 API 클라이언트 설정
    #[serde(default)]
    pub mirror: MirrorConfig,
    /// OAuth 진입점 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 웹 서버 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 자격증명 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mirror: MirrorConfig::default(),
            auth: AuthConfig::default(),
            web: WebConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// 설정 파일 로드, 없으면 기본값 생성 후 저장
    pub fn load_or_init(path: &Path) -> Result<Self, GlassError> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: AppConfig = serde_json::from_str(&contents)
                .map_err(|e| GlassError::Config(format!("설정 파싱 실패: {}: {e}", path.display())))?;
            return Ok(config);
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config)?;
        fs::write(path, json)?;
        info!("기본 설정 파일 생성: {}", path.display());
        Ok(config)
    }
}

/// 미러 API 클라이언트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// 미러 API 엔드포인트
    #[serde(default = "default_mirror_endpoint")]
    pub endpoint: String,
    /// 호출별 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 재시도 가능 에러의 최대 재시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_mirror_endpoint(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// OAuth 진입점 설정
///
/// 토큰 교환 자체는 외부 협력자의 몫이다. 여기서는 미인증 사용자를
/// 보낼 URL만 안다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 재인증 리다이렉트 대상 URL
    #[serde(default = "default_auth_entry_url")]
    pub entry_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            entry_url: default_auth_entry_url(),
        }
    }
}

/// 웹 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 활성화 여부
    #[serde(default = "default_web_enabled")]
    pub enabled: bool,
    /// 웹 서버 포트 (기본: 8080)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: default_web_enabled(),
            port: default_web_port(),
            allow_external: false,
        }
    }
}

/// 자격증명 저장소 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 경로 (None이면 플랫폼 기본 데이터 디렉토리)
    #[serde(default)]
    pub db_path: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_mirror_endpoint() -> String {
    "https://www.googleapis.com/mirror/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_auth_entry_url() -> String {
    "http://localhost:8080/oauth2callback".to_string()
}

fn default_web_enabled() -> bool {
    true
}

fn default_web_port() -> u16 {
    8080
}
