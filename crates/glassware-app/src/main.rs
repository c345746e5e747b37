//! # glassware-app
//!
//! Glassware 서버 바이너리 진입점.
//! 설정 로드, 어댑터 조립(DI), 웹 서버 라이프사이클 관리.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use glassware_core::config::AppConfig;
use glassware_core::dispatch::Dispatcher;
use glassware_mirror::attachment::HttpAttachmentFetcher;
use glassware_mirror::factory::HttpMirrorFactory;
use glassware_storage::sqlite::SqliteCredentialStore;
use glassware_web::WebServer;

/// Glassware 스타터 서버
///
/// 미러 API 연동 샘플 — 타임라인/연락처/구독 오퍼레이션 디스패처
#[derive(Parser, Debug)]
#[command(name = "glassware")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 웹 서버 포트 (설정 파일보다 우선)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 자격증명 DB 경로 (설정 파일보다 우선)
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

/// 플랫폼별 앱 디렉토리
fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "glassware", "glassware-starter")
        .ok_or_else(|| anyhow!("플랫폼 디렉토리를 결정할 수 없습니다"))
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼 기본 경로)
fn resolve_config_path(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.config {
        return Ok(path.clone());
    }
    Ok(project_dirs()?.config_dir().join("config.json"))
}

/// 자격증명 DB 경로 결정 (CLI 인자 > 설정 파일 > 플랫폼 기본 경로)
fn resolve_db_path(args: &Args, config: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = &args.db_path {
        return Ok(path.clone());
    }
    if let Some(path) = &config.storage.db_path {
        return Ok(PathBuf::from(path));
    }
    let dir = project_dirs()?.data_dir().to_path_buf();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("데이터 디렉토리 생성 실패: {}", dir.display()))?;
    }
    Ok(dir.join("credentials.db"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.clone())),
        )
        .init();

    let config_path = resolve_config_path(&args)?;
    let mut config = AppConfig::load_or_init(&config_path)
        .with_context(|| format!("설정 로드 실패: {}", config_path.display()))?;
    if let Some(port) = args.port {
        config.web.port = port;
    }
    info!(
        "설정 로드: {} (mirror={})",
        config_path.display(),
        config.mirror.endpoint
    );

    if !config.web.enabled {
        warn!("웹 서버가 설정에서 비활성화되어 있습니다. 종료.");
        return Ok(());
    }

    // 어댑터 조립
    let db_path = resolve_db_path(&args, &config)?;
    let store = Arc::new(
        SqliteCredentialStore::open(&db_path)
            .map_err(|e| anyhow!("자격증명 저장소 열기 실패: {e}"))?,
    );

    let timeout = Duration::from_secs(config.mirror.timeout_secs);
    let factory = Arc::new(
        HttpMirrorFactory::new(&config.mirror.endpoint, timeout, config.mirror.max_retries)
            .map_err(|e| anyhow!("미러 팩토리 생성 실패: {e}"))?,
    );
    let fetcher = Arc::new(
        HttpAttachmentFetcher::new(timeout).map_err(|e| anyhow!("첨부 페처 생성 실패: {e}"))?,
    );

    let dispatcher = Arc::new(Dispatcher::new(store, factory, fetcher, &config.base_url));

    // 종료 신호 전파
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("종료 신호 수신 실패: {e}");
            return;
        }
        info!("Ctrl-C 수신, 종료 시작");
        let _ = shutdown_tx.send(true);
    });

    let server = WebServer::new(dispatcher, &config);
    info!("서버 시작: {}", server.url());
    server.run(shutdown_rx).await.context("웹 서버 실행 실패")?;

    info!("종료 완료");
    Ok(())
}
