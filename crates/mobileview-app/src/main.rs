//! # mobileview-app
//!
//! MobileView 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 로깅 초기화 후 하위 명령을 실행한다.

mod cli;
mod terminal_clipboard;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use mobileview_controller::notifications::NotificationKind;
use mobileview_controller::{CopyOutcome, ViewerController};
use mobileview_core::config::ViewerConfig;
use mobileview_core::config_manager::{ConfigManager, CONFIG_FILE_NAME};
use mobileview_core::ports::kv_store::KeyValueStore;
use mobileview_core::query_codec;
use mobileview_network::imgbb::ImgbbClient;
use mobileview_storage::memory::MemoryKeyValueStore;
use mobileview_storage::settings_store::SettingsStore;
use mobileview_storage::sqlite::SqliteKeyValueStore;
use mobileview_vision::embed::ImageSource;
use mobileview_vision::pipeline::ImagePipeline;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command};
use crate::terminal_clipboard::Osc52Clipboard;

/// 데이터베이스 파일 이름
const DB_FILE_NAME: &str = "mobileview.db";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "mobileview", "viewer")
}

/// 데이터베이스 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/com.mobileview.viewer/mobileview.db`
/// - Windows: `%APPDATA%\mobileview\viewer\data\mobileview.db`
/// - Linux: `~/.local/share/viewer/mobileview.db`
fn resolve_db_path(data_dir: Option<&str>) -> PathBuf {
    data_dir
        .map(|d| PathBuf::from(d).join(DB_FILE_NAME))
        .or_else(|| project_dirs().map(|p| p.data_dir().join(DB_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(".").join(DB_FILE_NAME))
}

/// 설정 파일 경로 결정
fn resolve_config_path(config: Option<&str>, data_dir: Option<&str>) -> PathBuf {
    config
        .map(PathBuf::from)
        .or_else(|| data_dir.map(|d| PathBuf::from(d).join(CONFIG_FILE_NAME)))
        .or_else(|| project_dirs().map(|p| p.config_dir().join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(".").join(CONFIG_FILE_NAME))
}

/// 키-값 저장소 생성
fn open_store(args: &Args) -> Result<Arc<dyn KeyValueStore>> {
    if args.ephemeral {
        debug!("인메모리 저장소 사용");
        return Ok(Arc::new(MemoryKeyValueStore::new()));
    }
    let db_path = resolve_db_path(args.data_dir.as_deref());
    let store = SqliteKeyValueStore::open(&db_path)
        .map_err(|e| anyhow!("저장소 열기 실패: {}: {e}", db_path.display()))?;
    Ok(Arc::new(store))
}

/// 어댑터 와이어링 후 컨트롤러 초기화
fn build_controller(
    query: &str,
    config: &ViewerConfig,
    kv: Arc<dyn KeyValueStore>,
) -> Result<ViewerController> {
    let host = Arc::new(ImgbbClient::new(&config.upload)?);
    let pipeline = Arc::new(ImagePipeline::new(
        host,
        config.upload.clone(),
        config.optimization.clone(),
    ));
    let store = SettingsStore::with_key(kv, &config.storage.settings_key);
    Ok(ViewerController::initialize(query, store, pipeline, config))
}

/// 컨트롤러 상태 출력 (JSON)
fn print_state(controller: &ViewerController) -> Result<()> {
    let output = json!({
        "state": controller.snapshot(),
        "layout": controller.layout(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 쌓인 알림을 표준 에러로 출력
fn flush_notifications(controller: &mut ViewerController) {
    for notification in controller.notifications().active() {
        let tag = match notification.kind {
            NotificationKind::Success => "성공",
            NotificationKind::Error => "오류",
            NotificationKind::Info => "안내",
        };
        eprintln!("[{tag}] {}", notification.message);
    }
    controller.notifications_mut().clear();
}

/// 배경 소스 해석 (URL 또는 파일 경로)
fn read_background_source(source: &str) -> Result<ImageSource> {
    let trimmed = source.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(ImageSource::RemoteUrl(trimmed.to_string()));
    }
    let path = Path::new(trimmed);
    let bytes = std::fs::read(path).with_context(|| format!("이미지 파일 읽기 실패: {trimmed}"))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| trimmed.to_string());
    Ok(ImageSource::File { name, bytes })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "mobileview={lvl},mobileview_app={lvl},mobileview_core={lvl},mobileview_storage={lvl},mobileview_vision={lvl},mobileview_network={lvl},mobileview_controller={lvl}",
        lvl = args.log_level
    );
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config_path = resolve_config_path(args.config.as_deref(), args.data_dir.as_deref());
    let config_manager = ConfigManager::with_path(config_path)
        .map_err(|e| anyhow!("설정 로드 실패: {e}"))?;
    let config = config_manager.get();
    debug!("설정 파일: {}", config_manager.config_path().display());

    if let Command::Config { path } = &args.command {
        if *path {
            println!("{}", config_manager.config_path().display());
        } else {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        return Ok(());
    }

    let kv = open_store(&args)?;

    match &args.command {
        Command::Show { query } => {
            let controller = build_controller(query.as_deref().unwrap_or(""), &config, kv)?;
            print_state(&controller)?;
        }
        Command::Open { link } => {
            let query = query_codec::query_part(link);
            if query.is_empty() {
                bail!("링크에 쿼리가 없습니다: {link}");
            }
            let controller = build_controller(query, &config, kv)?;
            controller.persist();
            if controller.should_strip_query() {
                info!("표시 주소: {}", query_codec::strip_query(link));
            }
            print_state(&controller)?;
        }
        Command::Load { url } => {
            let mut controller = build_controller("", &config, kv)?;
            let loaded = controller.load_site(url);
            flush_notifications(&mut controller);
            if loaded.is_none() {
                bail!("사이트를 로드하지 못했습니다");
            }
            print_state(&controller)?;
        }
        Command::Set(set) => {
            let mut controller = build_controller("", &config, kv)?;
            controller.update(&set.to_patch());
            print_state(&controller)?;
        }
        Command::Background { source, clear } => {
            let mut controller = build_controller("", &config, kv)?;
            if *clear {
                controller.clear_background();
            } else if let Some(source) = source {
                let image = read_background_source(source)?;
                let applied = controller.set_background(image);
                flush_notifications(&mut controller);
                if !applied {
                    bail!("배경 이미지를 적용하지 못했습니다");
                }
            }
            flush_notifications(&mut controller);
            print_state(&controller)?;
        }
        Command::Share { copy } => {
            let mut controller = build_controller("", &config, kv)?;
            let link = controller
                .generate_share_link()
                .await
                .ok_or_else(|| anyhow!("공유 링크 생성이 취소되었습니다"))?;
            let copied = *copy
                && controller.copy_share_link(&Osc52Clipboard::stdout()) == CopyOutcome::Copied;
            flush_notifications(&mut controller);
            if !copied {
                println!("{link}");
            }
        }
        Command::Reset => {
            let mut controller = build_controller("", &config, kv)?;
            controller.reset();
            flush_notifications(&mut controller);
        }
        Command::Config { .. } => {}
    }

    Ok(())
}
