//! 저장소 통합 테스트.
//!
//! SQLite 파일 저장소 위에서 컨트롤러 변경 → 재시작 → 복원 흐름 검증.

use mobileview_controller::ViewerController;
use mobileview_core::config::ViewerConfig;
use mobileview_core::models::settings::{BackgroundSize, SettingsPatch, SettingsRecord};
use mobileview_network::imgbb::ImgbbClient;
use mobileview_storage::settings_store::{SettingsStore, StoredSettings};
use mobileview_storage::sqlite::SqliteKeyValueStore;
use mobileview_vision::pipeline::ImagePipeline;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn start(db_path: &Path, query: &str) -> (ViewerController, SettingsStore) {
    let config = ViewerConfig::default_config();
    let kv = Arc::new(SqliteKeyValueStore::open(db_path).unwrap());
    let store = SettingsStore::new(kv);
    let pipeline = Arc::new(ImagePipeline::new(
        Arc::new(ImgbbClient::new(&config.upload).unwrap()),
        config.upload.clone(),
        config.optimization.clone(),
    ));
    let controller = ViewerController::initialize(query, store.clone(), pipeline, &config);
    (controller, store)
}

#[test]
fn settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mobileview.db");

    {
        let (mut controller, _) = start(&db, "");
        controller.set_website_url("https://my.app");
        controller.update(&SettingsPatch {
            device_width: Some(430),
            background_size: Some(BackgroundSize::Center),
            ..Default::default()
        });
    }

    let (controller, store) = start(&db, "");
    assert_eq!(controller.record().website_url, "https://my.app");
    assert_eq!(controller.record().device_width, 430);
    assert_eq!(controller.record().background_size, BackgroundSize::Center);
    assert!(controller.view().site_loaded);
    assert!(!controller.view().is_loading);
    assert!(matches!(store.load(), StoredSettings::Loaded(_)));
}

#[test]
fn query_wins_over_stored_width() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mobileview.db");

    {
        let (mut controller, _) = start(&db, "");
        controller.update(&SettingsPatch {
            device_width: Some(400),
            ..Default::default()
        });
    }

    let (controller, _) = start(&db, "?width=300");
    assert_eq!(controller.record().device_width, 300);
}

#[test]
fn reset_then_restart_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("mobileview.db");

    {
        let (mut controller, _) = start(&db, "?url=https://my.app&height=1000");
        controller.persist();
    }
    {
        let (mut controller, store) = start(&db, "");
        assert_eq!(controller.record().device_height, 1000);
        controller.reset();
        assert_eq!(store.load(), StoredSettings::Missing);
    }

    let (controller, _) = start(&db, "");
    assert_eq!(controller.record(), &SettingsRecord::default());
    assert!(!controller.view().site_loaded);
}
