//! 설정 파일 관리.
//!
//! 뷰어 설정을 JSON 파일 하나로 보관한다. 첫 실행이면 기본값으로 파일을
//! 만들고, 읽거나 쓸 때마다 [`ViewerConfig::validate`]를 거친다.
//! 플랫폼별 경로 결정은 바이너리(`mobileview-app`)가 담당한다.

use crate::config::ViewerConfig;
use crate::error::CoreError;
use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 설정 파일 이름
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 파일과 메모리 사본을 함께 관리
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<ViewerConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 경로의 설정 파일을 열거나, 없으면 기본 설정으로 생성
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        let config = if path.is_file() {
            read_config(&path)?
        } else {
            let config = ViewerConfig::default_config();
            write_config(&path, &config)?;
            info!("설정 파일 생성 (기본값): {}", path.display());
            config
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    /// 현재 설정 사본
    pub fn get(&self) -> ViewerConfig {
        self.current.read().clone()
    }

    /// 설정 전체 교체 (검증 후 파일에 먼저 기록)
    pub fn update(&self, config: ViewerConfig) -> Result<(), CoreError> {
        config.validate()?;
        write_config(&self.path, &config)?;
        *self.current.write() = config;
        debug!("설정 갱신: {}", self.path.display());
        Ok(())
    }

    /// 현재 설정을 고쳐서 저장하고 결과를 반환
    pub fn update_with<F>(&self, edit: F) -> Result<ViewerConfig, CoreError>
    where
        F: FnOnce(&mut ViewerConfig),
    {
        let mut next = self.get();
        edit(&mut next);
        self.update(next.clone())?;
        Ok(next)
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// 파일에서 다시 읽기. 실패하면 기존 설정을 유지한다.
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.path)?;
        *self.current.write() = config;
        info!("설정 재로드: {}", self.path.display());
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<ViewerConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("{} 읽기 실패: {e}", path.display())))?;
    let config: ViewerConfig = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("{} 형식 오류: {e}", path.display())))?;
    config.validate()?;
    debug!("설정 로드: {}", path.display());
    Ok(config)
}

/// 임시 파일에 쓴 뒤 교체 (쓰기 도중 중단돼도 기존 파일 유지)
fn write_config(path: &Path, config: &ViewerConfig) -> Result<(), CoreError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| CoreError::Config(format!("{} 디렉토리 생성 실패: {e}", dir.display())))?;
    }

    let json = serde_json::to_string_pretty(config)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| CoreError::Config(format!("{} 쓰기 실패: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(dir.path().join("cfg").join(CONFIG_FILE_NAME)).unwrap()
    }

    #[test]
    fn first_run_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        assert!(manager.config_path().is_file());
        assert_eq!(manager.get(), ViewerConfig::default());
        assert!(!dir.path().join("cfg").join("config.json.tmp").exists());
    }

    #[test]
    fn edits_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        let edited = manager
            .update_with(|c| {
                c.share.base_url = "https://viewer.example/".into();
                c.optimization.jpeg_quality = 85;
            })
            .unwrap();
        assert_eq!(manager.get(), edited);

        let reopened = manager_in(&dir).get();
        assert_eq!(reopened.share.base_url, "https://viewer.example/");
        assert_eq!(reopened.optimization.jpeg_quality, 85);
    }

    #[test]
    fn invalid_update_is_rejected_and_not_written() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);

        let err = manager
            .update_with(|c| c.optimization.jpeg_quality = 0)
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        assert_eq!(manager.get().optimization.jpeg_quality, 70);
        assert_eq!(manager_in(&dir).get().optimization.jpeg_quality, 70);
    }

    #[test]
    fn reload_picks_up_external_edit() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        fs::write(
            manager.config_path(),
            r#"{"notification":{"auto_dismiss_ms":5000}}"#,
        )
        .unwrap();

        manager.reload().unwrap();
        assert_eq!(manager.get().notification.auto_dismiss_ms, 5_000);
        assert_eq!(manager.get().optimization.max_width, 1024);
    }

    #[test]
    fn failed_reload_keeps_previous() {
        let dir = TempDir::new().unwrap();
        let manager = manager_in(&dir);
        fs::write(manager.config_path(), "{not json").unwrap();

        assert!(matches!(manager.reload(), Err(CoreError::Config(_))));
        assert_eq!(manager.get(), ViewerConfig::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"upload":{"api_key":"abc"}}"#).unwrap();

        let config = ConfigManager::with_path(path).unwrap().get();
        assert_eq!(config.upload.api_key, "abc");
        assert_eq!(config.upload.endpoint, "https://api.imgbb.com/1/upload");
        assert_eq!(config.storage.settings_key, "mobileViewerSettings");
    }

    #[test]
    fn out_of_range_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"optimization":{"max_width":0}}"#).unwrap();

        assert!(matches!(
            ConfigManager::with_path(path),
            Err(CoreError::Config(_))
        ));
    }
}
