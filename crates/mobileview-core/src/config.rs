//! 애플리케이션 설정 구조체.
//!
//! 이미지 호스트, 업로드 전 최적화, 공유 링크 기준 주소, 저장소 키,
//! 알림 표시 시간 등 런타임 설정을 정의한다.
//! 누락된 섹션은 기본값으로 채워진다.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// 이미지 호스팅 설정
    #[serde(default)]
    pub upload: UploadConfig,
    /// 업로드 전 이미지 최적화 설정
    #[serde(default)]
    pub optimization: OptimizationConfig,
    /// 공유 링크 설정
    #[serde(default)]
    pub share: ShareConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 알림 설정
    #[serde(default)]
    pub notification: NotificationConfig,
}

impl ViewerConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 값 범위 검사. 어댑터 생성 전에 잘못된 설정을 걸러낸다.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.upload.endpoint.trim().is_empty() {
            return Err(CoreError::Config("upload.endpoint가 비어 있습니다".into()));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(CoreError::Config("upload.allowed_types가 비어 있습니다".into()));
        }
        if self.optimization.max_width == 0 || self.optimization.max_height == 0 {
            return Err(CoreError::Config(format!(
                "optimization 최대 크기는 0보다 커야 합니다 ({}x{})",
                self.optimization.max_width, self.optimization.max_height
            )));
        }
        if !(1..=100).contains(&self.optimization.jpeg_quality) {
            return Err(CoreError::Config(format!(
                "optimization.jpeg_quality 범위 초과: {} (1-100)",
                self.optimization.jpeg_quality
            )));
        }
        if self.storage.settings_key.is_empty() {
            return Err(CoreError::Config("storage.settings_key가 비어 있습니다".into()));
        }
        Ok(())
    }
}

// ============================================================
// 이미지 호스팅
// ============================================================

/// 이미지 호스팅 설정 (ImgBB 호환 API)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// 업로드 엔드포인트
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
    /// API 키
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// 원본 이미지 최대 크기 (바이트)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
    /// 허용 MIME 타입
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_upload_endpoint(),
            api_key: default_api_key(),
            max_source_bytes: default_max_source_bytes(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_upload_endpoint() -> String {
    "https://api.imgbb.com/1/upload".to_string()
}

// 공개 데모 키. 운영 환경에서는 설정 파일로 교체한다.
fn default_api_key() -> String {
    "1390da074ff3f2f2c043c2336bb2e24d".to_string()
}

fn default_max_source_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_allowed_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/gif", "image/webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ============================================================
// 최적화
// ============================================================

/// 업로드 전 재인코딩 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// 최대 너비 (px)
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    /// 최대 높이 (px)
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    /// JPEG 품질 (1–100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_width(),
            max_height: default_max_height(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_max_width() -> u32 {
    1024
}

fn default_max_height() -> u32 {
    768
}

fn default_jpeg_quality() -> u8 {
    70
}

// ============================================================
// 공유 / 저장소 / 알림
// ============================================================

/// 공유 링크 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// 공유 링크의 기준 주소 (origin + path)
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/".to_string()
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 설정 레코드 저장 키
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_key: default_settings_key(),
        }
    }
}

/// 설정 레코드 기본 저장 키
pub const DEFAULT_SETTINGS_KEY: &str = "mobileViewerSettings";

fn default_settings_key() -> String {
    DEFAULT_SETTINGS_KEY.to_string()
}

/// 알림 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// 자동 닫힘 시간 (밀리초)
    #[serde(default = "default_auto_dismiss_ms")]
    pub auto_dismiss_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss_ms: default_auto_dismiss_ms(),
        }
    }
}

fn default_auto_dismiss_ms() -> u64 {
    3_000
}
