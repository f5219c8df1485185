//! 설정 레코드 영속화 어댑터.
//!
//! 고정 키 아래에 설정 레코드를 JSON으로 저장한다.
//! 영속화는 최선 노력(advisory)이다: 읽기 실패는 "저장된 설정 없음"으로,
//! 쓰기 실패는 경고 로그로 흡수되며 호출자에게 전파되지 않는다.
//! 다만 로드 결과는 타입으로 구분해 "없음"과 "손상"을 테스트할 수 있다.

use mobileview_core::config::DEFAULT_SETTINGS_KEY;
use mobileview_core::models::background::BackgroundImage;
use mobileview_core::models::settings::{
    BackgroundSize, DevicePosition, SettingsPatch, SettingsRecord,
};
use mobileview_core::ports::kv_store::KeyValueStore;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// 저장된 설정 로드 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredSettings {
    /// 파싱된 부분 레코드
    Loaded(SettingsPatch),
    /// 저장된 값 없음
    Missing,
    /// 값은 있으나 JSON 객체로 파싱 불가
    Corrupt(String),
    /// 저장소 접근 실패
    Unavailable(String),
}

impl StoredSettings {
    /// `Loaded`만 부분 레코드로, 나머지는 "없음"으로 취급
    pub fn into_patch(self) -> Option<SettingsPatch> {
        match self {
            Self::Loaded(patch) => Some(patch),
            _ => None,
        }
    }
}

/// 설정 레코드 저장소 (키-값 포트 위의 영속화 어댑터)
#[derive(Clone)]
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SettingsStore {
    /// 기본 키(`mobileViewerSettings`)로 생성
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, DEFAULT_SETTINGS_KEY)
    }

    /// 지정된 키로 생성
    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            kv,
            key: key.to_string(),
        }
    }

    /// 저장 키
    pub fn key(&self) -> &str {
        &self.key
    }

    /// 저장된 설정 로드 (에러를 발생시키지 않음)
    pub fn load(&self) -> StoredSettings {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StoredSettings::Missing,
            Err(e) => {
                warn!("저장된 설정 읽기 실패: {e}");
                return StoredSettings::Unavailable(e.to_string());
            }
        };

        if raw.trim().is_empty() {
            return StoredSettings::Missing;
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => {
                let patch = patch_from_stored(&map);
                debug!("저장된 설정 로드: {patch:?}");
                StoredSettings::Loaded(patch)
            }
            Ok(Value::Null) => StoredSettings::Missing,
            Ok(other) => {
                warn!("저장된 설정이 객체가 아님: {other}");
                StoredSettings::Corrupt(format!("객체가 아닌 JSON 값: {other}"))
            }
            Err(e) => {
                warn!("저장된 설정 파싱 실패: {e}");
                StoredSettings::Corrupt(e.to_string())
            }
        }
    }

    /// 설정 레코드 저장 (실패는 로그만 남기고 흡수)
    ///
    /// 저장 성공 여부를 반환한다.
    pub fn save(&self, record: &SettingsRecord) -> bool {
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!("설정 직렬화 실패: {e}");
                return false;
            }
        };

        match self.kv.set(&self.key, &json) {
            Ok(()) => {
                debug!("설정 저장 완료 ({} bytes)", json.len());
                true
            }
            Err(e) => {
                warn!("설정 저장 실패 (무시): {e}");
                false
            }
        }
    }

    /// 저장된 설정 삭제 (초기화용, 실패는 흡수)
    pub fn clear(&self) -> bool {
        match self.kv.remove(&self.key) {
            Ok(()) => true,
            Err(e) => {
                warn!("설정 삭제 실패 (무시): {e}");
                false
            }
        }
    }
}

/// 저장된 JSON 객체를 관대하게 부분 레코드로 변환
///
/// 숫자 필드는 숫자 또는 숫자 문자열을 허용하고, 잘못된 필드는 버린다
/// (병합 시 기본값 적용). `backgroundImage`가 없으면 예전 형식의
/// `backgroundUrl` 키를 사용한다.
fn patch_from_stored(map: &Map<String, Value>) -> SettingsPatch {
    let mut patch = SettingsPatch::default();

    if let Some(url) = map.get("websiteUrl").and_then(Value::as_str) {
        patch.website_url = Some(url.to_string());
    }

    patch.background_image = match map.get("backgroundImage") {
        Some(Value::String(css)) if !css.trim().is_empty() => {
            BackgroundImage::from_css(css).map(Some)
        }
        Some(Value::Null) => Some(None),
        _ => map
            .get("backgroundUrl")
            .and_then(Value::as_str)
            .and_then(BackgroundImage::from_reference)
            .map(Some),
    };

    patch.background_size = map
        .get("backgroundSize")
        .and_then(Value::as_str)
        .and_then(BackgroundSize::parse);
    patch.device_width = map.get("deviceWidth").and_then(lenient_int);
    patch.device_height = map.get("deviceHeight").and_then(lenient_int);
    patch.show_frame = map.get("showFrame").and_then(Value::as_bool);
    patch.device_position = map
        .get("devicePosition")
        .and_then(Value::as_str)
        .and_then(DevicePosition::parse);
    patch.hide_scrollbar = map.get("hideScrollbar").and_then(Value::as_bool);

    patch
}

fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKeyValueStore;
    use mobileview_core::error::CoreError;

    /// 항상 실패하는 저장소 (용량 초과 시뮬레이션)
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, CoreError> {
            Err(CoreError::Storage("접근 불가".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), CoreError> {
            Err(CoreError::Storage("QuotaExceededError".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), CoreError> {
            Err(CoreError::Storage("접근 불가".to_string()))
        }
    }

    fn memory_store() -> (Arc<MemoryKeyValueStore>, SettingsStore) {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SettingsStore::new(kv.clone());
        (kv, store)
    }

    #[test]
    fn missing_when_empty() {
        let (_, store) = memory_store();
        assert_eq!(store.load(), StoredSettings::Missing);
        assert!(store.load().into_patch().is_none());
    }

    #[test]
    fn save_then_load_roundtrip() {
        let (kv, store) = memory_store();
        let record = SettingsRecord {
            website_url: "https://example.com".into(),
            background_image: Some(BackgroundImage::Embedded(
                "data:image/png;base64,AA==".into(),
            )),
            background_size: BackgroundSize::Contain,
            device_width: 400,
            device_height: 900,
            show_frame: false,
            device_position: DevicePosition::Left,
            hide_scrollbar: false,
        };
        assert!(store.save(&record));

        let raw = kv.get("mobileViewerSettings").unwrap().unwrap();
        assert!(raw.contains("\"deviceWidth\":400"));
        assert!(!raw.contains("panelMinimized"));

        let patch = store.load().into_patch().unwrap();
        assert_eq!(SettingsRecord::merged([&patch]), record);
    }

    #[test]
    fn corrupt_is_distinguished_from_missing() {
        let (kv, store) = memory_store();
        kv.set("mobileViewerSettings", "{broken").unwrap();
        assert!(matches!(store.load(), StoredSettings::Corrupt(_)));

        kv.set("mobileViewerSettings", "[1,2]").unwrap();
        assert!(matches!(store.load(), StoredSettings::Corrupt(_)));

        kv.set("mobileViewerSettings", "null").unwrap();
        assert_eq!(store.load(), StoredSettings::Missing);
    }

    #[test]
    fn lenient_legacy_record() {
        let (kv, store) = memory_store();
        kv.set(
            "mobileViewerSettings",
            r#"{"websiteUrl":"https://old.app","backgroundUrl":"https://i.ibb.co/x.jpg",
                "backgroundSize":"tile","deviceWidth":"414","deviceHeight":"abc",
                "showFrame":"yes","panelMinimized":true}"#,
        )
        .unwrap();

        let patch = store.load().into_patch().unwrap();
        assert_eq!(patch.website_url.as_deref(), Some("https://old.app"));
        assert_eq!(
            patch.background_image,
            Some(Some(BackgroundImage::Remote("https://i.ibb.co/x.jpg".into())))
        );
        assert_eq!(patch.background_size, None);
        assert_eq!(patch.device_width, Some(414));
        assert_eq!(patch.device_height, None);
        assert_eq!(patch.show_frame, None);
    }

    #[test]
    fn stored_out_of_range_is_clamped_on_merge() {
        let (kv, store) = memory_store();
        kv.set("mobileViewerSettings", r#"{"deviceWidth":50,"deviceHeight":5000}"#)
            .unwrap();
        let patch = store.load().into_patch().unwrap();
        let record = SettingsRecord::merged([&patch]);
        assert_eq!(record.device_width, 200);
        assert_eq!(record.device_height, 1200);
    }

    #[test]
    fn clear_removes_entry() {
        let (kv, store) = memory_store();
        store.save(&SettingsRecord::default());
        assert!(store.clear());
        assert!(kv.get("mobileViewerSettings").unwrap().is_none());
    }

    #[test]
    fn broken_store_is_absorbed() {
        let store = SettingsStore::new(Arc::new(BrokenStore));
        assert!(matches!(store.load(), StoredSettings::Unavailable(_)));
        assert!(!store.save(&SettingsRecord::default()));
        assert!(!store.clear());
    }

    #[test]
    fn custom_key() {
        let kv = Arc::new(MemoryKeyValueStore::new());
        let store = SettingsStore::with_key(kv.clone(), "other");
        store.save(&SettingsRecord::default());
        assert!(kv.get("other").unwrap().is_some());
        assert!(kv.get("mobileViewerSettings").unwrap().is_none());
    }
}
