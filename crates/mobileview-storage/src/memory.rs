//! 인메모리 키-값 저장소.
//!
//! 프로세스 수명 동안만 유지된다. 테스트와 `--ephemeral` 세션용.

use mobileview_core::error::CoreError;
use mobileview_core::ports::kv_store::KeyValueStore;
use parking_lot::Mutex;
use std::collections::HashMap;

/// 인메모리 저장소: `KeyValueStore` 포트 구현
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// 빈 저장소 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 항목 수
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// 비어있는지
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
