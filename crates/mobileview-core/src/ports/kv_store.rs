//! 로컬 키-값 저장소 포트.
//!
//! 브라우저 로컬 저장소와 같은 동기식 계약.
//! 구현: `mobileview-storage` crate (rusqlite, 인메모리)

use crate::error::CoreError;

/// 문자열 키-값 저장소
pub trait KeyValueStore: Send + Sync {
    /// 값 조회 (없으면 None)
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// 값 저장 (덮어쓰기)
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// 값 삭제 (없어도 성공)
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}
