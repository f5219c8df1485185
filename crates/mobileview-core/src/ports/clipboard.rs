//! 클립보드 포트.
//!
//! 최선 노력(best-effort) 텍스트 쓰기. 실패 시 호출자가
//! 수동 복사(텍스트 선택)로 대체한다.

use crate::error::CoreError;

/// 텍스트 클립보드
pub trait Clipboard: Send + Sync {
    /// 텍스트 쓰기
    fn write_text(&self, text: &str) -> Result<(), CoreError>;
}
