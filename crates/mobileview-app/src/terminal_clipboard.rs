//! 터미널 클립보드 (OSC 52).
//!
//! `Clipboard` 포트 구현. 터미널이 아닌 출력에서는 실패를 돌려주고,
//! 호출자는 링크를 출력해 직접 선택하게 한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use mobileview_core::error::CoreError;
use mobileview_core::ports::clipboard::Clipboard;
use std::io::{IsTerminal, Write};
use std::sync::Mutex;

/// OSC 52 클립보드 쓰기 시퀀스
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", B64.encode(text.as_bytes()))
}

/// OSC 52 이스케이프로 클립보드에 쓰는 어댑터
pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
    is_terminal: bool,
}

impl Osc52Clipboard<std::io::Stdout> {
    /// 표준 출력 기반 클립보드
    pub fn stdout() -> Self {
        let out = std::io::stdout();
        let is_terminal = out.is_terminal();
        Self {
            out: Mutex::new(out),
            is_terminal,
        }
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    /// 임의의 writer로 생성 (테스트용)
    #[cfg(test)]
    pub fn with_writer(out: W, is_terminal: bool) -> Self {
        Self {
            out: Mutex::new(out),
            is_terminal,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn write_text(&self, text: &str) -> Result<(), CoreError> {
        if !self.is_terminal {
            return Err(CoreError::Internal(
                "터미널이 아니어서 클립보드를 사용할 수 없습니다".to_string(),
            ));
        }
        let mut out = self
            .out
            .lock()
            .map_err(|_| CoreError::Internal("클립보드 잠금 실패".to_string()))?;
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
