//! 요청 세대 토큰.
//!
//! 새 요청이 시작될 때마다 세대가 증가하며, 완료 콜백은 자신이 캡처한
//! 세대가 여전히 현재일 때만 결과를 적용한다.

/// 단조 증가 세대 카운터
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    /// 세대를 증가시키고 새 값을 반환
    pub fn advance(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub fn is_current(&self, value: u64) -> bool {
        self.0 == value
    }
}

/// 프레임 로드 요청 토큰
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadToken(pub(crate) u64);

/// 공유 링크 생성 요청 토큰
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShareTicket(pub(crate) u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_invalidates_previous() {
        let mut generation = Generation::default();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }
}
