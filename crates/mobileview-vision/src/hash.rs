//! 콘텐츠 식별자.
//!
//! 재인코딩된 이미지 바이트의 SHA-256 (소문자 hex).
//! 같은 바이트로 재인코딩되는 이미지는 같은 식별자를 갖는다.

use sha2::{Digest, Sha256};

/// 바이트의 콘텐츠 식별자 계산
pub fn content_id(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
