//! 이미지 호스팅 포트.
//!
//! 구현: `mobileview-network` crate (reqwest multipart)

use async_trait::async_trait;

use crate::error::CoreError;

/// 업로드 가능한 인코딩 이미지
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// 인코딩된 바이트
    pub bytes: Vec<u8>,
    /// MIME 타입 (예: "image/jpeg")
    pub mime: String,
    /// 픽셀 너비
    pub width: u32,
    /// 픽셀 높이
    pub height: u32,
}

/// 공개 이미지 호스트
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// 이미지를 업로드하고 공개 URL 반환
    ///
    /// 비성공 응답이나 전송 실패는 `CoreError::Upload`.
    async fn upload(&self, image: &EncodedImage) -> Result<String, CoreError>;
}
