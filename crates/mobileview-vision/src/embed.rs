//! 이미지 소스 → 표시 가능한 배경 참조.
//!
//! 로컬 파일/드롭 데이터는 자체 포함 data URL로 바꾸고,
//! 입력된 원격 URL은 그대로 사용한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use mobileview_core::config::UploadConfig;
use mobileview_core::error::CoreError;
use mobileview_core::models::background::BackgroundImage;
use tracing::debug;

/// 사용자가 제공한 이미지 소스
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// 파일 선택기로 고른 파일
    File { name: String, bytes: Vec<u8> },
    /// 드래그 앤 드롭 데이터 (브라우저가 알려준 MIME 포함)
    Drop { mime: String, bytes: Vec<u8> },
    /// 입력된 원격 이미지 URL
    RemoteUrl(String),
}

/// 이미지 소스를 배경 참조로 변환
///
/// 이미지로 디코딩할 수 없거나 허용되지 않은 형식/크기면 `CoreError::Read`.
pub fn to_displayable(
    source: ImageSource,
    limits: &UploadConfig,
) -> Result<BackgroundImage, CoreError> {
    match source {
        ImageSource::RemoteUrl(url) => BackgroundImage::from_reference(&url)
            .ok_or_else(|| CoreError::Read("이미지 URL이 비어 있습니다".to_string())),
        ImageSource::Drop { mime, bytes } => {
            if !mime.starts_with("image/") {
                return Err(CoreError::Read(format!(
                    "이미지 파일만 사용할 수 있습니다 ({mime})"
                )));
            }
            embed_bytes(&bytes, limits)
        }
        ImageSource::File { name, bytes } => {
            if let Some(guess) = mime_guess::from_path(&name).first() {
                if guess.type_() != mime_guess::mime::IMAGE {
                    return Err(CoreError::Read(format!(
                        "이미지 파일이 아닙니다: {name} ({guess})"
                    )));
                }
            }
            embed_bytes(&bytes, limits)
        }
    }
}

/// 이미지 바이트를 검증하고 data URL 배경으로 변환
fn embed_bytes(bytes: &[u8], limits: &UploadConfig) -> Result<BackgroundImage, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Read("빈 이미지 데이터".to_string()));
    }
    if bytes.len() > limits.max_source_bytes {
        return Err(CoreError::Read(format!(
            "이미지가 너무 큽니다: {:.2}MB (최대 {:.2}MB)",
            bytes.len() as f64 / 1024.0 / 1024.0,
            limits.max_source_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| CoreError::Read(format!("이미지 형식 인식 실패: {e}")))?;
    let mime = format.to_mime_type();
    if !limits.allowed_types.iter().any(|t| t == mime) {
        return Err(CoreError::Read(format!("지원하지 않는 이미지 형식: {mime}")));
    }

    // 실제로 디코딩 가능한지 확인
    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CoreError::Read(format!("이미지 디코딩 실패: {e}")))?;
    debug!(
        "배경 이미지 임베드: {}x{} {mime}, {} bytes",
        decoded.width(),
        decoded.height(),
        bytes.len()
    );

    Ok(BackgroundImage::Embedded(encode_data_url(mime, bytes)))
}

/// data URL 생성 (`data:<mime>;base64,<payload>`)
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", B64.encode(bytes))
}

/// data URL을 (MIME, 바이트)로 디코딩
///
/// base64 형식만 지원한다. blob URL은 이 환경에서 읽을 수 없다.
pub fn decode_data_url(reference: &str) -> Result<(String, Vec<u8>), CoreError> {
    if reference.starts_with("blob:") {
        return Err(CoreError::Read(
            "blob 참조는 현재 세션 밖에서 읽을 수 없습니다".to_string(),
        ));
    }
    let rest = reference
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Read("data URL이 아닙니다".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::Read("data URL 형식 오류".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::Read("base64 data URL만 지원합니다".to_string()))?;
    let bytes = B64
        .decode(payload.trim())
        .map_err(|e| CoreError::Read(format!("base64 디코딩 실패: {e}")))?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            w,
            h,
            image::Rgba([10, 20, 30, 255]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn file_becomes_embedded_data_url() {
        let bytes = png_bytes(4, 4);
        let bg = to_displayable(
            ImageSource::File {
                name: "wallpaper.png".into(),
                bytes: bytes.clone(),
            },
            &UploadConfig::default(),
        )
        .unwrap();

        match &bg {
            BackgroundImage::Embedded(url) => {
                assert!(url.starts_with("data:image/png;base64,"));
                let (mime, decoded) = decode_data_url(url).unwrap();
                assert_eq!(mime, "image/png");
                assert_eq!(decoded, bytes);
            }
            other => panic!("임베드 배경이어야 함: {other:?}"),
        }
        assert!(bg.needs_upload());
    }

    #[test]
    fn remote_url_used_as_is() {
        let bg = to_displayable(
            ImageSource::RemoteUrl(" https://i.ibb.co/a.jpg ".into()),
            &UploadConfig::default(),
        )
        .unwrap();
        assert_eq!(bg, BackgroundImage::Remote("https://i.ibb.co/a.jpg".into()));
    }

    #[test]
    fn drop_with_non_image_mime_rejected() {
        let err = to_displayable(
            ImageSource::Drop {
                mime: "text/plain".into(),
                bytes: b"hello".to_vec(),
            },
            &UploadConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Read(_)));
    }

    #[test]
    fn undecodable_bytes_rejected() {
        let err = to_displayable(
            ImageSource::Drop {
                mime: "image/png".into(),
                bytes: b"definitely not a png".to_vec(),
            },
            &UploadConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Read(_)));
    }

    #[test]
    fn truncated_png_rejected() {
        let mut bytes = png_bytes(8, 8);
        bytes.truncate(20);
        let err = to_displayable(
            ImageSource::File {
                name: "broken.png".into(),
                bytes,
            },
            &UploadConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Read(_)));
    }

    #[test]
    fn non_image_file_name_rejected() {
        let err = to_displayable(
            ImageSource::File {
                name: "notes.txt".into(),
                bytes: png_bytes(2, 2),
            },
            &UploadConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Read(_)));
    }

    #[test]
    fn oversized_source_rejected() {
        let limits = UploadConfig {
            max_source_bytes: 10,
            ..Default::default()
        };
        let err = to_displayable(
            ImageSource::Drop {
                mime: "image/png".into(),
                bytes: png_bytes(4, 4),
            },
            &limits,
        )
        .unwrap_err();
        assert!(err.to_string().contains("너무 큽니다"));
    }

    #[test]
    fn disallowed_format_rejected() {
        let limits = UploadConfig {
            allowed_types: vec!["image/jpeg".into()],
            ..Default::default()
        };
        let err = to_displayable(
            ImageSource::Drop {
                mime: "image/png".into(),
                bytes: png_bytes(4, 4),
            },
            &limits,
        )
        .unwrap_err();
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn decode_data_url_errors() {
        assert!(decode_data_url("blob:http://localhost/1").is_err());
        assert!(decode_data_url("https://a.com/x.png").is_err());
        assert!(decode_data_url("data:image/png,raw").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }
}
