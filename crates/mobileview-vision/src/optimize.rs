//! 업로드 전 이미지 최적화.
//!
//! 최대 크기 안으로 비율을 유지해 축소하고(확대하지 않음)
//! 손실 JPEG으로 재인코딩한다.

use crate::embed::decode_data_url;
use fast_image_resize::{
    images::Image as FirImage, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer,
};
use image::{DynamicImage, GenericImageView};
use mobileview_core::config::OptimizationConfig;
use mobileview_core::error::CoreError;
use mobileview_core::models::background::BackgroundImage;
use mobileview_core::ports::image_host::EncodedImage;
use tracing::debug;

/// 출력 MIME
pub const OUTPUT_MIME: &str = "image/jpeg";

/// 최대 크기 안에 맞는 목표 크기 계산
///
/// 비율 `min(max_w/w, max_h/h)`이 1 이상이면 원본 크기를 유지한다.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width.max(1), height.max(1));
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = f64::min(
        f64::from(max_width) / f64::from(width),
        f64::from(max_height) / f64::from(height),
    );
    let w = (f64::from(width) * ratio).round().max(1.0) as u32;
    let h = (f64::from(height) * ratio).round().max(1.0) as u32;
    (w, h)
}

/// 배경 참조(data URL)를 업로드용 JPEG으로 최적화
pub fn optimize_background(
    background: &BackgroundImage,
    config: &OptimizationConfig,
) -> Result<EncodedImage, CoreError> {
    let (_, bytes) = decode_data_url(background.reference())?;
    optimize_bytes(&bytes, config)
}

/// 이미지 바이트를 디코딩 → 축소 → JPEG 재인코딩
pub fn optimize_bytes(bytes: &[u8], config: &OptimizationConfig) -> Result<EncodedImage, CoreError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Read(format!("이미지 디코딩 실패: {e}")))?;
    optimize_image(&image, config)
}

/// 디코딩된 이미지를 업로드용 JPEG으로 변환
///
/// JPEG에는 알파 채널이 없으므로 RGB로 바꾼 뒤 필요할 때만 축소한다.
pub fn optimize_image(
    image: &DynamicImage,
    config: &OptimizationConfig,
) -> Result<EncodedImage, CoreError> {
    let (src_w, src_h) = image.dimensions();
    let (width, height) = fit_within(src_w, src_h, config.max_width, config.max_height);

    let mut rgb = image.to_rgb8();
    if (width, height) != (src_w, src_h) {
        let src = FirImage::from_vec_u8(src_w, src_h, rgb.into_raw(), PixelType::U8x3)
            .map_err(|e| CoreError::Internal(format!("축소 입력 버퍼 오류 ({src_w}x{src_h}): {e}")))?;
        let mut dst = FirImage::new(width, height, PixelType::U8x3);
        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
        Resizer::new()
            .resize(&src, &mut dst, &options)
            .map_err(|e| {
                CoreError::Internal(format!("{src_w}x{src_h} → {width}x{height} 축소 실패: {e}"))
            })?;
        rgb = image::RgbImage::from_raw(width, height, dst.into_vec())
            .ok_or_else(|| CoreError::Internal("축소 결과 버퍼 크기 불일치".to_string()))?;
    }

    let quality = config.jpeg_quality.clamp(1, 100);
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode(&rgb, width, height, image::ColorType::Rgb8.into())
        .map_err(|e| CoreError::Internal(format!("JPEG 인코딩 실패: {e}")))?;

    debug!(
        "업로드용 최적화: {}x{} → {}x{} (q={}, {} bytes)",
        src_w,
        src_h,
        width,
        height,
        quality,
        bytes.len()
    );

    Ok(EncodedImage {
        bytes,
        mime: OUTPUT_MIME.to_string(),
        width,
        height,
    })
}
