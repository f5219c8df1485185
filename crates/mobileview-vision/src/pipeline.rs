//! 배경 이미지 파이프라인.
//!
//! 표시용 변환, 업로드 전 최적화, 콘텐츠 해시 기반 업로드 캐시를 묶는다.
//! 같은 콘텐츠에 대한 동시 업로드는 식별자별 비동기 락으로 한 번만 수행된다.
//! 실패한 업로드는 캐싱하지 않으므로 대기 중이던 호출은 순서대로 재시도한다.

use crate::embed::{self, ImageSource};
use crate::hash::content_id;
use crate::optimize;
use mobileview_core::config::{OptimizationConfig, UploadConfig};
use mobileview_core::error::CoreError;
use mobileview_core::models::background::BackgroundImage;
use mobileview_core::ports::image_host::{EncodedImage, ImageHost};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 이미지 파이프라인
pub struct ImagePipeline {
    host: Arc<dyn ImageHost>,
    upload: UploadConfig,
    optimization: OptimizationConfig,
    /// 콘텐츠 식별자 → 공개 URL
    cache: Mutex<HashMap<String, String>>,
    /// 진행 중인 업로드의 식별자별 락
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ImagePipeline {
    /// 새 파이프라인 생성
    pub fn new(
        host: Arc<dyn ImageHost>,
        upload: UploadConfig,
        optimization: OptimizationConfig,
    ) -> Self {
        Self {
            host,
            upload,
            optimization,
            cache: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// 이미지 소스를 표시 가능한 배경 참조로 변환
    pub fn to_displayable(&self, source: ImageSource) -> Result<BackgroundImage, CoreError> {
        embed::to_displayable(source, &self.upload)
    }

    /// 배경 참조를 업로드용 JPEG으로 최적화 (별도 스레드)
    pub async fn optimize(&self, background: &BackgroundImage) -> Result<EncodedImage, CoreError> {
        let background = background.clone();
        let config = self.optimization.clone();
        tokio::task::spawn_blocking(move || optimize::optimize_background(&background, &config))
            .await
            .map_err(|e| CoreError::Internal(format!("최적화 작업 조인 실패: {e}")))?
    }

    /// 캐시된 공개 URL 조회
    pub fn cached_url(&self, id: &str) -> Option<String> {
        self.cache.lock().get(id).cloned()
    }

    /// 캐시 항목 수
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// 인코딩된 이미지 업로드 (콘텐츠 해시 캐시 적용)
    pub async fn upload(&self, image: &EncodedImage) -> Result<String, CoreError> {
        let id = content_id(&image.bytes);

        if let Some(url) = self.cached_url(&id) {
            debug!("업로드 캐시 히트: {}", short_id(&id));
            return Ok(url);
        }

        let gate = {
            let mut in_flight = self.in_flight.lock();
            in_flight
                .entry(id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        let result = {
            let _guard = gate.lock().await;

            // 대기하는 동안 다른 호출이 완료했을 수 있음
            if let Some(url) = self.cached_url(&id) {
                debug!("업로드 대기 후 캐시 히트: {}", short_id(&id));
                Ok(url)
            } else {
                match self.host.upload(image).await {
                    Ok(url) => {
                        info!(
                            "이미지 업로드 완료: {} ({} bytes)",
                            short_id(&id),
                            image.bytes.len()
                        );
                        self.cache.lock().insert(id.clone(), url.clone());
                        Ok(url)
                    }
                    Err(e) => {
                        warn!("이미지 업로드 실패: {e}");
                        Err(e)
                    }
                }
            }
        };

        // 마지막 대기자가 정리
        {
            let mut in_flight = self.in_flight.lock();
            if let Some(entry) = in_flight.get(&id) {
                if Arc::strong_count(entry) <= 2 {
                    in_flight.remove(&id);
                }
            }
        }

        result
    }

    /// 배경 참조를 공유 가능한 원격 URL로 변환
    ///
    /// 이미 원격 URL이면 그대로 반환하고, 로컬 참조면 최적화 후 업로드한다.
    pub async fn publish(&self, background: &BackgroundImage) -> Result<String, CoreError> {
        if let Some(url) = background.remote_url() {
            return Ok(url.to_string());
        }
        let encoded = self.optimize(background).await?;
        self.upload(&encoded).await
    }
}

fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::encode_data_url;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// 호출 횟수를 세는 가짜 호스트
    struct CountingHost {
        calls: AtomicUsize,
        fail: bool,
        delay: Duration,
    }

    impl CountingHost {
        fn new(fail: bool, delay_ms: u64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
                delay: Duration::from_millis(delay_ms),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ImageHost for CountingHost {
        async fn upload(&self, image: &EncodedImage) -> Result<String, CoreError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(CoreError::Upload {
                    status: Some(400),
                    message: "Invalid API v1 key".into(),
                });
            }
            Ok(format!("https://i.ibb.co/{n}/{}.jpg", image.bytes.len()))
        }
    }

    fn pipeline(host: Arc<CountingHost>) -> ImagePipeline {
        ImagePipeline::new(host, UploadConfig::default(), OptimizationConfig::default())
    }

    fn encoded(bytes: &[u8]) -> EncodedImage {
        EncodedImage {
            bytes: bytes.to_vec(),
            mime: "image/jpeg".into(),
            width: 1,
            height: 1,
        }
    }

    fn embedded_png(w: u32, h: u32, color: [u8; 4]) -> BackgroundImage {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, image::Rgba(color)));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        BackgroundImage::Embedded(encode_data_url("image/png", &buf.into_inner()))
    }

    #[tokio::test]
    async fn same_bytes_upload_once() {
        let host = Arc::new(CountingHost::new(false, 0));
        let pipeline = pipeline(host.clone());

        let a = pipeline.upload(&encoded(b"abc")).await.unwrap();
        let b = pipeline.upload(&encoded(b"abc")).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(host.calls(), 1);
        assert_eq!(pipeline.cache_len(), 1);
        assert_eq!(pipeline.cached_url(&content_id(b"abc")), Some(a));
    }

    #[tokio::test]
    async fn different_bytes_upload_separately() {
        let host = Arc::new(CountingHost::new(false, 0));
        let pipeline = pipeline(host.clone());

        pipeline.upload(&encoded(b"one")).await.unwrap();
        pipeline.upload(&encoded(b"two")).await.unwrap();
        assert_eq!(host.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_uploads_are_single_flight() {
        let host = Arc::new(CountingHost::new(false, 50));
        let pipeline = pipeline(host.clone());
        let image = encoded(b"same content");

        let (a, b, c) = tokio::join!(
            pipeline.upload(&image),
            pipeline.upload(&image),
            pipeline.upload(&image)
        );
        let a = a.unwrap();
        assert_eq!(a, b.unwrap());
        assert_eq!(a, c.unwrap());
        assert_eq!(host.calls(), 1);
        assert!(pipeline.in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn failure_is_not_cached() {
        let host = Arc::new(CountingHost::new(true, 0));
        let pipeline = pipeline(host.clone());

        let err = pipeline.upload(&encoded(b"x")).await.unwrap_err();
        assert!(matches!(err, CoreError::Upload { status: Some(400), .. }));
        assert_eq!(pipeline.cache_len(), 0);

        assert!(pipeline.upload(&encoded(b"x")).await.is_err());
        assert_eq!(host.calls(), 2);
    }

    #[tokio::test]
    async fn publish_remote_skips_upload() {
        let host = Arc::new(CountingHost::new(false, 0));
        let pipeline = pipeline(host.clone());

        let url = pipeline
            .publish(&BackgroundImage::Remote("https://cdn.example/bg.png".into()))
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/bg.png");
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn publish_embedded_uploads_once_per_content() {
        let host = Arc::new(CountingHost::new(false, 0));
        let pipeline = pipeline(host.clone());
        let bg = embedded_png(1600, 1200, [90, 90, 200, 255]);

        let first = pipeline.publish(&bg).await.unwrap();
        let second = pipeline.publish(&bg).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(host.calls(), 1);
    }

    #[tokio::test]
    async fn publish_blob_is_read_error() {
        let host = Arc::new(CountingHost::new(false, 0));
        let pipeline = pipeline(host.clone());

        let err = pipeline
            .publish(&BackgroundImage::Embedded("blob:http://localhost/1".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Read(_)));
        assert_eq!(host.calls(), 0);
    }
}
