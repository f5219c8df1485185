//! ImgBB 이미지 호스팅 클라이언트.
//!
//! `ImageHost` 포트 구현. multipart 폼(`key`, `image`)으로 업로드하고
//! 응답 JSON의 `data.url`을 공개 URL로 사용한다. 별도 타임아웃은 두지 않는다.

use async_trait::async_trait;
use mobileview_core::config::UploadConfig;
use mobileview_core::error::CoreError;
use mobileview_core::ports::image_host::{EncodedImage, ImageHost};
use serde::Deserialize;
use tracing::{debug, warn};

/// 업로드 파일 이름
const UPLOAD_FILE_NAME: &str = "background.jpg";

/// ImgBB 응답 본문
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: Option<String>,
}

/// ImgBB 클라이언트
pub struct ImgbbClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ImgbbClient {
    /// 업로드 설정으로 클라이언트 생성
    pub fn new(config: &UploadConfig) -> Result<Self, CoreError> {
        Self::with_endpoint(&config.endpoint, &config.api_key)
    }

    /// 엔드포인트와 API 키를 직접 지정해 생성
    pub fn with_endpoint(endpoint: &str, api_key: &str) -> Result<Self, CoreError> {
        if endpoint.trim().is_empty() {
            return Err(CoreError::Config("업로드 엔드포인트가 비어 있습니다".to_string()));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim().to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// 업로드 엔드포인트
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageHost for ImgbbClient {
    async fn upload(&self, image: &EncodedImage) -> Result<String, CoreError> {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(&image.mime)
            .map_err(|e| CoreError::Upload {
                status: None,
                message: format!("잘못된 MIME 타입: {e}"),
            })?;
        let form = reqwest::multipart::Form::new()
            .text("key", self.api_key.clone())
            .part("image", part);

        debug!(
            "이미지 업로드 요청: {} ({} bytes, {}x{})",
            self.endpoint,
            image.bytes.len(),
            image.width,
            image.height
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::Upload {
                status: None,
                message: format!("요청 전송 실패: {e}"),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| CoreError::Upload {
            status: Some(status.as_u16()),
            message: format!("응답 본문 읽기 실패: {e}"),
        })?;

        parse_response(status.as_u16(), status.is_success(), &text)
    }
}

/// 응답 상태와 본문을 공개 URL 또는 업로드 에러로 변환
fn parse_response(status: u16, is_success: bool, body: &str) -> Result<String, CoreError> {
    let parsed: Option<UploadResponse> = serde_json::from_str(body).ok();

    if !is_success {
        let message = parsed
            .and_then(|r| r.error)
            .and_then(|e| e.message)
            .unwrap_or_else(|| fallback_message(body));
        warn!("이미지 호스트 거부 ({status}): {message}");
        return Err(CoreError::Upload {
            status: Some(status),
            message,
        });
    }

    let Some(parsed) = parsed else {
        return Err(CoreError::Upload {
            status: Some(status),
            message: format!("응답 JSON 파싱 실패: {}", fallback_message(body)),
        });
    };

    if !parsed.success {
        let message = parsed
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "호스트가 업로드를 거부했습니다".to_string());
        return Err(CoreError::Upload {
            status: Some(status),
            message,
        });
    }

    match parsed.data.and_then(|d| d.url) {
        Some(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(CoreError::Upload {
            status: Some(status),
            message: "응답에 이미지 URL이 없습니다".to_string(),
        }),
    }
}

fn fallback_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "빈 응답".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}
