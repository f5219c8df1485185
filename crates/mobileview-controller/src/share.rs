//! 공유 링크 생성 요청.
//!
//! 컨트롤러가 스냅샷과 토큰을 담아 요청을 만들고, 요청은 컨트롤러를
//! 빌리지 않은 채 비동기로 실행된다. 결과는 `complete_share`로 돌려준다.

use crate::generation::ShareTicket;
use mobileview_core::error::CoreError;
use mobileview_core::models::background::BackgroundImage;
use mobileview_core::models::settings::SettingsRecord;
use mobileview_core::query_codec;
use mobileview_vision::pipeline::ImagePipeline;
use std::sync::Arc;
use tracing::{info, warn};

/// 진행 중인 공유 링크 생성 요청
pub struct ShareRequest {
    ticket: ShareTicket,
    record: SettingsRecord,
    base_url: String,
    pipeline: Arc<ImagePipeline>,
}

/// 공유 링크 생성 결과
#[derive(Debug)]
pub struct ShareOutcome {
    pub ticket: ShareTicket,
    /// 생성된 링크 (업로드 실패 시 배경 없이)
    pub link: String,
    /// 배경 업로드 실패 사유
    pub upload_error: Option<CoreError>,
}

impl ShareRequest {
    pub(crate) fn new(
        ticket: ShareTicket,
        record: SettingsRecord,
        base_url: String,
        pipeline: Arc<ImagePipeline>,
    ) -> Self {
        Self {
            ticket,
            record,
            base_url,
            pipeline,
        }
    }

    /// 요청 실행: 필요하면 배경을 업로드한 뒤 링크를 인코딩
    pub async fn run(self) -> ShareOutcome {
        let mut record = self.record;
        let mut upload_error = None;

        if let Some(background) = record.background_image.take() {
            match self.pipeline.publish(&background).await {
                Ok(url) => {
                    record.background_image = Some(BackgroundImage::Remote(url));
                }
                Err(e) => {
                    warn!("배경 업로드 실패, 배경 없이 링크 생성: {e}");
                    upload_error = Some(e);
                }
            }
        }

        let link = query_codec::share_url(&self.base_url, &record);
        info!("공유 링크 생성: {link}");

        ShareOutcome {
            ticket: self.ticket,
            link,
            upload_error,
        }
    }
}
