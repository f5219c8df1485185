//! 뷰어 상태 컨트롤러.
//!
//! 설정 레코드와 뷰 상태를 소유하고 모든 변경을 중재한다.
//! 시작 병합 순서: 기본값 < 저장된 설정 < URL 쿼리 (필드 단위).
//! 비동기 완료(프레임 로드, 공유 링크)는 세대 토큰으로 걸러 오래된 결과를
//! 무시한다.

use crate::generation::{Generation, LoadToken, ShareTicket};
use crate::layout::{self, Layout};
use crate::notifications::NotificationCenter;
use crate::share::{ShareOutcome, ShareRequest};
use mobileview_core::config::ViewerConfig;
use mobileview_core::error::CoreError;
use mobileview_core::models::settings::{SettingsPatch, SettingsRecord};
use mobileview_core::models::view_state::ViewState;
use mobileview_core::ports::clipboard::Clipboard;
use mobileview_core::query_codec;
use mobileview_storage::settings_store::{SettingsStore, StoredSettings};
use mobileview_vision::embed::ImageSource;
use mobileview_vision::pipeline::ImagePipeline;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 설정 레코드 + 뷰 상태 스냅샷
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSnapshot {
    #[serde(flatten)]
    pub settings: SettingsRecord,
    #[serde(flatten)]
    pub view: ViewState,
}

/// 클립보드 복사 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// 클립보드에 기록됨
    Copied,
    /// 클립보드 실패, 링크 텍스트를 직접 선택해야 함
    ManualSelection(String),
    /// 생성된 링크가 없음
    NothingToCopy,
}

/// 웹사이트 URL 정규화
///
/// 앞뒤 공백을 제거하고, `http`로 시작하지 않으면 `https://`를 붙인다.
pub fn normalize_site_url(input: &str) -> Result<String, CoreError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(CoreError::validation("websiteUrl", "URL을 입력해 주세요"));
    }
    if url.starts_with("http") {
        Ok(url.to_string())
    } else {
        Ok(format!("https://{url}"))
    }
}

/// 뷰어 상태 컨트롤러
pub struct ViewerController {
    record: SettingsRecord,
    view: ViewState,
    store: SettingsStore,
    pipeline: Arc<ImagePipeline>,
    share_base: String,
    notifications: NotificationCenter,
    load_generation: Generation,
    share_generation: Generation,
    /// 초기화 직후 레코드 (첫 변경에서만 사용)
    initial_record: Option<SettingsRecord>,
    query_consumed: bool,
    drag_over: bool,
}

impl ViewerController {
    /// 세 가지 소스를 병합해 초기 상태 생성
    pub fn initialize(
        query: &str,
        store: SettingsStore,
        pipeline: Arc<ImagePipeline>,
        config: &ViewerConfig,
    ) -> Self {
        let url_patch = query_codec::decode(query);
        let stored = match store.load() {
            StoredSettings::Loaded(patch) => Some(patch),
            StoredSettings::Missing => None,
            StoredSettings::Corrupt(reason) => {
                warn!("손상된 저장 설정 무시: {reason}");
                None
            }
            StoredSettings::Unavailable(reason) => {
                warn!("저장소 접근 불가, 기본값 사용: {reason}");
                None
            }
        };

        let record = SettingsRecord::merged(stored.iter().chain(url_patch.iter()));
        let view = ViewState::fresh(record.has_site());

        info!(
            "뷰어 초기화: site={}, 쿼리={}, 저장={}",
            if record.has_site() { record.website_url.as_str() } else { "-" },
            url_patch.is_some(),
            stored.is_some()
        );

        Self {
            initial_record: Some(record.clone()),
            record,
            view,
            store,
            pipeline,
            share_base: config.share.base_url.clone(),
            notifications: NotificationCenter::new(config.notification.auto_dismiss_ms),
            load_generation: Generation::default(),
            share_generation: Generation::default(),
            query_consumed: url_patch.is_some(),
            drag_over: false,
        }
    }

    /// 초기화에서 URL 쿼리를 사용했는지 (표시 주소에서 쿼리를 제거해야 함)
    pub fn should_strip_query(&self) -> bool {
        self.query_consumed
    }

    pub fn record(&self) -> &SettingsRecord {
        &self.record
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            settings: self.record.clone(),
            view: self.view.clone(),
        }
    }

    /// 현재 상태의 레이아웃
    pub fn layout(&self) -> Layout {
        layout::layout(&self.record, &self.view, self.drag_over)
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn pipeline(&self) -> &Arc<ImagePipeline> {
        &self.pipeline
    }

    /// 부분 레코드 병합 후 클램프, 저장
    ///
    /// `website_url`이 포함되면 새 로드로 취급해 이전 로드 토큰을 무효화한다.
    pub fn update(&mut self, patch: &SettingsPatch) {
        if patch.is_empty() {
            return;
        }
        if let Some(url) = &patch.website_url {
            self.begin_load(url);
        }
        self.record.apply(patch);
        self.record = std::mem::take(&mut self.record).clamp();
        self.persist_after_mutation();
    }

    /// 웹사이트 URL 설정, 로드 토큰 반환
    ///
    /// 비어있지 않은 URL이면 로딩이 시작된다.
    pub fn set_website_url(&mut self, url: &str) -> LoadToken {
        let token = self.begin_load(url);
        self.persist_after_mutation();
        token
    }

    fn begin_load(&mut self, url: &str) -> LoadToken {
        self.record.website_url = url.to_string();
        self.view.site_loaded = self.record.has_site();
        self.view.is_loading = self.view.site_loaded;
        let token = LoadToken(self.load_generation.advance());
        debug!("사이트 로드 요청 #{}: {url}", token.0);
        token
    }

    /// 입력값을 정규화해 사이트 로드
    ///
    /// 빈 입력은 에러 알림만 남기고 상태를 바꾸지 않는다.
    pub fn load_site(&mut self, input: &str) -> Option<LoadToken> {
        match normalize_site_url(input) {
            Ok(url) => Some(self.set_website_url(&url)),
            Err(e) => {
                debug!("사이트 URL 거부: {e}");
                self.notifications.error("올바른 URL을 입력해 주세요");
                None
            }
        }
    }

    /// 프레임 로드 완료 (현재 세대의 토큰만 적용)
    ///
    /// 로드 실패 콜백은 없다. 실패한 로드는 `is_loading`을 true로 남긴다.
    pub fn on_frame_loaded(&mut self, token: LoadToken) -> bool {
        if !self.load_generation.is_current(token.0) {
            debug!("오래된 프레임 로드 완료 무시 #{}", token.0);
            return false;
        }
        self.view.is_loading = false;
        true
    }

    pub fn set_panel_minimized(&mut self, minimized: bool) {
        self.view.panel_minimized = minimized;
    }

    /// 드래그 중 표시 (뷰어 영역 강조)
    pub fn set_drag_over(&mut self, active: bool) {
        self.drag_over = active;
    }

    /// 이미지 소스를 배경으로 적용
    ///
    /// 읽기 실패는 에러 알림으로 바꾸고 기존 배경을 유지한다.
    pub fn set_background(&mut self, source: ImageSource) -> bool {
        self.drag_over = false;
        match self.pipeline.to_displayable(source) {
            Ok(background) => {
                self.update(&SettingsPatch {
                    background_image: Some(Some(background)),
                    ..Default::default()
                });
                self.notifications.success("배경 이미지가 적용되었습니다");
                true
            }
            Err(e) => {
                warn!("배경 이미지 적용 실패: {e}");
                if e.is_user_visible() {
                    self.notifications.error(format!("이미지를 불러오지 못했습니다: {e}"));
                }
                false
            }
        }
    }

    /// 배경 제거
    pub fn clear_background(&mut self) {
        if self.record.background_image.is_none() {
            return;
        }
        self.update(&SettingsPatch {
            background_image: Some(None),
            ..Default::default()
        });
        self.notifications.info("배경 이미지를 제거했습니다");
    }

    /// 저장소를 비우고 모든 상태를 기본값으로 되돌림
    ///
    /// 진행 중인 로드/공유 완료는 이후 무시된다.
    pub fn reset(&mut self) {
        self.store.clear();
        self.record = SettingsRecord::default();
        self.view = ViewState::default();
        self.drag_over = false;
        self.initial_record = None;
        self.load_generation.advance();
        self.share_generation.advance();
        info!("설정 초기화");
        self.notifications.info("설정이 초기화되었습니다");
    }

    /// 공유 링크 생성 시작
    ///
    /// 현재 레코드 스냅샷을 담은 요청을 반환한다. 요청 실행 중에도
    /// 컨트롤러는 계속 변경될 수 있다.
    pub fn begin_share(&mut self) -> ShareRequest {
        let ticket = ShareTicket(self.share_generation.advance());
        self.notifications.info("링크 생성 중...");
        ShareRequest::new(
            ticket,
            self.record.clone(),
            self.share_base.clone(),
            self.pipeline.clone(),
        )
    }

    /// 공유 링크 생성 결과 적용 (현재 세대만)
    pub fn complete_share(&mut self, outcome: ShareOutcome) -> Option<String> {
        if !self.share_generation.is_current(outcome.ticket.0) {
            debug!("오래된 공유 링크 결과 무시 #{}", outcome.ticket.0);
            return None;
        }

        if let Some(e) = &outcome.upload_error {
            self.notifications
                .error(format!("배경 업로드 실패로 배경 없이 링크를 만들었습니다: {e}"));
        } else {
            self.notifications.success("링크가 생성되었습니다");
        }

        self.view.share_link = Some(outcome.link.clone());
        Some(outcome.link)
    }

    /// 공유 링크 생성 (시작 → 실행 → 적용)
    pub async fn generate_share_link(&mut self) -> Option<String> {
        let request = self.begin_share();
        let outcome = request.run().await;
        self.complete_share(outcome)
    }

    /// 생성된 링크를 클립보드에 복사
    pub fn copy_share_link(&mut self, clipboard: &dyn Clipboard) -> CopyOutcome {
        let Some(link) = self.view.share_link.clone() else {
            return CopyOutcome::NothingToCopy;
        };
        match clipboard.write_text(&link) {
            Ok(()) => {
                self.notifications.success("링크를 복사했습니다");
                CopyOutcome::Copied
            }
            Err(e) => {
                warn!("클립보드 쓰기 실패: {e}");
                self.notifications.info("링크를 직접 선택해 복사하세요");
                CopyOutcome::ManualSelection(link)
            }
        }
    }

    /// 현재 레코드를 즉시 저장
    pub fn persist(&self) -> bool {
        self.store.save(&self.record)
    }

    /// 변경 후 저장
    ///
    /// 초기화 직후 첫 변경이 레코드를 바꾸지 않았다면 저장을 생략한다.
    fn persist_after_mutation(&mut self) {
        if let Some(initial) = self.initial_record.take() {
            if initial == self.record {
                debug!("초기 상태와 동일, 저장 생략");
                return;
            }
        }
        self.store.save(&self.record);
    }
}
