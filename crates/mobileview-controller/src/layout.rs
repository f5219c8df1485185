//! 스냅샷 → 프레젠테이션 파생값.
//!
//! 모두 순수 함수다. 스크롤바 숨김은 임베드 노드를 감싸고 푸는 대신
//! 두 가지 선언적 컨테이너 레이아웃 중 하나를 고르는 것으로 표현한다.

use mobileview_core::models::settings::{BackgroundSize, SettingsRecord};
use mobileview_core::models::view_state::ViewState;
use serde::Serialize;

/// 임베드 컨테이너 레이아웃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FrameLayout {
    /// 화면에 임베드를 직접 배치
    Direct,
    /// 스크롤바를 가리는 래퍼 안에 배치
    ScrollbarMasked,
}

impl FrameLayout {
    pub fn for_record(record: &SettingsRecord) -> Self {
        if record.hide_scrollbar {
            Self::ScrollbarMasked
        } else {
            Self::Direct
        }
    }
}

/// 뷰어 영역 배경 스타일
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundStyle {
    pub background_image: String,
    pub background_size: &'static str,
    pub background_repeat: &'static str,
    pub background_position: &'static str,
}

/// 배경 스타일 (배경이 없으면 None)
pub fn background_style(record: &SettingsRecord) -> Option<BackgroundStyle> {
    let image = record.background_image.as_ref()?;
    Some(BackgroundStyle {
        background_image: image.to_css(),
        background_size: css_background_size(record.background_size),
        background_repeat: "no-repeat",
        background_position: "center",
    })
}

/// CSS `background-size` 값 (stretch는 `100% 100%`)
pub fn css_background_size(size: BackgroundSize) -> &'static str {
    match size {
        BackgroundSize::Stretch => "100% 100%",
        other => other.as_str(),
    }
}

/// 뷰어 영역 클래스
pub fn viewer_classes(record: &SettingsRecord, drag_over: bool) -> Vec<String> {
    let mut classes = vec![
        "viewer-area".to_string(),
        format!("position-{}", record.device_position.as_str()),
    ];
    if drag_over {
        classes.push("drag-over".to_string());
    }
    classes
}

/// 기기 프레임 클래스
pub fn frame_classes(record: &SettingsRecord, view: &ViewState) -> Vec<&'static str> {
    let mut classes = vec!["device-frame", "active"];
    if !record.show_frame {
        classes.push("no-frame");
    }
    if view.is_loading {
        classes.push("loading");
    }
    classes
}

/// 화면 크기 스타일 (px)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenStyle {
    pub width: String,
    pub height: String,
}

pub fn screen_style(record: &SettingsRecord) -> ScreenStyle {
    ScreenStyle {
        width: format!("{}px", record.device_width),
        height: format!("{}px", record.device_height),
    }
}

/// 한 번에 계산한 레이아웃 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub container_classes: Vec<&'static str>,
    pub viewer_classes: Vec<String>,
    pub background: Option<BackgroundStyle>,
    /// 사이트가 없으면 프레임을 그리지 않음
    pub frame: Option<FrameView>,
    pub placeholder_visible: bool,
    pub show_notch: bool,
    pub show_maximize_button: bool,
}

/// 프레임 렌더링 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameView {
    pub src: String,
    pub classes: Vec<&'static str>,
    pub screen: ScreenStyle,
    pub layout: FrameLayout,
}

/// 전체 레이아웃 계산
pub fn layout(record: &SettingsRecord, view: &ViewState, drag_over: bool) -> Layout {
    let frame = view.site_loaded.then(|| FrameView {
        src: record.website_url.clone(),
        classes: frame_classes(record, view),
        screen: screen_style(record),
        layout: FrameLayout::for_record(record),
    });

    let mut container_classes = vec!["container"];
    if view.panel_minimized {
        container_classes.push("fullscreen");
    }

    Layout {
        container_classes,
        viewer_classes: viewer_classes(record, drag_over),
        background: background_style(record),
        frame,
        placeholder_visible: !view.site_loaded,
        show_notch: view.site_loaded && record.show_frame,
        show_maximize_button: view.panel_minimized,
    }
}
