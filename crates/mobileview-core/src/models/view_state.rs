//! 일시적 뷰 상태.
//!
//! 저장/공유되지 않으며 매 초기화 시 새로 만들어진다.

use serde::Serialize;

/// 뷰 상태 플래그
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// 컨트롤 패널 최소화 여부
    pub panel_minimized: bool,
    /// 프레임 표시 여부 (websiteUrl이 비어있지 않을 때만 true)
    pub site_loaded: bool,
    /// 로드 요청 ~ 프레임 로드 완료 사이
    pub is_loading: bool,
    /// 마지막으로 생성된 공유 링크
    pub share_link: Option<String>,
}

impl ViewState {
    /// 설정 레코드로부터 초기 상태 생성
    pub fn fresh(site_loaded: bool) -> Self {
        Self {
            site_loaded,
            ..Default::default()
        }
    }
}
