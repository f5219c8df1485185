//! 뷰 설정 레코드.
//!
//! 로컬 저장소에 저장되고 공유 링크로 인코딩되는 유일한 데이터.
//! 기기 크기는 어떤 경로(URL, 저장소, 사용자 입력)로 들어오든
//! 동일한 범위로 클램프된다.

use serde::{Deserialize, Serialize};

use super::background::BackgroundImage;

/// 기기 너비 최소값 (px)
pub const MIN_DEVICE_WIDTH: u32 = 200;
/// 기기 너비 최대값 (px)
pub const MAX_DEVICE_WIDTH: u32 = 600;
/// 기기 높이 최소값 (px)
pub const MIN_DEVICE_HEIGHT: u32 = 400;
/// 기기 높이 최대값 (px)
pub const MAX_DEVICE_HEIGHT: u32 = 1200;

/// 기본 기기 너비 (iPhone X 계열)
pub const DEFAULT_DEVICE_WIDTH: u32 = 375;
/// 기본 기기 높이
pub const DEFAULT_DEVICE_HEIGHT: u32 = 812;

/// 배경 이미지 맞춤 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
    Stretch,
    Center,
}

impl BackgroundSize {
    /// 전체 값 목록
    pub const ALL: [BackgroundSize; 4] = [Self::Cover, Self::Contain, Self::Stretch, Self::Center];

    /// 쿼리/저장 문자열 표현
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::Contain => "contain",
            Self::Stretch => "stretch",
            Self::Center => "center",
        }
    }

    /// 알려진 값만 허용 (그 외는 None → 기본값 적용)
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

/// 기기 가로 배치
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePosition {
    #[default]
    Center,
    Left,
    Right,
}

impl DevicePosition {
    /// 전체 값 목록
    pub const ALL: [DevicePosition; 3] = [Self::Center, Self::Left, Self::Right];

    /// 쿼리/저장 문자열 표현
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// 알려진 값만 허용
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }
}

/// 기기 너비를 허용 범위로 클램프
pub fn clamp_width(value: i64) -> u32 {
    value.clamp(MIN_DEVICE_WIDTH as i64, MAX_DEVICE_WIDTH as i64) as u32
}

/// 기기 높이를 허용 범위로 클램프
pub fn clamp_height(value: i64) -> u32 {
    value.clamp(MIN_DEVICE_HEIGHT as i64, MAX_DEVICE_HEIGHT as i64) as u32
}

/// 설정 레코드: 저장/공유 대상 필드 전체
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    /// 임베드할 웹사이트 URL (빈 문자열 = 미로드)
    pub website_url: String,
    /// 배경 이미지 참조 (원격 URL 또는 data URL)
    pub background_image: Option<BackgroundImage>,
    /// 배경 맞춤 방식
    pub background_size: BackgroundSize,
    /// 기기 너비 (200–600)
    pub device_width: u32,
    /// 기기 높이 (400–1200)
    pub device_height: u32,
    /// 기기 프레임 표시
    pub show_frame: bool,
    /// 기기 가로 배치
    pub device_position: DevicePosition,
    /// 임베드 스크롤바 숨김
    pub hide_scrollbar: bool,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            website_url: String::new(),
            background_image: None,
            background_size: BackgroundSize::Cover,
            device_width: DEFAULT_DEVICE_WIDTH,
            device_height: DEFAULT_DEVICE_HEIGHT,
            show_frame: true,
            device_position: DevicePosition::Center,
            hide_scrollbar: true,
        }
    }
}

impl SettingsRecord {
    /// 기기 크기를 범위 안으로 클램프한 복사본 반환 (멱등)
    pub fn clamp(mut self) -> Self {
        self.device_width = clamp_width(self.device_width as i64);
        self.device_height = clamp_height(self.device_height as i64);
        self
    }

    /// 부분 레코드를 필드 단위로 덮어쓴다 (존재하는 필드만)
    ///
    /// 숫자 필드는 여기서 클램프된다.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(url) = &patch.website_url {
            self.website_url = url.clone();
        }
        if let Some(background) = &patch.background_image {
            self.background_image = background.clone();
        }
        if let Some(size) = patch.background_size {
            self.background_size = size;
        }
        if let Some(width) = patch.device_width {
            self.device_width = clamp_width(width);
        }
        if let Some(height) = patch.device_height {
            self.device_height = clamp_height(height);
        }
        if let Some(show) = patch.show_frame {
            self.show_frame = show;
        }
        if let Some(position) = patch.device_position {
            self.device_position = position;
        }
        if let Some(hide) = patch.hide_scrollbar {
            self.hide_scrollbar = hide;
        }
    }

    /// 기본값 위에 부분 레코드들을 순서대로 병합 (뒤의 것이 우선)
    pub fn merged<'a, I>(patches: I) -> Self
    where
        I: IntoIterator<Item = &'a SettingsPatch>,
    {
        let mut record = Self::default();
        for patch in patches {
            record.apply(patch);
        }
        record.clamp()
    }

    /// 사이트가 로드된 상태로 간주되는지 (URL이 비어있지 않음)
    pub fn has_site(&self) -> bool {
        !self.website_url.is_empty()
    }
}

/// 부분 설정 레코드: 각 필드가 독립적으로 선택적
///
/// URL 쿼리, 저장소, 사용자 편집이 모두 이 형태로 표현된다.
/// 숫자 필드는 클램프 전 원시값을 담는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub website_url: Option<String>,
    /// `Some(None)`은 배경 제거를 의미
    pub background_image: Option<Option<BackgroundImage>>,
    pub background_size: Option<BackgroundSize>,
    pub device_width: Option<i64>,
    pub device_height: Option<i64>,
    pub show_frame: Option<bool>,
    pub device_position: Option<DevicePosition>,
    pub hide_scrollbar: Option<bool>,
}

impl SettingsPatch {
    /// 어떤 필드도 담고 있지 않은지
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// 레코드 전체를 담은 부분 레코드
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self {
            website_url: Some(record.website_url.clone()),
            background_image: Some(record.background_image.clone()),
            background_size: Some(record.background_size),
            device_width: Some(record.device_width as i64),
            device_height: Some(record.device_height as i64),
            show_frame: Some(record.show_frame),
            device_position: Some(record.device_position),
            hide_scrollbar: Some(record.hide_scrollbar),
        }
    }
}
