//! 배경 이미지 참조.
//!
//! 저장/표시 형식은 CSS `background-image` 값(`url(...)`)이다.
//! 원격 URL은 그대로 공유 링크에 담기고, data/blob 참조는
//! 공유 전에 이미지 호스트로 업로드되어야 한다.

use serde::{Deserialize, Serialize};

/// 배경 이미지 참조
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackgroundImage {
    /// 원격 이미지 URL (http/https)
    Remote(String),
    /// 로컬에서 만든 자체 포함 이미지 (data URL 또는 blob URL)
    Embedded(String),
}

impl BackgroundImage {
    /// 참조 문자열로부터 분류 (빈 문자열은 None)
    pub fn from_reference(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if is_local_reference(reference) {
            Some(Self::Embedded(reference.to_string()))
        } else {
            Some(Self::Remote(reference.to_string()))
        }
    }

    /// CSS 값(`url(...)`) 또는 순수 참조 문자열을 파싱
    pub fn from_css(value: &str) -> Option<Self> {
        match extract_bg_url(value) {
            Some(reference) => Self::from_reference(reference),
            None if !value.trim_start().starts_with("url(") => Self::from_reference(value),
            None => None,
        }
    }

    /// 내부 참조 문자열
    pub fn reference(&self) -> &str {
        match self {
            Self::Remote(url) | Self::Embedded(url) => url,
        }
    }

    /// CSS `background-image` 값
    pub fn to_css(&self) -> String {
        format!("url({})", self.reference())
    }

    /// 공유 전에 업로드가 필요한지 (로컬 참조인 경우)
    pub fn needs_upload(&self) -> bool {
        match self {
            Self::Embedded(_) => true,
            Self::Remote(url) => is_local_reference(url),
        }
    }

    /// 원격 URL이면 반환
    pub fn remote_url(&self) -> Option<&str> {
        match self {
            Self::Remote(url) if !is_local_reference(url) => Some(url),
            _ => None,
        }
    }
}

fn is_local_reference(reference: &str) -> bool {
    reference.starts_with("data:") || reference.starts_with("blob:")
}

/// CSS `url(...)` 값에서 참조를 추출한다.
///
/// `url("a")`, `url('a')`, `url(a)` 모두 허용.
pub fn extract_bg_url(css_value: &str) -> Option<&str> {
    let start = css_value.find("url(")? + "url(".len();
    let rest = &css_value[start..];
    let end = rest.rfind(')')?;
    let inner = rest[..end].trim();
    let inner = inner
        .strip_prefix(['"', '\''])
        .unwrap_or(inner);
    let inner = inner
        .strip_suffix(['"', '\''])
        .unwrap_or(inner);
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// 배경 참조가 업로드를 필요로 하는지 (없으면 false)
pub fn needs_upload(background: Option<&BackgroundImage>) -> bool {
    background.is_some_and(BackgroundImage::needs_upload)
}

impl TryFrom<String> for BackgroundImage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_css(&value).ok_or_else(|| format!("잘못된 배경 이미지 값: {value}"))
    }
}

impl From<BackgroundImage> for String {
    fn from(value: BackgroundImage) -> Self {
        value.to_css()
    }
}
