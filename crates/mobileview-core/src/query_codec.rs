//! 공유 링크 쿼리 코덱.
//!
//! 설정 레코드 ↔ 쿼리 문자열 양방향 변환.
//! 링크를 짧게 유지하기 위해 `url`/`bgUrl`은 값이 있으면 항상,
//! 나머지 필드는 기본값과 다를 때만 내보낸다.

use url::form_urlencoded;

use crate::models::background::BackgroundImage;
use crate::models::settings::{BackgroundSize, DevicePosition, SettingsPatch, SettingsRecord};

/// 쿼리 키
pub mod keys {
    pub const URL: &str = "url";
    pub const BG_URL: &str = "bgUrl";
    pub const BG_SIZE: &str = "bgSize";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const FRAME: &str = "frame";
    pub const POSITION: &str = "position";
    pub const SCROLLBAR: &str = "scrollbar";
}

/// 쿼리 문자열을 부분 레코드로 디코딩
///
/// 쿼리가 비어 있으면 None. 인식하지 못한 키와 잘못된 값은 무시된다.
/// 같은 키가 여러 번 나오면 첫 번째 값을 쓴다.
/// 범위를 벗어난 너비/높이는 병합 시 클램프된다.
pub fn decode(query: &str) -> Option<SettingsPatch> {
    let query = query.trim().trim_start_matches('?');
    if query.is_empty() {
        return None;
    }

    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let get = |key: &str| -> Option<&str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let mut patch = SettingsPatch::default();

    if let Some(url) = get(keys::URL).filter(|v| !v.is_empty()) {
        patch.website_url = Some(url.to_string());
    }
    if let Some(bg) = get(keys::BG_URL).filter(|v| !v.trim().is_empty()) {
        patch.background_image = Some(Some(BackgroundImage::Remote(bg.trim().to_string())));
    }
    if let Some(size) = get(keys::BG_SIZE).and_then(BackgroundSize::parse) {
        patch.background_size = Some(size);
    }
    if let Some(width) = get(keys::WIDTH).and_then(parse_dimension) {
        patch.device_width = Some(width);
    }
    if let Some(height) = get(keys::HEIGHT).and_then(parse_dimension) {
        patch.device_height = Some(height);
    }
    if let Some(frame) = get(keys::FRAME) {
        patch.show_frame = Some(frame == "1");
    }
    if let Some(position) = get(keys::POSITION).and_then(DevicePosition::parse) {
        patch.device_position = Some(position);
    }
    if let Some(scrollbar) = get(keys::SCROLLBAR) {
        patch.hide_scrollbar = Some(scrollbar != "0");
    }

    Some(patch)
}

/// 쿼리를 기본값 위에 병합한 완전한 레코드 (클램프 적용)
pub fn decode_record(query: &str) -> Option<SettingsRecord> {
    decode(query).map(|patch| SettingsRecord::merged([&patch]))
}

fn parse_dimension(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// 레코드를 쿼리 문자열로 인코딩 (`?` 제외)
///
/// 배경은 원격 URL일 때만 `bgUrl`로 나간다. 로컬 이미지는
/// 호출자가 먼저 업로드해 원격 참조로 바꿔야 한다.
pub fn encode(record: &SettingsRecord) -> String {
    let defaults = SettingsRecord::default();
    let mut out = form_urlencoded::Serializer::new(String::new());

    if !record.website_url.is_empty() {
        out.append_pair(keys::URL, &record.website_url);
    }
    if let Some(bg) = record
        .background_image
        .as_ref()
        .and_then(BackgroundImage::remote_url)
    {
        out.append_pair(keys::BG_URL, bg);
    }
    if record.background_size != defaults.background_size {
        out.append_pair(keys::BG_SIZE, record.background_size.as_str());
    }
    if record.device_width != defaults.device_width {
        out.append_pair(keys::WIDTH, &record.device_width.to_string());
    }
    if record.device_height != defaults.device_height {
        out.append_pair(keys::HEIGHT, &record.device_height.to_string());
    }
    if record.show_frame != defaults.show_frame {
        out.append_pair(keys::FRAME, flag(record.show_frame));
    }
    if record.device_position != defaults.device_position {
        out.append_pair(keys::POSITION, record.device_position.as_str());
    }
    if record.hide_scrollbar != defaults.hide_scrollbar {
        out.append_pair(keys::SCROLLBAR, flag(record.hide_scrollbar));
    }

    out.finish()
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// 기준 주소(origin + path)에 쿼리를 붙여 공유 링크 생성
pub fn share_url(base: &str, record: &SettingsRecord) -> String {
    let base = strip_query(base);
    let query = encode(record);
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// 주소에서 쿼리와 프래그먼트를 제거
pub fn strip_query(address: &str) -> &str {
    let end = address.find(['?', '#']).unwrap_or(address.len());
    &address[..end]
}

/// 전체 주소 또는 쿼리 문자열에서 쿼리 부분만 추출
pub fn query_part(input: &str) -> &str {
    let input = input.trim();
    match input.find('?') {
        Some(idx) => {
            let rest = &input[idx + 1..];
            rest.split('#').next().unwrap_or_default()
        }
        None if input.contains('=') => input,
        None => "",
    }
}
