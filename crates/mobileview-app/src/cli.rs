//! 명령줄 인자 정의.

use clap::{Parser, Subcommand};
use mobileview_core::models::settings::{BackgroundSize, DevicePosition, SettingsPatch};

/// MobileView: 웹사이트를 모바일 기기 프레임 안에서 미리보고 공유 링크를 만든다
#[derive(Parser, Debug)]
#[command(name = "mobileview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    pub log_level: String,

    /// 데이터 저장 경로 (기본: 플랫폼 데이터 디렉토리)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// 인메모리 저장소 사용 (설정을 디스크에 남기지 않음)
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 현재 상태와 레이아웃을 JSON으로 출력
    Show {
        /// 공유 링크 쿼리로 초기화 (저장하지 않음)
        #[arg(long)]
        query: Option<String>,
    },
    /// 공유 링크(또는 쿼리)를 열고 결과 설정을 저장
    Open {
        /// 공유 링크 전체 주소 또는 쿼리 문자열
        link: String,
    },
    /// 웹사이트 로드 (스킴이 없으면 https:// 추가)
    Load {
        url: String,
    },
    /// 기기/표시 설정 변경
    Set(SetArgs),
    /// 배경 이미지 설정 (파일 경로 또는 이미지 URL)
    Background {
        /// 이미지 파일 경로 또는 http(s) URL
        #[arg(required_unless_present = "clear")]
        source: Option<String>,

        /// 배경 제거
        #[arg(long, conflicts_with = "source")]
        clear: bool,
    },
    /// 공유 링크 생성 (로컬 배경은 업로드)
    Share {
        /// 터미널 클립보드(OSC 52)로 복사
        #[arg(long)]
        copy: bool,
    },
    /// 설정 초기화
    Reset,
    /// 현재 설정 파일 출력
    Config {
        /// 설정 파일 경로만 출력
        #[arg(long)]
        path: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct SetArgs {
    /// 기기 너비 (200–600, 범위 밖은 클램프)
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// 기기 높이 (400–1200, 범위 밖은 클램프)
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<i64>,

    /// 배경 맞춤 방식 (cover, contain, stretch, center)
    #[arg(long, value_parser = parse_background_size)]
    pub bg_size: Option<BackgroundSize>,

    /// 기기 가로 배치 (center, left, right)
    #[arg(long, value_parser = parse_position)]
    pub position: Option<DevicePosition>,

    /// 기기 프레임 표시
    #[arg(long)]
    pub frame: Option<bool>,

    /// 임베드 스크롤바 숨김
    #[arg(long)]
    pub scrollbar: Option<bool>,
}

impl SetArgs {
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            background_size: self.bg_size,
            device_width: self.width,
            device_height: self.height,
            show_frame: self.frame,
            device_position: self.position,
            hide_scrollbar: self.scrollbar,
            ..Default::default()
        }
    }
}

fn parse_background_size(value: &str) -> Result<BackgroundSize, String> {
    BackgroundSize::parse(value).ok_or_else(|| {
        let all: Vec<&str> = BackgroundSize::ALL.iter().map(|s| s.as_str()).collect();
        format!("알 수 없는 배경 맞춤 방식: {value} ({})", all.join(", "))
    })
}

fn parse_position(value: &str) -> Result<DevicePosition, String> {
    DevicePosition::parse(value).ok_or_else(|| {
        let all: Vec<&str> = DevicePosition::ALL.iter().map(|p| p.as_str()).collect();
        format!("알 수 없는 배치: {value} ({})", all.join(", "))
    })
}
