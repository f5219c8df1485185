//! # mobileview-controller
//!
//! 뷰어 상태의 단일 진실 공급원.
//! 시작 시 URL 쿼리, 저장된 설정, 기본값을 병합하고 이후 모든 변경을
//! 중재한다. 공유 링크 생성(필요 시 배경 업로드 포함), 알림 목록,
//! 프레젠테이션 레이어가 쓰는 순수 레이아웃 파생 함수를 제공한다.

pub mod controller;
pub mod generation;
pub mod layout;
pub mod notifications;
pub mod share;

pub use controller::{CopyOutcome, ViewerController, ViewerSnapshot};
pub use generation::{LoadToken, ShareTicket};
