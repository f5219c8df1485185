//! MobileView 도메인 모델.
//!
//! 설정 레코드(저장/공유 대상)와 뷰 상태(일시적)를 분리해 정의한다.

pub mod background;
pub mod settings;
pub mod view_state;
