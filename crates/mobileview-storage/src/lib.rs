//! # mobileview-storage
//!
//! 로컬 저장소 어댑터.
//! 브라우저 로컬 저장소 역할의 키-값 저장소와
//! 그 위에서 설정 레코드를 읽고 쓰는 영속화 어댑터를 제공한다.
//!
//! ## 모듈
//! - `sqlite`: 파일 기반 키-값 저장소 (KeyValueStore 구현)
//! - `memory`: 인메모리 키-값 저장소 (테스트/임시 세션)
//! - `settings_store`: 설정 레코드 로드/저장/삭제 (에러는 흡수)
//! - `migration`: 스키마 마이그레이션

pub mod memory;
pub mod migration;
pub mod settings_store;
pub mod sqlite;
