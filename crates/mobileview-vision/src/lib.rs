//! # mobileview-vision
//!
//! 배경 이미지 파이프라인 크레이트.
//! 사용자가 고른 이미지(파일, 드래그 앤 드롭, 원격 URL)를 표시 가능한
//! 배경 참조로 바꾸고, 공유가 필요할 때만 재인코딩 후 이미지 호스트에
//! 업로드한다. 업로드 결과는 콘텐츠 해시로 캐싱된다.

pub mod embed;
pub mod hash;
pub mod optimize;
pub mod pipeline;
