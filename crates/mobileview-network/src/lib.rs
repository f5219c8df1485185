//! # mobileview-network
//!
//! 이미지 호스팅 네트워크 어댑터.
//! 최적화된 배경 이미지를 ImgBB 호환 API로 업로드하고 공개 URL을 받는다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use mobileview_network::imgbb::ImgbbClient;
//!
//! let client = ImgbbClient::new(&config.upload)?;
//! let url = client.upload(&encoded).await?;
//! ```

pub mod imgbb;
