//! MobileView 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환한다.
//! `Read`/`Upload`는 컨트롤러가 사용자 알림으로 변환하고,
//! `Storage`/`Validation`은 경계에서 흡수된다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 이미지 디코딩 또는 파일 읽기 실패
    #[error("이미지 읽기 실패: {0}")]
    Read(String),

    /// 이미지 호스팅 업로드 실패 (네트워크/HTTP/API 거부)
    #[error("업로드 실패{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upload {
        /// 호스트 응답 상태 코드 (전송 실패 시 None)
        status: Option<u16>,
        /// 호스트 메시지 또는 전송 에러
        message: String,
    },

    /// 로컬 키-값 저장소 읽기/쓰기 실패
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 ({field}): {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// 사용자에게 알림으로 노출해야 하는 에러인지 여부
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_error_message_includes_status() {
        let err = CoreError::Upload {
            status: Some(400),
            message: "Invalid API v1 key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(400)"));
        assert!(msg.contains("Invalid API v1 key"));
    }

    #[test]
    fn upload_error_without_status() {
        let err = CoreError::Upload {
            status: None,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "업로드 실패: connection refused");
    }

    #[test]
    fn storage_and_validation_are_absorbed() {
        assert!(!CoreError::Storage("quota".to_string()).is_user_visible());
        assert!(!CoreError::validation("deviceWidth", "숫자 아님").is_user_visible());
        assert!(CoreError::Read("bad png".to_string()).is_user_visible());
    }
}
