//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// 2xx以外のレスポンス（サーバーメッセージがあればそれを保持）
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    /// `{data: ...}` エンベロープの形式不正
    #[error("Envelope error: {0}")]
    Envelope(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// ユーザーに見せる短いメッセージ
    ///
    /// HTTPエラーはサーバーのメッセージをそのまま返す。
    pub fn user_message(&self) -> String {
        match self {
            Error::Http { message, .. } => message.clone(),
            Error::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_http() {
        let error = Error::Http {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(error.to_string(), "HTTP 500: Internal Server Error");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let error = Error::Http {
            status: 400,
            message: "이미 존재하는 시즌 순서입니다.".to_string(),
        };
        assert_eq!(error.user_message(), "이미 존재하는 시즌 순서입니다.");

        let error = Error::Validation("영혼 이름을 입력해주세요.".to_string());
        assert_eq!(error.user_message(), "영혼 이름을 입력해주세요.");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Config("테스트".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Config"));
        assert!(debug.contains("테스트"));
    }
}
