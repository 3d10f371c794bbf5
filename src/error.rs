use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkySoulsError {
    /// API・一覧エンジン由来
    #[error(transparent)]
    Common(#[from] sky_souls_common::Error),

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("HTTP 클라이언트 오류: {0}")]
    Client(#[from] reqwest::Error),

    #[error("JSON 파싱 오류: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("입력 오류: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("파일을 찾을 수 없습니다: {0}")]
    FileNotFound(String),

    #[error("이미지 형식을 알 수 없습니다: {0}")]
    ImageFormat(String),

    #[error("인자 오류: {0}")]
    InvalidArgument(String),
}

impl SkySoulsError {
    /// 画面に出すメッセージ（サーバーのメッセージを優先）
    pub fn user_message(&self) -> String {
        match self {
            SkySoulsError::Common(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SkySoulsError>;
