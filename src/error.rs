use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`ksim-deck config --set-api-key YOUR_KEY` または環境変数 GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("リクエストが不正: {0}")]
    InvalidRequest(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("PPTX生成エラー: {0}")]
    PptxGeneration(String),

    #[error("ZIP書き込みエラー: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Common(#[from] ksim_deck_common::Error),
}

pub type Result<T> = std::result::Result<T, DeckError>;

impl From<image::ImageError> for DeckError {
    fn from(e: image::ImageError) -> Self {
        DeckError::ImageLoad(e.to_string())
    }
}

/// APIエンドポイントのエラー応答は `{ "error": "..." }`
impl ResponseError for DeckError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        log::error!("{}", self);
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
