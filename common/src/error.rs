//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Data URI parse error: {0}")]
    DataUri(String),

    #[error("Unknown image key: {0}")]
    UnknownKey(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
