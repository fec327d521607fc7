//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use actix_web::body::MessageBody;
use actix_web::ResponseError;
use ksim_deck::config::Config;
use ksim_deck::error::DeckError;
use ksim_deck::gemini::GeminiClient;
use ksim_deck_common::DataUri;

/// APIキーなしでクライアントを作る場合
#[test]
fn test_missing_api_key() {
    if std::env::var("GEMINI_API_KEY").is_ok() {
        eprintln!("GEMINI_API_KEY set; skipping missing-key test");
        return;
    }
    let config = Config {
        api_key: None,
        ..Config::default()
    };
    let result = GeminiClient::from_config(&config);
    assert!(matches!(result, Err(DeckError::MissingApiKey)));
}

/// エラー応答は500と `{ "error": ... }`
#[test]
fn test_error_response_shape() {
    let err = DeckError::InvalidRequest("プロンプトが空です".into());
    let response = err.error_response();
    assert_eq!(response.status().as_u16(), 500);

    let body = response.into_body().try_into_bytes().expect("ボディ取得失敗");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("JSON解析失敗");
    assert!(json["error"].as_str().unwrap().contains("プロンプトが空です"));
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_transparent() {
    let inner = ksim_deck_common::Error::UnknownKey("sawit".into());
    let message = inner.to_string();
    let err: DeckError = inner.into();
    assert!(matches!(err, DeckError::Common(_)));
    assert_eq!(err.to_string(), message);
}

/// Data URIでない文字列はJSONから読めない
#[test]
fn test_non_image_data_uri_rejected() {
    let broken = serde_json::from_str::<DataUri>("\"data:text/plain;base64,AAAA\"");
    assert!(broken.is_err());
}

/// IOエラーの変換
#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err: DeckError = io.into();
    assert!(matches!(err, DeckError::Io(_)));
    assert!(err.to_string().contains("missing"));
}

/// 画像デコードエラーの変換
#[test]
fn test_image_error_conversion() {
    let err: DeckError = image::load_from_memory(b"not an image").unwrap_err().into();
    assert!(matches!(err, DeckError::ImageLoad(_)));
}
