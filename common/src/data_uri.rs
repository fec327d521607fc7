//! インライン画像ペイロード（Data URI）
//!
//! `data:image/png;base64,iVBORw0...` 形式の文字列を
//! MIMEタイプとBase64本体に分解して保持する。
//! JSONでは元の文字列表現のままやり取りする。

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 画像のData URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    mime_type: String,
    payload: String,
}

impl DataUri {
    /// Data URI文字列をパース
    ///
    /// `image/*` かつ Base64 形式のみ受け付ける。
    /// 形式が合わない場合は `None`。
    pub fn parse(text: &str) -> Option<Self> {
        lazy_static::lazy_static! {
            static ref DATA_URI_RE: Regex =
                Regex::new(r"^data:(image/[\w.+-]+);base64,([A-Za-z0-9+/]+={0,2})$").unwrap();
        }

        let caps = DATA_URI_RE.captures(text.trim())?;
        Some(Self {
            mime_type: caps[1].to_string(),
            payload: caps[2].to_string(),
        })
    }

    /// バイト列からData URIを作成
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            payload: STANDARD.encode(bytes),
        }
    }

    /// MIMEタイプとBase64文字列から作成（Gemini APIのinlineData用）
    pub fn from_base64(mime_type: &str, payload: &str) -> Option<Self> {
        Self::parse(&format!("data:{};base64,{}", mime_type, payload))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64エンコードされた本体
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// 本体をデコード
    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.payload.as_bytes())?)
    }

    /// SVGかどうか（PDF/PPTXに直接埋め込めない）
    pub fn is_svg(&self) -> bool {
        self.mime_type.starts_with("image/svg")
    }

    /// 拡張子（PPTXのメディア名に使用）
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpeg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "bin",
        }
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl TryFrom<String> for DataUri {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        let prefix: String = value.chars().take(32).collect();
        Self::parse(&value).ok_or(Error::DataUri(prefix))
    }
}

impl From<DataUri> for String {
    fn from(value: DataUri) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_png() {
        let uri = DataUri::parse("data:image/png;base64,iVBORw0KGgo=").expect("パース失敗");
        assert_eq!(uri.mime_type(), "image/png");
        assert_eq!(uri.payload(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_svg_mime_with_plus() {
        let uri = DataUri::parse("data:image/svg+xml;base64,PHN2Zy8+").expect("パース失敗");
        assert_eq!(uri.mime_type(), "image/svg+xml");
        assert!(uri.is_svg());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DataUri::parse("").is_none());
        assert!(DataUri::parse("https://example.com/a.png").is_none());
        assert!(DataUri::parse("data:text/plain;base64,aGVsbG8=").is_none());
        assert!(DataUri::parse("data:image/png,rawdata").is_none());
        assert!(DataUri::parse("data:image/png;base64,").is_none());
        assert!(DataUri::parse("data:image/;base64,YWJj").is_none());
    }

    #[test]
    fn test_parse_rejects_non_base64_payload() {
        assert!(DataUri::parse("data:image/png;base64,!!!").is_none());
        assert!(DataUri::parse("data:image/png;base64,iVBO Rw0K").is_none());
        assert!(DataUri::parse("data:image/png;base64,YWJj===").is_none());
        assert!(DataUri::from_base64("image/png", "<html>").is_none());
    }

    #[test]
    fn test_bytes_recovered_through_string_form() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(1337).collect();
        let encoded = DataUri::from_bytes("image/jpeg", &bytes).to_string();

        let parsed = DataUri::parse(&encoded).expect("パース失敗");
        assert_eq!(parsed.mime_type(), "image/jpeg");
        assert_eq!(parsed.decode().expect("デコード失敗").len(), bytes.len());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let uri = DataUri::from_bytes("image/gif", b"GIF89a");
        let json = serde_json::to_string(&uri).expect("シリアライズ失敗");
        assert_eq!(json, "\"data:image/gif;base64,R0lGODlh\"");

        let restored: DataUri = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(restored, uri);
    }

    #[test]
    fn test_deserialize_rejects_non_data_uri() {
        let result = serde_json::from_str::<DataUri>("\"not-an-image\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_extension() {
        assert_eq!(DataUri::from_bytes("image/png", b"x").extension(), "png");
        assert_eq!(DataUri::from_bytes("image/jpeg", b"x").extension(), "jpeg");
        assert_eq!(DataUri::from_bytes("image/x-icon", b"x").extension(), "bin");
    }
}
