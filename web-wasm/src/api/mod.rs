//! サーバーAPI呼び出し
//!
//! 同一オリジンの `/api/*` だけを叩く。APIキーはブラウザに置かない。

mod generator;

pub use generator::ServerGenerator;

use ksim_deck_common::{AssetBundle, DataUri, PresentationDocument};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, Request, RequestInit, RequestMode, Response};

/// エクスポート形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Pdf,
    Pptx,
}

impl ExportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Pptx => "pptx",
        }
    }

    pub fn file_name(self) -> String {
        format!("KSIM_Strategic_Deck.{}", self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum DeckDataResponse {
    Success {
        data: PresentationDocument,
        assets: AssetBundle,
    },
    Error {
        message: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateImageRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    base64_image: Option<String>,
}

#[derive(Deserialize)]
struct GenerateImageResponse {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct ExportRequest<'a> {
    assets: &'a AssetBundle,
}

/// JsValueのエラーを表示用文字列へ
pub fn js_error_message(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{:?}", error))
}

fn json_error(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

async fn send(method: &str, path: &str, body: Option<String>) -> Result<Response, JsValue> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::SameOrigin);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(path, &opts)?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("windowがありません"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    resp_value.dyn_into()
}

async fn response_text(resp: &Response) -> Result<String, JsValue> {
    JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("レスポンスが文字列ではありません"))
}

/// `GET /api/deck-data`
pub async fn fetch_deck_data() -> Result<(PresentationDocument, AssetBundle), JsValue> {
    let resp = send("GET", "/api/deck-data", None).await?;
    let text = response_text(&resp).await?;

    match serde_json::from_str(&text).map_err(json_error)? {
        DeckDataResponse::Success { data, assets } => Ok((data, assets)),
        DeckDataResponse::Error { message } => Err(JsValue::from_str(&message)),
    }
}

/// `POST /api/generate-image`
///
/// `source` があれば編集、なければ新規生成。
pub async fn generate_image(prompt: &str, source: Option<&DataUri>) -> Result<DataUri, JsValue> {
    let body = serde_json::to_string(&GenerateImageRequest {
        prompt,
        base64_image: source.map(|s| s.to_string()),
    })
    .map_err(json_error)?;

    let resp = send("POST", "/api/generate-image", Some(body)).await?;
    let json = JsFuture::from(resp.json()?).await?;
    let response: GenerateImageResponse = serde_wasm_bindgen::from_value(json)?;

    if !resp.ok() {
        let message = response
            .error
            .unwrap_or_else(|| format!("API error: {}", resp.status()));
        return Err(JsValue::from_str(&message));
    }

    response
        .image
        .as_deref()
        .and_then(DataUri::parse)
        .ok_or_else(|| JsValue::from_str("画像が返されませんでした"))
}

/// `POST /api/export/{pdf,pptx}`
pub async fn export_deck(kind: ExportKind, assets: &AssetBundle) -> Result<Blob, JsValue> {
    let body = serde_json::to_string(&ExportRequest { assets }).map_err(json_error)?;
    let path = format!("/api/export/{}", kind.as_str());

    let resp = send("POST", &path, Some(body)).await?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!("Export error: {}", resp.status())));
    }

    JsFuture::from(resp.blob()?).await?.dyn_into()
}
