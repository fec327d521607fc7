//! Gemini画像生成クライアント
//!
//! APIキーはサーバー側だけが持つ。ブラウザは `/api/generate-image` 経由で呼び出す。

pub mod types;

use crate::config::Config;
use crate::error::{DeckError, Result};
use ksim_deck_common::{DataUri, ImageGenerator};
use types::{Content, GeminiRequest, GeminiResponse, GenerationConfig, ImageConfig, InlineData, Part};

/// 生成画像のアスペクト比（スライドに合わせる）
const ASPECT_RATIO: &str = "16:9";

/// 新規生成用のプロンプト
pub fn generation_prompt(prompt: &str) -> String {
    format!(
        "High-quality professional photography for a strategic investor deck. {}. Cinematic lighting, realistic, 4k, professional composition.",
        prompt
    )
}

/// 編集用のプロンプト
pub fn edit_prompt(prompt: &str) -> String {
    format!(
        "Edit this image based on the following instruction: {}. Maintain the professional strategic deck style. Cinematic lighting, realistic, 4k.",
        prompt
    )
}

pub fn build_generate_request(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part::Text {
                text: generation_prompt(prompt),
            }],
        }],
        generation_config: Some(GenerationConfig {
            image_config: ImageConfig {
                aspect_ratio: ASPECT_RATIO.to_string(),
            },
        }),
    }
}

/// 元画像を先頭に置いた編集リクエスト
pub fn build_edit_request(image: &DataUri, prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type().to_string(),
                        data: image.payload().to_string(),
                    },
                },
                Part::Text {
                    text: edit_prompt(prompt),
                },
            ],
        }],
        generation_config: None,
    }
}

/// レスポンスから最初の画像を取り出す
pub fn extract_image(response: &GeminiResponse) -> Result<DataUri> {
    let inline = response
        .first_image()
        .ok_or_else(|| DeckError::ApiParse("レスポンスに画像が含まれていません".into()))?;
    DataUri::from_base64(&inline.mime_type, &inline.data)
        .ok_or_else(|| DeckError::ApiParse(format!("画像データが不正です ({})", inline.mime_type)))
}

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into(),
        }
    }

    /// 設定から作成（APIキー未設定ならエラー）
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.get_api_key()?;
        Ok(Self::new(api_key, config.model.clone(), config.api_base.clone()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    /// Gemini API呼び出し（共通処理）
    async fn call(&self, request: &GeminiRequest) -> Result<DataUri> {
        let response = self.client.post(self.endpoint()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeckError::ApiCall(format!("HTTP {}: {}", status, body)));
        }

        let text = response.text().await?;
        let payload: GeminiResponse =
            serde_json::from_str(&text).map_err(|e| DeckError::ApiParse(e.to_string()))?;
        extract_image(&payload)
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<DataUri> {
        if prompt.trim().is_empty() {
            return Err(DeckError::InvalidRequest("プロンプトが空です".into()));
        }
        self.call(&build_generate_request(prompt)).await
    }

    pub async fn edit_image(&self, image: &DataUri, prompt: &str) -> Result<DataUri> {
        if prompt.trim().is_empty() {
            return Err(DeckError::InvalidRequest("編集指示が空です".into()));
        }
        self.call(&build_edit_request(image, prompt)).await
    }
}

impl ImageGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Option<DataUri> {
        match self.generate_image(prompt).await {
            Ok(image) => Some(image),
            Err(e) => {
                log::error!("画像生成に失敗: {}", e);
                None
            }
        }
    }

    async fn edit(&self, image: &DataUri, prompt: &str) -> Option<DataUri> {
        match self.edit_image(image, prompt).await {
            Ok(image) => Some(image),
            Err(e) => {
                log::error!("画像編集に失敗: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_shape() {
        let request = build_generate_request("Oil palm at dawn");
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");
        let text = json["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("High-quality professional photography"));
        assert!(text.contains("Oil palm at dawn."));
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
    }

    #[test]
    fn test_edit_request_puts_image_first() {
        let image = DataUri::from_bytes("image/jpeg", b"jpeg");
        let request = build_edit_request(&image, "Add more sunset glow");
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");
        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts[0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[0]["inline_data"]["data"], image.payload());
        assert!(parts[1]["text"].as_str().unwrap().contains("Add more sunset glow"));
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_extract_first_inline_image() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "AAEC" } },
                        { "inlineData": { "mimeType": "image/png", "data": "AwQF" } }
                    ]
                }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(body).expect("デシリアライズ失敗");
        let image = extract_image(&response).expect("画像抽出失敗");
        assert_eq!(image.mime_type(), "image/jpeg");
        assert_eq!(image.payload(), "AAEC");
    }

    #[test]
    fn test_extract_defaults_mime_and_rejects_text_only() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inline_data":{"data":"AAEC"}}]}}]}"#;
        let response: GeminiResponse = serde_json::from_str(body).expect("デシリアライズ失敗");
        assert_eq!(extract_image(&response).expect("画像抽出失敗").mime_type(), "image/png");

        let text_only: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#).expect("デシリアライズ失敗");
        assert!(matches!(extract_image(&text_only), Err(DeckError::ApiParse(_))));
        assert!(extract_image(&GeminiResponse::default()).is_err());
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_without_request() {
        let client = GeminiClient::new("dummy", "gemini-2.5-flash-image", "http://127.0.0.1:9");
        assert!(matches!(client.generate_image("  ").await, Err(DeckError::InvalidRequest(_))));
        assert!(client.generate("").await.is_none());
    }
}
