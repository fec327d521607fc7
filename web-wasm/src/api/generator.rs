use super::{generate_image, js_error_message};
use ksim_deck_common::{DataUri, ImageGenerator};

/// サーバー経由の画像生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerGenerator;

impl ImageGenerator for ServerGenerator {
    async fn generate(&self, prompt: &str) -> Option<DataUri> {
        match generate_image(prompt, None).await {
            Ok(image) => Some(image),
            Err(e) => {
                web_sys::console::error_1(&format!("画像生成に失敗: {}", js_error_message(&e)).into());
                None
            }
        }
    }

    async fn edit(&self, image: &DataUri, prompt: &str) -> Option<DataUri> {
        match generate_image(prompt, Some(image)).await {
            Ok(image) => Some(image),
            Err(e) => {
                web_sys::console::error_1(&format!("画像編集に失敗: {}", js_error_message(&e)).into());
                None
            }
        }
    }
}
