use ksim_deck::config::{DEFAULT_API_BASE, DEFAULT_MODEL};
use ksim_deck::gemini::GeminiClient;
use ksim_deck_common::ImageGenerator;

#[tokio::test]
async fn gemini_generate_and_edit_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let client = GeminiClient::new(api_key, DEFAULT_MODEL, DEFAULT_API_BASE);

    let generated = client
        .generate_image("A modern agricultural distribution center with refrigerated trucks")
        .await
        .expect("generation failed");
    assert!(generated.mime_type().starts_with("image/"));
    assert!(!generated.decode().expect("invalid base64").is_empty());

    let edited = client
        .edit(&generated, "Add more sunset glow")
        .await
        .expect("edit returned no image");
    assert!(edited.mime_type().starts_with("image/"));
}
