use super::AppState;
use crate::cli::PdfQuality;
use crate::error::DeckError;
use crate::export::{pdf, pptx, DEFAULT_FILE_STEM};
use crate::gemini::GeminiClient;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use ksim_deck_common::{AssetBundle, DataUri};
use serde::Deserialize;
use serde_json::json;

const PDF_MIME: &str = "application/pdf";
const PPTX_MIME: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// `GET /api/deck-data`
pub async fn deck_data(state: web::Data<AppState>) -> HttpResponse {
    let assets = state.resolver.resolve_bundle(&state.document, &state.sources).await;

    let payload = serde_json::to_value(&state.document).and_then(|data| {
        Ok(json!({
            "status": "success",
            "data": data,
            "assets": serde_json::to_value(&assets)?,
        }))
    });

    match payload {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => {
            log::error!("デッキデータの生成に失敗: {}", e);
            HttpResponse::InternalServerError().json(json!({
                "status": "error",
                "message": e.to_string(),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub base64_image: Option<String>,
}

/// `POST /api/generate-image`
///
/// `base64Image` があれば編集、なければ新規生成。
pub async fn generate_image(
    state: web::Data<AppState>,
    body: web::Json<GenerateImageRequest>,
) -> Result<HttpResponse, DeckError> {
    let request = body.into_inner();
    if request.prompt.trim().is_empty() {
        return Err(DeckError::InvalidRequest("プロンプトが空です".into()));
    }

    let client = GeminiClient::from_config(&state.config)?;
    let image = match request.base64_image.as_deref() {
        Some(source) => {
            let source = DataUri::parse(source)
                .ok_or_else(|| DeckError::InvalidRequest("base64Image がData URIではありません".into()))?;
            client.edit_image(&source, &request.prompt).await?
        }
        None => client.generate_image(&request.prompt).await?,
    };

    Ok(HttpResponse::Ok().json(json!({ "image": image.to_string() })))
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub assets: AssetBundle,
}

fn attachment(bytes: Vec<u8>, mime: &str, extension: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(format!("{}.{}", DEFAULT_FILE_STEM, extension))],
        })
        .body(bytes)
}

/// `POST /api/export/pdf`
pub async fn export_pdf(
    state: web::Data<AppState>,
    body: web::Json<ExportRequest>,
) -> Result<HttpResponse, DeckError> {
    let document = state.document.clone();
    let assets = body.into_inner().assets;
    let bytes = web::block(move || pdf::render_pdf(&document, &assets, PdfQuality::default()))
        .await
        .map_err(|e| DeckError::PdfGeneration(e.to_string()))??;
    Ok(attachment(bytes, PDF_MIME, "pdf"))
}

/// `POST /api/export/pptx`
pub async fn export_pptx(
    state: web::Data<AppState>,
    body: web::Json<ExportRequest>,
) -> Result<HttpResponse, DeckError> {
    let document = state.document.clone();
    let assets = body.into_inner().assets;
    let bytes = web::block(move || pptx::render_pptx(&document, &assets))
        .await
        .map_err(|e| DeckError::PptxGeneration(e.to_string()))??;
    Ok(attachment(bytes, PPTX_MIME, "pptx"))
}
