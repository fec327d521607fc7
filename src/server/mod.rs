//! HTTPサーバー
//!
//! デッキデータAPI・画像生成プロキシ・エクスポートAPIと、ビルド済みSPAの静的配信。

pub mod handlers;

use crate::assets::AssetResolver;
use crate::config::Config;
use crate::error::{DeckError, Result};
use actix_web::{middleware, web, App, HttpServer};
use ksim_deck_common::{PortfolioSources, PresentationDocument};
use std::path::PathBuf;
use std::time::Duration;

/// リクエストボディの上限（Data URIの画像バンドルを受け取るため大きめ）
const JSON_LIMIT_BYTES: usize = 64 * 1024 * 1024;

pub struct AppState {
    pub config: Config,
    pub document: PresentationDocument,
    pub sources: PortfolioSources,
    pub resolver: AssetResolver,
}

impl AppState {
    pub fn new(config: Config, document: PresentationDocument, sources: PortfolioSources) -> Result<Self> {
        let resolver = AssetResolver::new(Duration::from_secs(config.fetch_timeout_seconds))?;
        Ok(Self {
            config,
            document,
            sources,
            resolver,
        })
    }
}

/// `/api` 以下のルート
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| DeckError::InvalidRequest(err.to_string()).into());

    cfg.service(
        web::scope("/api")
            .app_data(json_config)
            .route("/deck-data", web::get().to(handlers::deck_data))
            .route("/generate-image", web::post().to(handlers::generate_image))
            .route("/export/pdf", web::post().to(handlers::export_pdf))
            .route("/export/pptx", web::post().to(handlers::export_pptx)),
    );
}

/// サーバーを起動して終了まで待つ
pub async fn run(state: AppState, bind: &str, port: u16, static_dir: PathBuf) -> std::io::Result<()> {
    if state.config.get_api_key().is_err() {
        log::warn!("GEMINI_API_KEY が未設定のため画像生成APIはエラーを返します");
    }
    if !static_dir.is_dir() {
        log::warn!("静的ファイルのディレクトリがありません: {}", static_dir.display());
    }

    let state = web::Data::new(state);
    log::info!("Server running on http://{}:{}", bind, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            .service(actix_files::Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind((bind, port))?
    .run()
    .await
}
