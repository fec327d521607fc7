use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ksim_deck::{assets, cli, config, content, export, gemini, server};
use ksim_deck_common::GenerationQueue;
use cli::{Cli, Commands};
use config::Config;
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = Config::load().context("設定ファイルの読み込みに失敗")?;

    match cli.command {
        Commands::Serve { bind, port, static_dir } => {
            println!("🌐 ksim-deck - サーバー起動\n");

            let bind = bind.unwrap_or_else(|| config.bind.clone());
            let port = port.unwrap_or(config.port);
            let static_dir = static_dir.unwrap_or_else(|| config.static_dir.clone());

            let state = server::AppState::new(config, content::investor_document(), content::investor_sources())?;
            println!("✔ http://{}:{} で待ち受けます (静的ファイル: {})", bind, port, static_dir.display());

            server::run(state, &bind, port, static_dir)
                .await
                .context("サーバーの実行に失敗")?;
        }

        Commands::Export { format, output, ai_visuals, offline, pdf_quality } => {
            println!("📄 ksim-deck - エクスポート\n");
            let doc = content::investor_document();

            // 1. 画像取得
            let mut bundle = if offline {
                println!("[1/3] 画像取得をスキップ（オフライン）");
                assets::offline_bundle(&doc)
            } else {
                println!("[1/3] 画像を取得中...");
                let resolver = assets::AssetResolver::new(Duration::from_secs(config.fetch_timeout_seconds))?;
                resolver.resolve_bundle(&doc, &content::investor_sources()).await
            };
            println!("✔ 画像を準備\n");

            // 2. AI画像生成
            if ai_visuals {
                println!("[2/3] AI画像を生成中...");
                let client = gemini::GeminiClient::from_config(&config)?;
                let queue = GenerationQueue::portfolio();

                let bar = ProgressBar::new(queue.len() as u64);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                        .context("進捗表示の設定に失敗")?,
                );
                let portfolio = &mut bundle.portfolio;
                let report = queue
                    .run(&client, |key, image| {
                        bar.set_message(key.to_string());
                        bar.inc(1);
                        if let Some(image) = image {
                            portfolio.set(key, image);
                        }
                        true
                    })
                    .await;
                bar.finish_and_clear();

                println!("✔ 生成: {}枚, 失敗: {}枚\n", report.updated.len(), report.failed.len());
                for key in &report.failed {
                    println!("  - {} は元の画像を使用", key);
                }
            } else {
                println!("[2/3] AI画像生成をスキップ\n");
            }

            // 3. 出力
            println!("[3/3] 出力中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            export::export_deck(&doc, &bundle, &format, &output_dir, pdf_quality)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定ファイル: {}", Config::config_path()?.display());
                println!("  モデル: {}", config.model);
                println!("  APIエンドポイント: {}", config.api_base);
                println!("  待ち受け: {}:{}", config.bind, config.port);
                println!("  画像取得タイムアウト: {}秒", config.fetch_timeout_seconds);
                println!("  静的ファイル: {}", config.static_dir.display());
                println!("  APIキー: {}", if config.get_api_key().is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}
