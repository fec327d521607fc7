//! アセット解決の統合テスト（到達不能・異常レスポンス時の挙動）

use ksim_deck::assets::{placeholder, AssetResolver};
use ksim_deck_common::preset::investor_preset;
use ksim_deck_common::{DataUri, PortfolioKey, PortfolioSources};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// 接続できないURL（ポート9: discard）
const UNREACHABLE: &str = "http://127.0.0.1:9/image.png";

fn unreachable_sources() -> PortfolioSources {
    PortfolioSources {
        entries: PortfolioKey::ALL
            .into_iter()
            .map(|key| (key, UNREACHABLE.to_string()))
            .collect(),
    }
}

#[tokio::test]
async fn test_unreachable_url_returns_placeholder() {
    let resolver = AssetResolver::new(Duration::from_secs(2)).expect("クライアント作成失敗");
    let image = resolver.fetch(UNREACHABLE).await;
    assert_eq!(image, placeholder());
}

#[tokio::test]
async fn test_bundle_always_builds() {
    let mut doc = investor_preset("Oktober 2026");
    doc.meta.office.logo_url = UNREACHABLE.to_string();
    for member in &mut doc.meta.office.management_team {
        member.photo_url = UNREACHABLE.to_string();
    }

    let resolver = AssetResolver::new(Duration::from_secs(2)).expect("クライアント作成失敗");
    let bundle = resolver.resolve_bundle(&doc, &unreachable_sources()).await;

    assert_eq!(bundle.logo, placeholder());
    assert_eq!(bundle.management_photos.len(), doc.meta.office.management_team.len());
    for key in PortfolioKey::ALL {
        assert_eq!(bundle.portfolio.get(key), &placeholder());
    }
}

#[tokio::test]
async fn test_missing_source_uses_placeholder() {
    let doc = investor_preset("Oktober 2026");
    let mut doc = doc;
    doc.meta.office.logo_url = UNREACHABLE.to_string();
    doc.meta.office.management_team.clear();

    let resolver = AssetResolver::new(Duration::from_secs(2)).expect("クライアント作成失敗");
    let bundle = resolver
        .resolve_bundle(&doc, &PortfolioSources { entries: vec![] })
        .await;
    assert!(bundle.management_photos.is_empty());
    assert_eq!(bundle.portfolio.get(PortfolioKey::SawitMill), &placeholder());
}

// ============================================
// ローカルサーバーからの異常レスポンス
// ============================================

/// 1回だけ固定レスポンスを返すローカルサーバーを立ててURLを返す
async fn serve_once(status: &str, content_type: &str, body: &[u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);

    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        }
    });

    format!("http://{}/image.png", addr)
}

async fn fetch_from(status: &str, content_type: &str, body: &[u8]) -> DataUri {
    let url = serve_once(status, content_type, body).await;
    let resolver = AssetResolver::new(Duration::from_secs(5)).expect("クライアント作成失敗");
    resolver.fetch(&url).await
}

/// サーバーが返したData URIはクライアント側で必ず読み戻せる
fn assert_client_readable(image: &DataUri) {
    let json = serde_json::to_string(image).expect("シリアライズ失敗");
    let restored: DataUri = serde_json::from_str(&json).expect("クライアントで読み戻せない");
    assert_eq!(&restored, image);
}

#[tokio::test]
async fn test_not_found_returns_placeholder() {
    let image = fetch_from("404 Not Found", "image/png", b"abc").await;
    assert_eq!(image, placeholder());
}

#[tokio::test]
async fn test_html_response_returns_placeholder() {
    let image = fetch_from("200 OK", "text/html; charset=utf-8", b"<html><body>login</body></html>").await;
    assert_eq!(image, placeholder());
}

#[tokio::test]
async fn test_empty_image_body_returns_placeholder() {
    let image = fetch_from("200 OK", "image/png", b"").await;
    assert_eq!(image, placeholder());
    assert_client_readable(&image);
}

#[tokio::test]
async fn test_bare_image_content_type_returns_placeholder() {
    let image = fetch_from("200 OK", "image/", b"abc").await;
    assert_eq!(image, placeholder());
    assert_client_readable(&image);
}

#[tokio::test]
async fn test_image_response_becomes_data_uri() {
    let bytes = b"\x89PNG\r\n\x1a\nfake-png-body";
    let image = fetch_from("200 OK", "image/png; charset=binary", bytes).await;

    assert_ne!(image, placeholder());
    assert_eq!(image.mime_type(), "image/png");
    assert_eq!(image.decode().expect("デコード失敗"), bytes.to_vec());
    assert_client_readable(&image);
}
