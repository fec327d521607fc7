//! アセット解決
//!
//! 文書に書かれた画像URLを取得してData URIへ変換し、バンドルにまとめる。
//! 取得に失敗した画像はプレースホルダーSVGで置き換え、呼び出し側へエラーは返さない。

pub mod drive;

use crate::error::{DeckError, Result};
use futures::future::join_all;
use ksim_deck_common::{AssetBundle, DataUri, Portfolio, PortfolioKey, PortfolioSources, PresentationDocument};
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;

/// 取得失敗時の画像（紺地に金文字 "KSIM STRATEGIC DECK"、800×600）
pub const PLACEHOLDER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="800" height="600" viewBox="0 0 800 600"><rect width="100%" height="100%" fill="#0A2647"/><text x="50%" y="50%" font-family="Montserrat" font-size="32" fill="#D4AF37" text-anchor="middle" dominant-baseline="middle">KSIM STRATEGIC DECK</text></svg>"##;

const ACCEPT_IMAGES: &str = "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8";
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub fn placeholder() -> DataUri {
    DataUri::from_bytes("image/svg+xml", PLACEHOLDER_SVG.as_bytes())
}

/// 全画像をプレースホルダーにしたバンドル（オフライン出力用）
pub fn offline_bundle(doc: &PresentationDocument) -> AssetBundle {
    let image = placeholder();
    AssetBundle {
        logo: image.clone(),
        management_photos: vec![image.clone(); doc.meta.office.management_team.len()],
        portfolio: Portfolio::filled(&image),
    }
}

pub struct AssetResolver {
    client: reqwest::Client,
}

impl AssetResolver {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// 画像を1枚取得（失敗時はプレースホルダー）
    pub async fn fetch(&self, url: &str) -> DataUri {
        match self.try_fetch(url).await {
            Ok(image) => image,
            Err(e) => {
                log::warn!("画像の取得に失敗: {} ({})", url, e);
                placeholder()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<DataUri> {
        let target = drive::download_url(url);
        let response = self
            .client
            .get(target.as_ref())
            .header(ACCEPT, ACCEPT_IMAGES)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeckError::ApiCall(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(DeckError::ImageLoad(format!("画像ではないレスポンス: {:?}", content_type)));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(DeckError::ImageLoad("レスポンスが空です".into()));
        }

        // クライアントが読み戻せる形式かを確かめる
        let image = DataUri::from_bytes(&content_type, &bytes);
        DataUri::parse(&image.to_string())
            .ok_or_else(|| DeckError::ImageLoad(format!("Data URIにできないレスポンス: {:?}", content_type)))
    }

    /// ロゴ・経営陣写真・ポートフォリオ画像をまとめて解決
    ///
    /// ロゴと経営陣写真、ポートフォリオ6枚をそれぞれ並行に取得する。
    pub async fn resolve_bundle(&self, doc: &PresentationDocument, sources: &PortfolioSources) -> AssetBundle {
        let office = &doc.meta.office;
        let people_urls: Vec<&str> = std::iter::once(office.logo_url.as_str())
            .chain(office.management_team.iter().map(|m| m.photo_url.as_str()))
            .collect();

        let mut people = join_all(people_urls.into_iter().map(|url| self.fetch(url))).await.into_iter();
        let logo = people.next().unwrap_or_else(placeholder);
        let management_photos: Vec<DataUri> = people.collect();

        let portfolio_images = join_all(PortfolioKey::ALL.into_iter().map(|key| async move {
            match sources.url(key) {
                Some(url) => self.fetch(url).await,
                None => {
                    log::warn!("ポートフォリオ画像のURLが未設定: {}", key);
                    placeholder()
                }
            }
        }))
        .await;

        let mut portfolio = Portfolio::filled(&placeholder());
        for (key, image) in PortfolioKey::ALL.into_iter().zip(portfolio_images) {
            portfolio.set(key, image);
        }

        log::info!(
            "アセット解決完了: 経営陣写真{}枚, ポートフォリオ{}枚",
            management_photos.len(),
            PortfolioKey::ALL.len()
        );

        AssetBundle {
            logo,
            management_photos,
            portfolio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGINAL_PLACEHOLDER: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHdpZHRoPSI4MDAiIGhlaWdodD0iNjAwIiB2aWV3Qm94PSIwIDAgODAwIDYwMCI+PHJlY3Qgd2lkdGg9IjEwMCUiIGhlaWdodD0iMTAwJSIgZmlsbD0iIzBBMjY0NyIvPjx0ZXh0IHg9IjUwJSIgeT0iNTAlIiBmb250LWZhbWlseT0iTW9udHNlcnJhdCIgZm9udC1zaXplPSIzMiIgZmlsbD0iI0Q0QUYzNyIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZG9taW5hbnQtYmFzZWxpbmU9Im1pZGRsZSI+S1NJTSBTVFJBVEVHSUMgREVDSzwvdGV4dD48L3N2Zz4=";

    #[test]
    fn test_placeholder_matches_fixed_uri() {
        assert_eq!(placeholder().to_string(), ORIGINAL_PLACEHOLDER);
        assert!(placeholder().is_svg());
    }

    #[test]
    fn test_offline_bundle_sized_to_team() {
        let mut doc = PresentationDocument::default();
        doc.meta.office.management_team = vec![Default::default(), Default::default()];
        let bundle = offline_bundle(&doc);
        assert_eq!(bundle.management_photos.len(), 2);
        assert_eq!(bundle.portfolio.get(PortfolioKey::FarmDistribution), &placeholder());
    }
}
