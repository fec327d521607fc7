//! デッキ文書の構築
//!
//! 固定の投資家向けプリセットに、表紙用の年月（インドネシア語）を入れる。

use chrono::Datelike;
use ksim_deck_common::preset::{investor_preset, portfolio_sources};
use ksim_deck_common::{PortfolioSources, PresentationDocument};

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// "Oktober 2026" 形式
pub fn indonesian_month_year<D: Datelike>(date: &D) -> String {
    let month = MONTHS_ID[date.month0() as usize];
    format!("{} {}", month, date.year())
}

/// 今日の日付で文書を作成
pub fn investor_document() -> PresentationDocument {
    let today = chrono::Local::now().date_naive();
    investor_preset(&indonesian_month_year(&today))
}

/// ポートフォリオ画像の取得元
pub fn investor_sources() -> PortfolioSources {
    portfolio_sources()
}
