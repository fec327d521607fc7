//! KSIM 投資家向けデッキ
//!
//! デッキ文書の配信サーバー、アセット解決、Gemini画像生成、PDF/PPTX出力。

pub mod assets;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod gemini;
pub mod server;
