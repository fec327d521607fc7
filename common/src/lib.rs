//! KSIM Deck Common Library
//!
//! サーバー/CLIとWeb(WASM)で共有される型と状態

pub mod error;
pub mod data_uri;
pub mod document;
pub mod assets;
pub mod navigator;
pub mod edit;
pub mod slides;
pub mod generation;
pub mod shell;
#[cfg(feature = "preset")]
pub mod preset;

pub use error::{Error, Result};
pub use data_uri::DataUri;
pub use document::{PresentationDocument, SectorKey};
pub use assets::{AssetBundle, AssetRef, Portfolio, PortfolioKey, PortfolioSources};
pub use navigator::{Direction, Navigator, Step, Transition};
pub use edit::EditSession;
pub use slides::{build_slides, SlideBody, SlideDescriptor, SlideKind, VisualStyle};
pub use generation::{BatchReport, GenerationQueue, ImageGenerator, PORTFOLIO_PROMPTS};
pub use shell::{EditRequest, ShellState, Ticket};
