//! UIコンポーネント

pub mod edit_panel;
pub mod footer;
pub mod header;
pub mod navigation;
pub mod slide_view;
pub mod status;
