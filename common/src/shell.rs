//! プレゼンテーションシェルの状態
//!
//! 文書・アセット・ナビゲーション・編集セッションをまとめて所有する。
//! 非同期処理は開始時に `Ticket` を受け取り、完了時に提示する。
//! `invalidate` 後に届いた古い結果は破棄される。

use crate::assets::{AssetBundle, PortfolioKey};
use crate::data_uri::DataUri;
use crate::document::PresentationDocument;
use crate::edit::EditSession;
use crate::navigator::{Navigator, Step};
use crate::slides::{build_slides, SlideDescriptor, SLIDE_COUNT};

/// 非同期処理の世代
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// 編集リクエスト（生成器へ渡す内容）
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    pub ticket: Ticket,
    pub key: PortfolioKey,
    pub image: DataUri,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellState {
    document: PresentationDocument,
    assets: AssetBundle,
    navigator: Navigator,
    edit: EditSession,
    generating: bool,
    epoch: u64,
}

impl ShellState {
    pub fn new(document: PresentationDocument, assets: AssetBundle) -> Self {
        Self {
            document,
            assets,
            navigator: Navigator::new(SLIDE_COUNT),
            edit: EditSession::default(),
            generating: false,
            epoch: 0,
        }
    }

    pub fn document(&self) -> &PresentationDocument {
        &self.document
    }

    pub fn assets(&self) -> &AssetBundle {
        &self.assets
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn edit(&self) -> &EditSession {
        &self.edit
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// 現在の文書とアセットから全スライドを構築
    pub fn slides(&self) -> Vec<SlideDescriptor<'_>> {
        build_slides(&self.document, &self.assets)
    }

    // ============================================
    // ナビゲーション
    // ============================================

    pub fn next(&mut self) -> bool {
        self.navigator.advance(Step::Next)
    }

    pub fn previous(&mut self) -> bool {
        self.navigator.advance(Step::Previous)
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        self.navigator.jump_to(index)
    }

    // ============================================
    // 一括生成
    // ============================================

    fn ticket(&self) -> Ticket {
        Ticket(self.epoch)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.ticket()
    }

    /// 一括生成を開始（実行中なら `None`）
    pub fn begin_generation(&mut self) -> Option<Ticket> {
        if self.generating {
            return None;
        }
        self.generating = true;
        Some(self.ticket())
    }

    /// 生成結果を1件反映
    ///
    /// 古いチケットなら何もせず `false`。`None` は元の画像を残す。
    pub fn apply_generated(&mut self, ticket: Ticket, key: PortfolioKey, image: Option<DataUri>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        if let Some(image) = image {
            self.assets.portfolio.set(key, image);
        }
        true
    }

    pub fn finish_generation(&mut self, ticket: Ticket) {
        if self.is_current(ticket) {
            self.generating = false;
        }
    }

    // ============================================
    // 画像編集
    // ============================================

    pub fn open_edit(&mut self, key: PortfolioKey) -> bool {
        self.edit.open(key)
    }

    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    pub fn set_edit_prompt(&mut self, prompt: impl Into<String>) {
        self.edit.set_prompt(prompt);
    }

    /// 編集を送信（対象なし・指示が空・送信中なら `None`）
    pub fn begin_edit(&mut self) -> Option<EditRequest> {
        let (key, prompt) = self.edit.begin()?;
        Some(EditRequest {
            ticket: self.ticket(),
            key,
            image: self.assets.portfolio.get(key).clone(),
            prompt,
        })
    }

    /// 編集結果を反映
    ///
    /// 成功時は対象の1枚だけ置き換えてセッションを閉じる。
    /// 古いチケットなら何もせず `false`。
    pub fn finish_edit(&mut self, ticket: Ticket, key: PortfolioKey, image: Option<DataUri>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let succeeded = image.is_some();
        if let Some(image) = image {
            self.assets.portfolio.set(key, image);
        }
        self.edit.finish(succeeded);
        true
    }

    /// 実行中の処理を無効化（画面破棄・再読み込み時）
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.generating = false;
        self.edit = EditSession::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Portfolio;
    use crate::navigator::Direction;

    fn state() -> ShellState {
        let image = DataUri::from_bytes("image/png", b"old");
        ShellState::new(
            PresentationDocument::default(),
            AssetBundle {
                logo: image.clone(),
                management_photos: vec![],
                portfolio: Portfolio::filled(&image),
            },
        )
    }

    fn fresh() -> DataUri {
        DataUri::from_bytes("image/png", b"new")
    }

    #[test]
    fn test_navigation_through_state() {
        let mut shell = state();
        assert!(!shell.previous());
        assert!(shell.next());
        assert!(shell.jump_to(9));
        assert!(!shell.next());
        assert_eq!(shell.navigator().current(), 9);
        assert_eq!(shell.navigator().direction(), Direction::Forward);
        assert_eq!(shell.slides().len(), SLIDE_COUNT);
    }

    #[test]
    fn test_generation_applies_incrementally() {
        let mut shell = state();
        let ticket = shell.begin_generation().expect("開始できるはず");
        assert!(shell.begin_generation().is_none());

        assert!(shell.apply_generated(ticket, PortfolioKey::SawitMill, Some(fresh())));
        assert_eq!(shell.assets().portfolio.get(PortfolioKey::SawitMill), &fresh());

        assert!(shell.apply_generated(ticket, PortfolioKey::FisheryOcean, None));
        assert_ne!(shell.assets().portfolio.get(PortfolioKey::FisheryOcean), &fresh());

        shell.finish_generation(ticket);
        assert!(!shell.is_generating());
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut shell = state();
        let ticket = shell.begin_generation().expect("開始できるはず");
        shell.invalidate();

        assert!(!shell.apply_generated(ticket, PortfolioKey::SawitMill, Some(fresh())));
        assert_ne!(shell.assets().portfolio.get(PortfolioKey::SawitMill), &fresh());
        assert!(shell.begin_generation().is_some());
    }

    #[test]
    fn test_edit_flow_success() {
        let mut shell = state();
        assert!(shell.begin_edit().is_none());

        shell.open_edit(PortfolioKey::FarmVegetables);
        shell.set_edit_prompt("Add more sunset glow");
        let request = shell.begin_edit().expect("送信できるはず");
        assert_eq!(request.key, PortfolioKey::FarmVegetables);
        assert_eq!(request.prompt, "Add more sunset glow");

        assert!(shell.finish_edit(request.ticket, request.key, Some(fresh())));
        assert_eq!(shell.assets().portfolio.get(PortfolioKey::FarmVegetables), &fresh());
        assert_eq!(shell.edit().target(), None);
        assert_eq!(shell.edit().prompt(), "");
    }

    #[test]
    fn test_edit_failure_keeps_image_and_prompt() {
        let mut shell = state();
        shell.open_edit(PortfolioKey::FarmVegetables);
        shell.set_edit_prompt("Brighter");
        let request = shell.begin_edit().expect("送信できるはず");
        let before = shell.assets().clone();

        assert!(shell.finish_edit(request.ticket, request.key, None));
        assert_eq!(shell.assets(), &before);
        assert_eq!(shell.edit().target(), Some(PortfolioKey::FarmVegetables));
        assert_eq!(shell.edit().prompt(), "Brighter");
        assert!(!shell.edit().is_pending());
    }

    #[test]
    fn test_stale_edit_discarded() {
        let mut shell = state();
        shell.open_edit(PortfolioKey::SawitPlantation);
        shell.set_edit_prompt("Mist");
        let request = shell.begin_edit().expect("送信できるはず");
        shell.invalidate();

        assert!(!shell.finish_edit(request.ticket, request.key, Some(fresh())));
        assert_ne!(shell.assets().portfolio.get(PortfolioKey::SawitPlantation), &fresh());
    }
}
