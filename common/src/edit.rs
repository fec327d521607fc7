//! 画像編集セッション
//!
//! 同時に開ける編集は1つだけ。別の画像を開くと書きかけの指示は捨てる。

use crate::assets::PortfolioKey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    target: Option<PortfolioKey>,
    prompt: String,
    pending: bool,
}

impl EditSession {
    pub fn target(&self) -> Option<PortfolioKey> {
        self.target
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_open_for(&self, key: PortfolioKey) -> bool {
        self.target == Some(key)
    }

    /// 編集を開く
    ///
    /// 送信中は切り替えられない。
    pub fn open(&mut self, key: PortfolioKey) -> bool {
        if self.pending {
            return false;
        }
        if self.target != Some(key) {
            self.prompt.clear();
        }
        self.target = Some(key);
        true
    }

    /// 閉じる（送信中の結果は `finish` で受け取る）
    pub fn cancel(&mut self) {
        if !self.pending {
            self.target = None;
            self.prompt.clear();
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        if self.target.is_some() && !self.pending {
            self.prompt = prompt.into();
        }
    }

    /// 送信開始
    ///
    /// 対象なし・指示が空・送信中の場合は `None`。
    pub fn begin(&mut self) -> Option<(PortfolioKey, String)> {
        if self.pending {
            return None;
        }
        let key = self.target?;
        if self.prompt.trim().is_empty() {
            return None;
        }
        self.pending = true;
        Some((key, self.prompt.clone()))
    }

    /// 送信完了
    ///
    /// 成功時はセッションを閉じる。失敗時は指示を残したまま再送できる状態に戻す。
    pub fn finish(&mut self, succeeded: bool) {
        self.pending = false;
        if succeeded {
            self.target = None;
            self.prompt.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_other_key_discards_draft() {
        let mut session = EditSession::default();
        session.open(PortfolioKey::SawitMill);
        session.set_prompt("Add more sunset glow");

        session.open(PortfolioKey::SawitMill);
        assert_eq!(session.prompt(), "Add more sunset glow");

        session.open(PortfolioKey::FarmVegetables);
        assert_eq!(session.target(), Some(PortfolioKey::FarmVegetables));
        assert_eq!(session.prompt(), "");
    }

    #[test]
    fn test_begin_refuses_empty_prompt() {
        let mut session = EditSession::default();
        assert!(session.begin().is_none());

        session.open(PortfolioKey::FisheryOcean);
        session.set_prompt("   ");
        assert!(session.begin().is_none());
        assert!(!session.is_pending());
    }

    #[test]
    fn test_single_pending_edit() {
        let mut session = EditSession::default();
        session.open(PortfolioKey::FisheryOcean);
        session.set_prompt("Brighter sky");

        let (key, prompt) = session.begin().expect("送信できるはず");
        assert_eq!(key, PortfolioKey::FisheryOcean);
        assert_eq!(prompt, "Brighter sky");

        assert!(session.begin().is_none());
        assert!(!session.open(PortfolioKey::SawitMill));
        session.cancel();
        assert_eq!(session.target(), Some(PortfolioKey::FisheryOcean));
    }

    #[test]
    fn test_finish_success_closes_failure_keeps_prompt() {
        let mut session = EditSession::default();
        session.open(PortfolioKey::FarmDistribution);
        session.set_prompt("More trucks");

        session.begin();
        session.finish(false);
        assert!(!session.is_pending());
        assert_eq!(session.target(), Some(PortfolioKey::FarmDistribution));
        assert_eq!(session.prompt(), "More trucks");

        session.begin();
        session.finish(true);
        assert_eq!(session, EditSession::default());
    }
}
