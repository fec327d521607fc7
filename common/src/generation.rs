//! AI画像生成
//!
//! 生成/編集の境界（`ImageGenerator`）と、ポートフォリオ6枚の一括生成キュー。
//! 一括生成は1枚ずつ順番に処理し、各結果をすぐ呼び出し側に渡す。

use crate::assets::{Portfolio, PortfolioKey};
use crate::data_uri::DataUri;

/// 画像生成の境界
///
/// 失敗は `None`（呼び出し側は元の画像を残す）。
#[allow(async_fn_in_trait)]
pub trait ImageGenerator {
    /// プロンプトから新規生成
    async fn generate(&self, prompt: &str) -> Option<DataUri>;

    /// 既存画像を指示に従って編集
    async fn edit(&self, image: &DataUri, prompt: &str) -> Option<DataUri>;
}

/// ポートフォリオ画像の生成プロンプト（処理順）
pub const PORTFOLIO_PROMPTS: [(PortfolioKey, &str); 6] = [
    (
        PortfolioKey::SawitPlantation,
        "A vast, lush green sustainable oil palm plantation in Indonesia, aerial view, morning mist, professional agricultural photography.",
    ),
    (
        PortfolioKey::SawitMill,
        "A modern, clean industrial mini CPO processing plant, sustainable technology, professional industrial architecture photography.",
    ),
    (
        PortfolioKey::FisheryOcean,
        "A modern fishing vessel in the deep blue Indonesian ocean, sustainable fishing practices, cinematic sunrise, high-end maritime photography.",
    ),
    (
        PortfolioKey::FisheryColdStorage,
        "A state-of-the-art industrial cold storage facility for seafood, clean blue lighting, professional logistics photography.",
    ),
    (
        PortfolioKey::FarmVegetables,
        "A high-tech greenhouse with vibrant organic vegetables, hydroponic systems, bright natural lighting, professional horticulture photography.",
    ),
    (
        PortfolioKey::FarmDistribution,
        "A modern agricultural distribution center with refrigerated trucks, organized logistics, professional supply chain photography.",
    ),
];

/// 一括生成の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub updated: Vec<PortfolioKey>,
    pub failed: Vec<PortfolioKey>,
    /// 途中で打ち切られたか（結果の受け取り側が破棄された等）
    pub aborted: bool,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.updated.len() + self.failed.len()
    }
}

/// 1件分のジョブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub key: PortfolioKey,
    pub prompt: String,
}

/// 逐次生成キュー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationQueue {
    jobs: Vec<GenerationJob>,
}

impl GenerationQueue {
    pub fn new(jobs: Vec<GenerationJob>) -> Self {
        Self { jobs }
    }

    /// ポートフォリオ6枚分（`PORTFOLIO_PROMPTS` の順）
    pub fn portfolio() -> Self {
        Self::new(
            PORTFOLIO_PROMPTS
                .iter()
                .map(|(key, prompt)| GenerationJob {
                    key: *key,
                    prompt: prompt.to_string(),
                })
                .collect(),
        )
    }

    pub fn jobs(&self) -> &[GenerationJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// 1件ずつ順番に生成する
    ///
    /// 各結果は完了直後に `sink` へ渡す。`sink` が `false` を返したら残りは処理しない。
    /// 1件の失敗で全体は止まらない。
    pub async fn run<G, F>(&self, generator: &G, mut sink: F) -> BatchReport
    where
        G: ImageGenerator,
        F: FnMut(PortfolioKey, Option<DataUri>) -> bool,
    {
        let mut report = BatchReport::default();

        for job in &self.jobs {
            let result = generator.generate(&job.prompt).await;
            match result {
                Some(_) => report.updated.push(job.key),
                None => report.failed.push(job.key),
            }
            if !sink(job.key, result) {
                report.aborted = true;
                break;
            }
        }

        report
    }

    /// ポートフォリオへ直接反映（CLI用）
    pub async fn apply_to<G: ImageGenerator>(&self, generator: &G, portfolio: &mut Portfolio) -> BatchReport {
        self.run(generator, |key, image| {
            if let Some(image) = image {
                portfolio.set(key, image);
            }
            true
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::{Cell, RefCell};

    /// N回目の呼び出しだけ失敗する生成器
    struct FailingOnNth {
        fail_on: usize,
        calls: Cell<usize>,
        prompts: RefCell<Vec<String>>,
    }

    impl FailingOnNth {
        fn new(fail_on: usize) -> Self {
            Self {
                fail_on,
                calls: Cell::new(0),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageGenerator for FailingOnNth {
        async fn generate(&self, prompt: &str) -> Option<DataUri> {
            let n = self.calls.get() + 1;
            self.calls.set(n);
            self.prompts.borrow_mut().push(prompt.to_string());
            if n == self.fail_on {
                None
            } else {
                Some(DataUri::from_bytes("image/png", format!("gen-{}", n).as_bytes()))
            }
        }

        async fn edit(&self, _image: &DataUri, _prompt: &str) -> Option<DataUri> {
            None
        }
    }

    #[test]
    fn test_third_failure_leaves_five_updated() {
        let original = DataUri::from_bytes("image/png", b"original");
        let mut portfolio = Portfolio::filled(&original);
        let generator = FailingOnNth::new(3);

        let report = block_on(GenerationQueue::portfolio().apply_to(&generator, &mut portfolio));

        assert_eq!(report.updated.len(), 5);
        assert_eq!(report.failed, vec![PortfolioKey::FisheryOcean]);
        assert!(!report.aborted);
        assert_eq!(portfolio.get(PortfolioKey::FisheryOcean), &original);

        let changed = PortfolioKey::ALL
            .into_iter()
            .filter(|key| portfolio.get(*key) != &original)
            .count();
        assert_eq!(changed, 5);
    }

    #[test]
    fn test_processed_in_declaration_order() {
        let generator = FailingOnNth::new(0);
        let mut seen = Vec::new();

        block_on(GenerationQueue::portfolio().run(&generator, |key, _| {
            seen.push(key);
            true
        }));

        assert_eq!(seen, PortfolioKey::ALL.to_vec());
        let prompts = generator.prompts.borrow();
        assert_eq!(prompts.len(), 6);
        assert!(prompts[0].contains("oil palm plantation"));
        assert!(prompts[5].contains("distribution center"));
    }

    #[test]
    fn test_sink_can_stop_queue() {
        let generator = FailingOnNth::new(0);
        let mut received = 0;

        let report = block_on(GenerationQueue::portfolio().run(&generator, |_, _| {
            received += 1;
            received < 2
        }));

        assert!(report.aborted);
        assert_eq!(report.processed(), 2);
        assert_eq!(generator.calls.get(), 2);
    }
}
