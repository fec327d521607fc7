//! スライド記述子
//!
//! 文書とアセットから各スライドの表示内容を組み立てる。
//! 画面表示（アニメーションあり）とPDF出力（静的）は同じ記述子を使い、
//! 違いは `VisualStyle` だけで表現する。

use crate::assets::{AssetBundle, PortfolioKey};
use crate::data_uri::DataUri;
use crate::document::{Pillar, PresentationDocument, RoadmapPhase, SectorKey};

/// スライド枚数
pub const SLIDE_COUNT: usize = 10;

/// 課題スライドに載せる課題の最大数
pub const MAX_PROBLEM_POINTS: usize = 4;

/// 要約スライドの指標ラベル
pub const IMPACT_METRIC_LABEL: &str = "Petani & Nelayan Binaan";

/// セクタースライドのバリューチェーン見出し
pub const VALUE_CHAIN_LABEL: &str = "Value Chain Strategy";

// ============================================
// 描画スタイル
// ============================================

/// 描画スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualStyle {
    /// 画面表示（要素ごとに順番に表示）
    Animated,
    /// 印刷/エクスポート
    Static,
}

impl VisualStyle {
    /// 要素の表示遅延（秒）。静的スタイルでは `None`。
    pub fn stagger_delay(self, order: usize) -> Option<f32> {
        match self {
            VisualStyle::Animated => Some(order as f32 * 0.1),
            VisualStyle::Static => None,
        }
    }

    pub fn is_animated(self) -> bool {
        self == VisualStyle::Animated
    }
}

// ============================================
// 記述子
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Cover,
    ExecutiveSummary,
    Management,
    ProblemSolution,
    Advantages,
    Sector(SectorKey),
    Roadmap,
    Investment,
}

impl SlideKind {
    /// 表示順
    pub const ALL: [SlideKind; SLIDE_COUNT] = [
        SlideKind::Cover,
        SlideKind::ExecutiveSummary,
        SlideKind::Management,
        SlideKind::ProblemSolution,
        SlideKind::Advantages,
        SlideKind::Sector(SectorKey::Sawit),
        SlideKind::Sector(SectorKey::Perikanan),
        SlideKind::Sector(SectorKey::Pertanian),
        SlideKind::Roadmap,
        SlideKind::Investment,
    ];

    /// 見出し上の小見出し（表紙はなし）
    pub fn eyebrow(self) -> &'static str {
        match self {
            SlideKind::Cover => "",
            SlideKind::ExecutiveSummary => "Overview",
            SlideKind::Management => "Leadership",
            SlideKind::ProblemSolution => "Market Gaps",
            SlideKind::Advantages => "Our Edge",
            SlideKind::Sector(SectorKey::Sawit) => "Sector 01",
            SlideKind::Sector(SectorKey::Perikanan) => "Sector 02",
            SlideKind::Sector(SectorKey::Pertanian) => "Sector 03",
            SlideKind::Roadmap => "Execution",
            SlideKind::Investment => "Future Outlook",
        }
    }

    /// 要素キー（DOMのkeyなどに使う）
    pub fn key(self) -> &'static str {
        match self {
            SlideKind::Cover => "cover",
            SlideKind::ExecutiveSummary => "summary",
            SlideKind::Management => "team",
            SlideKind::ProblemSolution => "problem-solution",
            SlideKind::Advantages => "advantages",
            SlideKind::Sector(key) => key.as_str(),
            SlideKind::Roadmap => "roadmap",
            SlideKind::Investment => "investment",
        }
    }
}

/// 経営陣カード
#[derive(Debug, Clone, PartialEq)]
pub struct MemberCard<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub photo: Option<&'a DataUri>,
}

/// セクタースライドの写真枠
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoSlot<'a> {
    pub key: PortfolioKey,
    pub image: &'a DataUri,
}

/// 投資提案の3つの箱
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentBox<'a> {
    pub title: &'static str,
    pub items: &'a [String],
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlideBody<'a> {
    Cover {
        logo: &'a DataUri,
        subtitle: &'a str,
        date: &'a str,
    },
    ExecutiveSummary {
        points: &'a [String],
        metric_value: &'a str,
        metric_label: &'static str,
    },
    Management {
        members: Vec<MemberCard<'a>>,
    },
    ProblemSolution {
        problem_title: &'a str,
        problem_points: &'a [String],
        solution_title: &'a str,
        pillars: &'a [Pillar],
    },
    Advantages {
        items: &'a [String],
    },
    Sector {
        value_chain: &'a str,
        operations: &'a [String],
        photos: Vec<PhotoSlot<'a>>,
    },
    Roadmap {
        phases: [&'a RoadmapPhase; 3],
    },
    Investment {
        boxes: [InvestmentBox<'a>; 3],
        closing: &'a str,
        contacts: [&'a str; 3],
    },
}

/// 1枚分の表示内容
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDescriptor<'a> {
    pub kind: SlideKind,
    pub eyebrow: &'static str,
    pub heading: &'a str,
    pub body: SlideBody<'a>,
}

impl SlideDescriptor<'_> {
    /// スライド上の全テキスト（表示順）
    pub fn text_content(&self) -> Vec<String> {
        let mut texts = Vec::new();
        if !self.eyebrow.is_empty() {
            texts.push(self.eyebrow.to_string());
        }
        texts.push(self.heading.to_string());

        match &self.body {
            SlideBody::Cover { subtitle, date, .. } => {
                texts.push(subtitle.to_string());
                texts.push(date.to_string());
            }
            SlideBody::ExecutiveSummary { points, metric_value, metric_label } => {
                texts.extend(points.iter().cloned());
                texts.push(metric_value.to_string());
                texts.push(metric_label.to_string());
            }
            SlideBody::Management { members } => {
                for member in members {
                    texts.push(member.name.to_string());
                    texts.push(member.title.to_string());
                }
            }
            SlideBody::ProblemSolution { problem_title, problem_points, solution_title, pillars } => {
                texts.push(problem_title.to_string());
                texts.extend(problem_points.iter().cloned());
                texts.push(solution_title.to_string());
                for pillar in pillars.iter() {
                    texts.push(pillar.name.clone());
                    texts.push(pillar.description.clone());
                }
            }
            SlideBody::Advantages { items } => texts.extend(items.iter().cloned()),
            SlideBody::Sector { value_chain, operations, .. } => {
                texts.push(VALUE_CHAIN_LABEL.to_string());
                texts.push(value_chain.to_string());
                texts.extend(operations.iter().cloned());
            }
            SlideBody::Roadmap { phases } => {
                for (i, phase) in phases.iter().enumerate() {
                    texts.push(format!("Phase {}", i + 1));
                    texts.push(phase.title.clone());
                    texts.extend(phase.milestones.iter().cloned());
                }
            }
            SlideBody::Investment { boxes, closing, contacts } => {
                for b in boxes.iter() {
                    texts.push(b.title.to_string());
                    texts.extend(b.items.iter().cloned());
                }
                texts.push(closing.to_string());
                texts.extend(contacts.iter().map(|c| c.to_string()));
            }
        }
        texts
    }
}

// ============================================
// 構築
// ============================================

/// 全スライドを表示順に構築
pub fn build_slides<'a>(doc: &'a PresentationDocument, assets: &'a AssetBundle) -> Vec<SlideDescriptor<'a>> {
    SlideKind::ALL
        .into_iter()
        .map(|kind| build_slide(kind, doc, assets))
        .collect()
}

/// 1枚を構築
pub fn build_slide<'a>(kind: SlideKind, doc: &'a PresentationDocument, assets: &'a AssetBundle) -> SlideDescriptor<'a> {
    let (heading, body): (&'a str, SlideBody<'a>) = match kind {
        SlideKind::Cover => (
            doc.meta.title.as_str(),
            SlideBody::Cover {
                logo: &assets.logo,
                subtitle: &doc.meta.subtitle,
                date: &doc.meta.date,
            },
        ),
        SlideKind::ExecutiveSummary => (
            "Executive Summary",
            SlideBody::ExecutiveSummary {
                points: &doc.executive_summary,
                metric_value: &doc.traction.impact.farmers,
                metric_label: IMPACT_METRIC_LABEL,
            },
        ),
        SlideKind::Management => (
            "Management & Supervision",
            SlideBody::Management {
                members: doc
                    .meta
                    .office
                    .management_team
                    .iter()
                    .enumerate()
                    .map(|(i, m)| MemberCard {
                        name: &m.name,
                        title: &m.title,
                        photo: assets.management_photos.get(i),
                    })
                    .collect(),
            },
        ),
        SlideKind::ProblemSolution => {
            let points = &doc.problem_statement.points;
            (
                "Problem & Solution",
                SlideBody::ProblemSolution {
                    problem_title: &doc.problem_statement.title,
                    problem_points: &points[..points.len().min(MAX_PROBLEM_POINTS)],
                    solution_title: &doc.solution.title,
                    pillars: &doc.solution.pillars,
                },
            )
        }
        SlideKind::Advantages => (
            "Competitive Advantages",
            SlideBody::Advantages {
                items: &doc.competitive_advantages,
            },
        ),
        SlideKind::Sector(key) => {
            let sector = doc.sectors.get(key);
            (
                key.display_name(),
                SlideBody::Sector {
                    value_chain: &sector.value_chain,
                    operations: &sector.operations,
                    photos: sector
                        .photos
                        .iter()
                        .map(|&photo| PhotoSlot {
                            key: photo,
                            image: assets.portfolio.get(photo),
                        })
                        .collect(),
                },
            )
        }
        SlideKind::Roadmap => (
            "Strategic Roadmap",
            SlideBody::Roadmap {
                phases: doc.roadmap.phases(),
            },
        ),
        SlideKind::Investment => {
            let ask = &doc.investment_ask;
            let office = &doc.meta.office;
            (
                "Investment Proposition",
                SlideBody::Investment {
                    boxes: [
                        InvestmentBox { title: "Penggunaan Dana", items: &ask.use_of_funds },
                        InvestmentBox { title: "Rationale", items: &ask.rationale },
                        InvestmentBox { title: "Return & Exit", items: &ask.investor_return },
                    ],
                    closing: &doc.closing,
                    contacts: [office.website.as_str(), office.phone.as_str(), office.email.as_str()],
                },
            )
        }
    };

    SlideDescriptor {
        kind,
        eyebrow: kind.eyebrow(),
        heading,
        body,
    }
}
