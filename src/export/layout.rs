//! レイアウト設定モジュール
//!
//! PDFページ（1200×675px）上の要素配置を定義する。
//! 座標は左上原点のpx。PDF出力時に 1px = 1pt として下端原点へ変換する。

use ksim_deck_common::slides::{build_slides, SlideBody, SlideDescriptor, SlideKind, VALUE_CHAIN_LABEL};
use ksim_deck_common::{AssetBundle, DataUri, PresentationDocument, SectorKey};

// ============================================
// ページサイズ
// ============================================

/// 1スライド = 1ページ（px）
pub const PAGE_WIDTH_PX: f32 = 1200.0;
pub const PAGE_HEIGHT_PX: f32 = 675.0;

/// 外周余白（px）
pub const PAGE_PADDING_PX: f32 = 48.0;

/// 本文の左端（余白 + 枠線内側）
pub const CONTENT_LEFT_PX: f32 = 64.0;
pub const CONTENT_WIDTH_PX: f32 = PAGE_WIDTH_PX - CONTENT_LEFT_PX * 2.0; // 1072px

/// 3列グリッド
pub const COLUMN_WIDTH_PX: f32 = 340.0;
pub const COLUMN_STEP_PX: f32 = 366.0;

// ============================================
// 配色
// ============================================

/// RGB色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Swatch {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// "0F172A" 形式
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// 0.0-1.0 の成分
    pub fn unit(&self) -> (f32, f32, f32) {
        (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0)
    }
}

pub const PRIMARY: Swatch = Swatch::rgb(0x0F, 0x17, 0x2A);
pub const SECONDARY: Swatch = Swatch::rgb(0x33, 0x41, 0x55);
pub const ACCENT: Swatch = Swatch::rgb(0xC5, 0xA0, 0x59);
pub const BODY_TEXT: Swatch = Swatch::rgb(0x47, 0x55, 0x69);
pub const MUTED_TEXT: Swatch = Swatch::rgb(0x94, 0xA3, 0xB8);
pub const PANEL: Swatch = Swatch::rgb(0xF1, 0xF5, 0xF9);
pub const RULE: Swatch = Swatch::rgb(0xE2, 0xE8, 0xF0);
pub const WHITE: Swatch = Swatch::rgb(0xFF, 0xFF, 0xFF);
pub const PLACEHOLDER_NAVY: Swatch = Swatch::rgb(0x0A, 0x26, 0x47);
pub const PLACEHOLDER_GOLD: Swatch = Swatch::rgb(0xD4, 0xAF, 0x37);

/// 画像が埋め込めない場合のパネル文言
pub const PLACEHOLDER_LABEL: &str = "KSIM STRATEGIC DECK";

/// セクターごとのバリューチェーンパネル色
pub fn sector_panel(key: SectorKey) -> Swatch {
    match key {
        SectorKey::Sawit => PRIMARY,
        SectorKey::Perikanan => Swatch::rgb(0x3B, 0x82, 0xF6),
        SectorKey::Pertanian => Swatch::rgb(0x10, 0xB9, 0x81),
    }
}

// ============================================
// 要素
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 画像の収め方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFit {
    /// 枠を埋めるよう中央で切り抜く
    Cover,
    /// 枠内に全体を収める
    Contain,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    /// 塗りつぶし矩形
    Rect { x: f32, y: f32, w: f32, h: f32, fill: Swatch },
    /// 幅 `w` で折り返すテキスト（`y` は1行目の上端）
    Text {
        x: f32,
        y: f32,
        w: f32,
        size: f32,
        color: Swatch,
        weight: FontWeight,
        align: Align,
        text: String,
    },
    /// 箇条書き（項目ごとに折り返して下へ流す）
    List {
        x: f32,
        y: f32,
        w: f32,
        size: f32,
        color: Swatch,
        items: Vec<String>,
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fit: ImageFit,
        image: &'a DataUri,
    },
}

/// 1ページ分の要素
#[derive(Debug, Clone, PartialEq)]
pub struct PdfPage<'a> {
    pub kind: SlideKind,
    pub elements: Vec<Element<'a>>,
}

impl PdfPage<'_> {
    /// ページ上の全テキスト（描画順）
    pub fn text_content(&self) -> Vec<String> {
        let mut texts = Vec::new();
        for element in &self.elements {
            match element {
                Element::Text { text, .. } => texts.push(text.clone()),
                Element::List { items, .. } => texts.extend(items.iter().cloned()),
                _ => {}
            }
        }
        texts
    }

    pub fn images(&self) -> impl Iterator<Item = &DataUri> + '_ {
        self.elements.iter().filter_map(|e| match e {
            Element::Image { image, .. } => Some(*image),
            _ => None,
        })
    }
}

// ============================================
// 折り返し
// ============================================

/// 平均文字幅（フォントサイズ比）
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

/// 行送り（フォントサイズ比）
pub const LINE_HEIGHT_EM: f32 = 1.3;

/// 幅 `width` に収まるよう単語単位で折り返す
pub fn wrap_text(text: &str, width: f32, size: f32) -> Vec<String> {
    let max_chars = ((width / (size * AVG_CHAR_WIDTH_EM)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// 近似テキスト幅（中央揃え用）
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH_EM
}

// ============================================
// スライド → ページ
// ============================================

/// 全スライドをページ要素へ変換（表示順、1スライド1ページ）
pub fn layout_pages<'a>(doc: &'a PresentationDocument, assets: &'a AssetBundle) -> Vec<PdfPage<'a>> {
    build_slides(doc, assets).into_iter().map(layout_slide).collect()
}

#[allow(clippy::too_many_arguments)]
fn text(x: f32, y: f32, w: f32, size: f32, color: Swatch, weight: FontWeight, align: Align, text: &str) -> Element<'static> {
    Element::Text {
        x,
        y,
        w,
        size,
        color,
        weight,
        align,
        text: text.to_string(),
    }
}

fn list(x: f32, y: f32, w: f32, size: f32, items: &[String]) -> Element<'static> {
    Element::List {
        x,
        y,
        w,
        size,
        color: BODY_TEXT,
        items: items.to_vec(),
    }
}

fn rect(x: f32, y: f32, w: f32, h: f32, fill: Swatch) -> Element<'static> {
    Element::Rect { x, y, w, h, fill }
}

/// 枠線付きパネル（外側を線色、内側を塗り色で重ねる）
#[allow(clippy::too_many_arguments)]
fn outlined(elements: &mut Vec<Element<'_>>, x: f32, y: f32, w: f32, h: f32, line: Swatch, fill: Swatch, stroke: f32) {
    elements.push(rect(x, y, w, h, line));
    elements.push(rect(x + stroke, y + stroke, w - stroke * 2.0, h - stroke * 2.0, fill));
}

fn header(elements: &mut Vec<Element<'_>>, slide: &SlideDescriptor<'_>) {
    elements.push(text(CONTENT_LEFT_PX, 64.0, CONTENT_WIDTH_PX, 12.0, ACCENT, FontWeight::Bold, Align::Left, &slide.eyebrow.to_uppercase()));
    elements.push(text(CONTENT_LEFT_PX, 84.0, CONTENT_WIDTH_PX, 34.0, PRIMARY, FontWeight::Bold, Align::Left, slide.heading));
    elements.push(rect(CONTENT_LEFT_PX, 132.0, 120.0, 4.0, ACCENT));
}

fn layout_slide<'a>(slide: SlideDescriptor<'a>) -> PdfPage<'a> {
    let mut elements: Vec<Element<'a>> = Vec::new();

    // 外枠
    outlined(&mut elements, PAGE_PADDING_PX, PAGE_PADDING_PX, PAGE_WIDTH_PX - PAGE_PADDING_PX * 2.0, PAGE_HEIGHT_PX - PAGE_PADDING_PX * 2.0, PANEL, WHITE, 4.0);

    if slide.kind != SlideKind::Cover {
        header(&mut elements, &slide);
    }

    match &slide.body {
        SlideBody::Cover { logo, subtitle, date } => {
            elements.push(Element::Image { x: 510.0, y: 80.0, w: 180.0, h: 180.0, fit: ImageFit::Contain, image: *logo });
            elements.push(text(CONTENT_LEFT_PX, 300.0, CONTENT_WIDTH_PX, 46.0, PRIMARY, FontWeight::Bold, Align::Center, slide.heading));
            elements.push(text(CONTENT_LEFT_PX, 430.0, CONTENT_WIDTH_PX, 24.0, ACCENT, FontWeight::Bold, Align::Center, &subtitle.to_uppercase()));
            elements.push(text(CONTENT_LEFT_PX, 500.0, CONTENT_WIDTH_PX, 14.0, MUTED_TEXT, FontWeight::Bold, Align::Center, &date.to_uppercase()));
        }
        SlideBody::ExecutiveSummary { points, metric_value, metric_label } => {
            elements.push(list(CONTENT_LEFT_PX, 170.0, 640.0, 16.0, points));
            elements.push(rect(760.0, 200.0, 376.0, 8.0, ACCENT));
            elements.push(rect(760.0, 208.0, 376.0, 292.0, PRIMARY));
            elements.push(text(760.0, 280.0, 376.0, 64.0, ACCENT, FontWeight::Bold, Align::Center, metric_value));
            elements.push(text(780.0, 400.0, 336.0, 14.0, WHITE, FontWeight::Bold, Align::Center, &metric_label.to_uppercase()));
        }
        SlideBody::Management { members } => {
            for (i, member) in members.iter().enumerate() {
                let y = 170.0 + i as f32 * 190.0;
                elements.push(rect(CONTENT_LEFT_PX, y, 12.0, 160.0, ACCENT));
                elements.push(rect(CONTENT_LEFT_PX + 12.0, y, CONTENT_WIDTH_PX - 12.0, 160.0, PANEL));
                if let Some(photo) = member.photo {
                    elements.push(Element::Image { x: 104.0, y: y + 20.0, w: 120.0, h: 120.0, fit: ImageFit::Cover, image: photo });
                }
                elements.push(text(260.0, y + 40.0, 860.0, 24.0, PRIMARY, FontWeight::Bold, Align::Left, member.name));
                elements.push(text(260.0, y + 84.0, 860.0, 16.0, BODY_TEXT, FontWeight::Regular, Align::Left, member.title));
            }
        }
        SlideBody::ProblemSolution { problem_title, problem_points, solution_title, pillars } => {
            elements.push(rect(CONTENT_LEFT_PX, 160.0, 520.0, 450.0, PANEL));
            elements.push(text(88.0, 185.0, 472.0, 20.0, PRIMARY, FontWeight::Bold, Align::Left, problem_title));
            elements.push(list(88.0, 240.0, 472.0, 14.0, problem_points));

            outlined(&mut elements, 616.0, 160.0, 520.0, 450.0, SECONDARY, WHITE, 2.0);
            elements.push(text(640.0, 185.0, 472.0, 20.0, PRIMARY, FontWeight::Bold, Align::Left, solution_title));
            let pillar_items: Vec<String> = pillars
                .iter()
                .map(|p| format!("{}: {}", p.name, p.description))
                .collect();
            elements.push(list(640.0, 240.0, 472.0, 14.0, &pillar_items));
        }
        SlideBody::Advantages { items } => {
            for (i, item) in items.iter().enumerate() {
                let x = CONTENT_LEFT_PX + (i % 3) as f32 * COLUMN_STEP_PX;
                let y = 170.0 + (i / 3) as f32 * 225.0;
                outlined(&mut elements, x, y, COLUMN_WIDTH_PX, 205.0, RULE, WHITE, 1.0);
                elements.push(rect(x, y + 197.0, COLUMN_WIDTH_PX, 8.0, ACCENT));
                elements.push(text(x + 20.0, y + 70.0, COLUMN_WIDTH_PX - 40.0, 18.0, PRIMARY, FontWeight::Bold, Align::Center, item));
            }
        }
        SlideBody::Sector { value_chain, operations, photos } => {
            let panel = match slide.kind {
                SlideKind::Sector(key) => sector_panel(key),
                _ => PRIMARY,
            };
            elements.push(rect(CONTENT_LEFT_PX, 160.0, 640.0, 150.0, panel));
            elements.push(text(92.0, 180.0, 584.0, 10.0, ACCENT, FontWeight::Bold, Align::Left, &VALUE_CHAIN_LABEL.to_uppercase()));
            elements.push(text(92.0, 205.0, 584.0, 20.0, WHITE, FontWeight::Bold, Align::Left, value_chain));

            for (i, op) in operations.iter().enumerate() {
                let x = CONTENT_LEFT_PX + (i % 2) as f32 * 330.0;
                let y = 330.0 + (i / 2) as f32 * 140.0;
                outlined(&mut elements, x, y, 310.0, 125.0, RULE, WHITE, 1.0);
                elements.push(rect(x + 16.0, y + 16.0, 28.0, 28.0, panel));
                elements.push(text(x + 16.0, y + 22.0, 28.0, 12.0, WHITE, FontWeight::Bold, Align::Center, &(i + 1).to_string()));
                elements.push(text(x + 56.0, y + 18.0, 238.0, 14.0, SECONDARY, FontWeight::Bold, Align::Left, op));
            }

            for (i, photo) in photos.iter().enumerate() {
                let y = 160.0 + i as f32 * 230.0;
                elements.push(Element::Image { x: 736.0, y, w: 400.0, h: 215.0, fit: ImageFit::Cover, image: photo.image });
            }
        }
        SlideBody::Roadmap { phases } => {
            elements.push(rect(CONTENT_LEFT_PX, 387.0, CONTENT_WIDTH_PX, 6.0, RULE));
            for (i, phase) in phases.iter().enumerate() {
                let x = CONTENT_LEFT_PX + i as f32 * COLUMN_STEP_PX;
                outlined(&mut elements, x, 170.0, COLUMN_WIDTH_PX, 440.0, PRIMARY, WHITE, 1.0);
                elements.push(text(x + 24.0, 194.0, COLUMN_WIDTH_PX - 48.0, 12.0, ACCENT, FontWeight::Bold, Align::Left, &format!("PHASE {}", i + 1)));
                elements.push(text(x + 24.0, 216.0, COLUMN_WIDTH_PX - 48.0, 20.0, PRIMARY, FontWeight::Bold, Align::Left, &phase.title));
                elements.push(list(x + 24.0, 290.0, COLUMN_WIDTH_PX - 48.0, 15.0, &phase.milestones));
            }
        }
        SlideBody::Investment { boxes, closing, contacts } => {
            let colors = [PRIMARY, ACCENT, SECONDARY];
            for (i, b) in boxes.iter().enumerate() {
                let x = CONTENT_LEFT_PX + i as f32 * COLUMN_STEP_PX;
                outlined(&mut elements, x, 160.0, COLUMN_WIDTH_PX, 270.0, RULE, WHITE, 1.0);
                elements.push(rect(x, 422.0, COLUMN_WIDTH_PX, 8.0, colors[i]));
                elements.push(text(x + 24.0, 182.0, COLUMN_WIDTH_PX - 48.0, 16.0, PRIMARY, FontWeight::Bold, Align::Left, &b.title.to_uppercase()));
                elements.push(list(x + 24.0, 222.0, COLUMN_WIDTH_PX - 48.0, 12.0, b.items));
            }

            elements.push(rect(CONTENT_LEFT_PX, 450.0, CONTENT_WIDTH_PX, 165.0, PRIMARY));
            elements.push(text(104.0, 475.0, 992.0, 18.0, WHITE, FontWeight::Italic, Align::Center, &format!("\"{}\"", closing)));
            elements.push(text(104.0, 580.0, 992.0, 12.0, ACCENT, FontWeight::Bold, Align::Center, &contacts.join("   |   ")));
        }
    }

    PdfPage {
        kind: slide.kind,
        elements,
    }
}
