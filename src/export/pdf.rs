//! PDF出力
//!
//! `layout::layout_pages` の要素を printpdf の描画命令へ変換する。
//! 画像は品質設定に合わせて縮小・JPEG再圧縮してから埋め込む。
//! SVGなど埋め込めない画像はプレースホルダーパネルで代替する。

use super::layout::{
    layout_pages, text_width, wrap_text, Align, Element, FontWeight, ImageFit, PdfPage, Swatch,
    LINE_HEIGHT_EM, PAGE_HEIGHT_PX, PAGE_WIDTH_PX, PLACEHOLDER_GOLD, PLACEHOLDER_LABEL,
    PLACEHOLDER_NAVY,
};
use crate::cli::PdfQuality;
use crate::error::{DeckError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use ksim_deck_common::{AssetBundle, DataUri, PresentationDocument};
use printpdf::{
    BuiltinFont, Color, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfSaveOptions, Point, Polygon,
    PolygonRing, Pt, RawImage, Rgb, TextItem, WindingOrder, XObjectId, XObjectTransform,
};
use rayon::prelude::*;
use std::path::Path;

/// px → mm（1px = 1pt）
const PT_TO_MM: f32 = 25.4 / 72.0;

/// 文書タイトル
const DOCUMENT_TITLE: &str = "KSIM Strategic Deck";

/// 箇条書きの行頭マーカー
const BULLET_SIZE_PX: f32 = 5.0;
const BULLET_INDENT_PX: f32 = 16.0;
const LIST_ITEM_GAP_EM: f32 = 0.7;

// ============================================
// 画像の前処理
// ============================================

/// 埋め込み用に変換済みの画像
struct PreparedImage {
    raw: RawImage,
    width: u32,
    height: u32,
}

/// 同一画像・同一枠は1回だけ変換する
#[derive(Clone, Copy)]
struct ImageJob<'a> {
    image: &'a DataUri,
    w: f32,
    h: f32,
    fit: ImageFit,
}

impl PartialEq for ImageJob<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.image == other.image && self.w == other.w && self.h == other.h && self.fit == other.fit
    }
}

/// 枠の縦横比に合わせて中央を切り抜く
fn crop_to_aspect(img: DynamicImage, w: f32, h: f32) -> DynamicImage {
    let (iw, ih) = (img.width(), img.height());
    if iw == 0 || ih == 0 || w <= 0.0 || h <= 0.0 {
        return img;
    }
    let target = w / h;
    let current = iw as f32 / ih as f32;

    if current > target {
        let new_w = ((ih as f32 * target).round() as u32).clamp(1, iw);
        img.crop_imm((iw - new_w) / 2, 0, new_w, ih)
    } else {
        let new_h = ((iw as f32 / target).round() as u32).clamp(1, ih);
        img.crop_imm(0, (ih - new_h) / 2, iw, new_h)
    }
}

/// Data URIを埋め込み可能なJPEGへ変換
///
/// SVG・デコード不能な画像は `Ok(None)`（プレースホルダーで描画）。
fn prepare_image(job: ImageJob<'_>, quality: PdfQuality) -> Result<Option<PreparedImage>> {
    if job.image.is_svg() {
        return Ok(None);
    }

    let bytes = match job.image.decode() {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("画像デコード失敗 ({}): {}", job.image.mime_type(), e);
            return Ok(None);
        }
    };
    let mut img = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => {
            log::warn!("画像読み込み失敗 ({}): {}", job.image.mime_type(), e);
            return Ok(None);
        }
    };

    if job.fit == ImageFit::Cover {
        img = crop_to_aspect(img, job.w, job.h);
    }

    // 縮小
    let max_width = quality.max_width();
    if img.width() > max_width {
        let new_height = ((img.height() as f32 * max_width as f32 / img.width() as f32).round() as u32).max(1);
        img = img.resize_exact(max_width, new_height, FilterType::Triangle);
    }

    // JPEG再圧縮
    let rgb = img.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.jpeg_quality())
        .encode_image(&rgb)
        .map_err(|e| DeckError::PdfGeneration(format!("JPEGエンコードエラー: {}", e)))?;

    let mut warnings = Vec::new();
    let raw = RawImage::decode_from_bytes(&jpeg, &mut warnings)
        .map_err(|e| DeckError::PdfGeneration(format!("画像埋め込みエラー: {}", e)))?;

    Ok(Some(PreparedImage {
        raw,
        width: rgb.width(),
        height: rgb.height(),
    }))
}

// ============================================
// 描画命令
// ============================================

fn color(swatch: Swatch) -> Color {
    let (r, g, b) = swatch.unit();
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

fn font(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
        FontWeight::Italic => BuiltinFont::HelveticaOblique,
    }
}

/// 組み込みフォント（WinAnsi）で出せない文字を置き換える
fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '→' => out.push_str("->"),
            '–' | '—' => out.push('-'),
            '“' | '”' => out.push('"'),
            '‘' | '’' => out.push('\''),
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// 左上原点のpxからPDF座標へ
fn point(x: f32, y_from_top: f32) -> Point {
    Point {
        x: Pt(x),
        y: Pt(PAGE_HEIGHT_PX - y_from_top),
    }
}

fn push_rect(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, h: f32, fill: Swatch) {
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
    ops.push(Op::SetFillColor { col: color(fill) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: corners
                    .iter()
                    .map(|&(px, py)| LinePoint {
                        p: point(px, py),
                        bezier: false,
                    })
                    .collect(),
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn push_line(ops: &mut Vec<Op>, x: f32, top: f32, size: f32, color_: Swatch, weight: FontWeight, line: &str) {
    let baseline = top + size * 0.8;
    let font = font(weight);
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: point(x, baseline),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::SetFillColor { col: color(color_) });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(sanitize(line))],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// 折り返して描画し、次の行の上端を返す
#[allow(clippy::too_many_arguments)]
fn push_paragraph(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, size: f32, color_: Swatch, weight: FontWeight, align: Align, text: &str) -> f32 {
    let line_height = size * LINE_HEIGHT_EM;
    let mut top = y;
    for line in wrap_text(text, w, size) {
        let line_x = match align {
            Align::Left => x,
            Align::Center => x + ((w - text_width(&line, size)) / 2.0).max(0.0),
        };
        push_line(ops, line_x, top, size, color_, weight, &line);
        top += line_height;
    }
    top
}

fn push_placeholder(ops: &mut Vec<Op>, x: f32, y: f32, w: f32, h: f32) {
    push_rect(ops, x, y, w, h, PLACEHOLDER_NAVY);
    let size = (h / 10.0).clamp(8.0, 24.0);
    push_paragraph(ops, x, y + (h - size) / 2.0, w, size, PLACEHOLDER_GOLD, FontWeight::Bold, Align::Center, PLACEHOLDER_LABEL);
}

#[allow(clippy::too_many_arguments)]
fn push_image(ops: &mut Vec<Op>, id: &XObjectId, prepared: &PreparedImage, x: f32, y: f32, w: f32, h: f32, fit: ImageFit) {
    let (iw, ih) = (prepared.width as f32, prepared.height as f32);
    let (draw_w, draw_h) = match fit {
        ImageFit::Cover => (w, h),
        ImageFit::Contain => {
            let scale = (w / iw).min(h / ih);
            (iw * scale, ih * scale)
        }
    };
    let left = x + (w - draw_w) / 2.0;
    let top = y + (h - draw_h) / 2.0;

    ops.push(Op::SaveGraphicsState);
    ops.push(Op::UseXobject {
        id: id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(left)),
            translate_y: Some(Pt(PAGE_HEIGHT_PX - top - draw_h)),
            scale_x: Some(draw_w / iw),
            scale_y: Some(draw_h / ih),
            dpi: Some(72.0),
            ..Default::default()
        },
    });
    ops.push(Op::RestoreGraphicsState);
}

// ============================================
// PDF生成
// ============================================

/// 文書とアセットからPDFバイト列を生成
///
/// 全スライドを表示順に1ページずつ描画する。失敗時は部分的な出力を返さない。
pub fn render_pdf(doc: &PresentationDocument, assets: &AssetBundle, quality: PdfQuality) -> Result<Vec<u8>> {
    let pages = layout_pages(doc, assets);
    render_pages(&pages, quality).map_err(|e| {
        log::error!("PDF生成に失敗: {}", e);
        e
    })
}

fn render_pages(pages: &[PdfPage<'_>], quality: PdfQuality) -> Result<Vec<u8>> {
    // 画像ジョブを重複なしで収集
    let mut jobs: Vec<ImageJob<'_>> = Vec::new();
    for page in pages {
        for element in &page.elements {
            if let Element::Image { w, h, fit, image, .. } = element {
                let job = ImageJob { image: *image, w: *w, h: *h, fit: *fit };
                if !jobs.contains(&job) {
                    jobs.push(job);
                }
            }
        }
    }

    let prepared: Vec<Option<PreparedImage>> = jobs
        .par_iter()
        .map(|job| prepare_image(*job, quality))
        .collect::<Result<_>>()?;

    let mut document = PdfDocument::new(DOCUMENT_TITLE);
    let ids: Vec<Option<XObjectId>> = prepared
        .iter()
        .map(|p| p.as_ref().map(|p| document.add_image(&p.raw)))
        .collect();

    let mut pdf_pages = Vec::with_capacity(pages.len());
    for page in pages {
        let mut ops = Vec::new();
        for element in &page.elements {
            match element {
                Element::Rect { x, y, w, h, fill } => push_rect(&mut ops, *x, *y, *w, *h, *fill),
                Element::Text { x, y, w, size, color, weight, align, text } => {
                    push_paragraph(&mut ops, *x, *y, *w, *size, *color, *weight, *align, text);
                }
                Element::List { x, y, w, size, color, items } => {
                    let mut top = *y;
                    for item in items {
                        let marker_top = top + (*size - BULLET_SIZE_PX) / 2.0;
                        push_rect(&mut ops, *x, marker_top, BULLET_SIZE_PX, BULLET_SIZE_PX, *color);
                        top = push_paragraph(&mut ops, x + BULLET_INDENT_PX, top, w - BULLET_INDENT_PX, *size, *color, FontWeight::Regular, Align::Left, item);
                        top += size * LIST_ITEM_GAP_EM;
                    }
                }
                Element::Image { x, y, w, h, fit, image } => {
                    let job = ImageJob { image: *image, w: *w, h: *h, fit: *fit };
                    let slot = jobs.iter().position(|j| *j == job);
                    match slot.and_then(|i| Some((ids[i].as_ref()?, prepared[i].as_ref()?))) {
                        Some((id, prepared)) => push_image(&mut ops, id, prepared, *x, *y, *w, *h, *fit),
                        None => push_placeholder(&mut ops, *x, *y, *w, *h),
                    }
                }
            }
        }
        pdf_pages.push(printpdf::PdfPage::new(
            Mm(PAGE_WIDTH_PX * PT_TO_MM),
            Mm(PAGE_HEIGHT_PX * PT_TO_MM),
            ops,
        ));
    }

    let mut warnings = Vec::new();
    let bytes = document
        .with_pages(pdf_pages)
        .save(&PdfSaveOptions::default(), &mut warnings);

    if bytes.is_empty() {
        return Err(DeckError::PdfGeneration("PDFの出力が空です".into()));
    }
    Ok(bytes)
}

/// PDFファイルを書き出す
pub fn generate_pdf(doc: &PresentationDocument, assets: &AssetBundle, output_path: &Path, quality: PdfQuality) -> Result<()> {
    let bytes = render_pdf(doc, assets, quality)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}
