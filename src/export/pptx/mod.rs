//! PPTX出力モジュール
//!
//! スライドをインチ座標の図形に変換し、PresentationMLパッケージとしてZIPへ書き出す。
//! スライドは 16:9（10 × 5.625 インチ）、フォントはArial。

pub mod xml;

use crate::error::{DeckError, Result};
use crate::export::layout::{Align, FontWeight, ImageFit, Swatch, ACCENT, BODY_TEXT, PANEL, PRIMARY, SECONDARY, WHITE};
use ksim_deck_common::slides::{build_slides, SlideBody, SlideDescriptor, SlideKind};
use ksim_deck_common::{AssetBundle, DataUri, PresentationDocument, SectorKey};
use rayon::prelude::*;
use std::io::{Cursor, Write};
use std::path::Path;
use xml::PictureRef;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

// ============================================
// 図形モデル
// ============================================

/// インチ単位の矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Frame {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// 画像の切り抜き量（1/1000 %）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// 塗りつぶしパネル（`line` があれば枠線付き）
    Panel {
        frame: Frame,
        fill: Swatch,
        line: Option<Swatch>,
        rounded: bool,
    },
    Text {
        frame: Frame,
        size: f32,
        color: Swatch,
        weight: FontWeight,
        align: Align,
        bullets: bool,
        paragraphs: Vec<String>,
    },
    Picture {
        frame: Frame,
        fit: ImageFit,
        image: &'a DataUri,
    },
}

/// 1枚分の図形
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSlide<'a> {
    pub kind: SlideKind,
    pub shapes: Vec<Shape<'a>>,
}

impl<'a> DeckSlide<'a> {
    /// スライド上の全テキスト（描画順）
    pub fn text_content(&self) -> Vec<String> {
        self.shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Text { paragraphs, .. } => Some(paragraphs.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn images(&self) -> impl Iterator<Item = &'a DataUri> + '_ {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture { image, .. } => Some(*image),
            _ => None,
        })
    }
}

/// セクタースライドのバリューチェーン帯の色
pub fn sector_band(key: SectorKey) -> Swatch {
    match key {
        SectorKey::Sawit => Swatch::rgb(0xE5, 0xD5, 0xB5),
        SectorKey::Perikanan => Swatch::rgb(0xEF, 0xF6, 0xFF),
        SectorKey::Pertanian => Swatch::rgb(0xEC, 0xFD, 0xF5),
    }
}

// ============================================
// スライド → 図形
// ============================================

#[derive(Default)]
struct SlideBuilder<'a> {
    shapes: Vec<Shape<'a>>,
}

impl<'a> SlideBuilder<'a> {
    fn panel(&mut self, frame: Frame, fill: Swatch, line: Option<Swatch>) {
        self.shapes.push(Shape::Panel { frame, fill, line, rounded: true });
    }

    fn bar(&mut self, frame: Frame, fill: Swatch) {
        self.shapes.push(Shape::Panel { frame, fill, line: None, rounded: false });
    }

    fn text(&mut self, frame: Frame, size: f32, color: Swatch, weight: FontWeight, align: Align, text: &str) {
        self.shapes.push(Shape::Text {
            frame,
            size,
            color,
            weight,
            align,
            bullets: false,
            paragraphs: vec![text.to_string()],
        });
    }

    fn bullets(&mut self, frame: Frame, size: f32, items: Vec<String>) {
        self.shapes.push(Shape::Text {
            frame,
            size,
            color: BODY_TEXT,
            weight: FontWeight::Regular,
            align: Align::Left,
            bullets: true,
            paragraphs: items,
        });
    }

    fn picture(&mut self, frame: Frame, fit: ImageFit, image: &'a DataUri) {
        self.shapes.push(Shape::Picture { frame, fit, image });
    }
}

/// 全スライドを図形へ変換（表示順、1スライド1枚）
pub fn build_deck<'a>(doc: &'a PresentationDocument, assets: &'a AssetBundle) -> Vec<DeckSlide<'a>> {
    build_slides(doc, assets).into_iter().map(build_deck_slide).collect()
}

fn slide_title(slide: &SlideDescriptor<'_>) -> String {
    match slide.kind {
        SlideKind::Sector(key) => format!("SEKTOR {}: {}", key.ordinal(), key.display_name().to_uppercase()),
        _ => slide.heading.to_uppercase(),
    }
}

fn build_deck_slide(slide: SlideDescriptor<'_>) -> DeckSlide<'_> {
    let mut s = SlideBuilder::default();

    if slide.kind != SlideKind::Cover {
        s.text(Frame::new(0.5, 0.4, 9.0, 0.5), 28.0, PRIMARY, FontWeight::Bold, Align::Left, &slide_title(&slide));
        s.bar(Frame::new(0.5, 0.9, 2.0, 0.05), ACCENT);
    }

    match &slide.body {
        SlideBody::Cover { logo, subtitle, date } => {
            s.picture(Frame::new(3.9, 1.0, 2.2, 2.2), ImageFit::Contain, *logo);
            s.text(Frame::new(0.5, 3.5, 9.0, 0.7), 36.0, PRIMARY, FontWeight::Bold, Align::Center, slide.heading);
            s.text(Frame::new(0.5, 4.3, 9.0, 0.5), 22.0, ACCENT, FontWeight::Bold, Align::Center, subtitle);
            s.text(Frame::new(0.5, 5.0, 9.0, 0.4), 14.0, BODY_TEXT, FontWeight::Regular, Align::Center, date);
        }
        SlideBody::ExecutiveSummary { points, metric_value, metric_label } => {
            s.bullets(Frame::new(0.5, 1.3, 5.5, 4.0), 14.0, points.to_vec());
            s.panel(Frame::new(6.5, 1.5, 3.0, 2.5), PRIMARY, None);
            s.text(Frame::new(6.5, 2.0, 3.0, 0.8), 48.0, ACCENT, FontWeight::Bold, Align::Center, metric_value);
            s.text(Frame::new(6.5, 2.8, 3.0, 0.5), 14.0, WHITE, FontWeight::Bold, Align::Center, metric_label);
        }
        SlideBody::Management { members } => {
            for (i, member) in members.iter().enumerate() {
                let y = 1.5 + i as f32 * 1.8;
                s.panel(Frame::new(0.5, y, 9.0, 1.5), PANEL, None);
                if let Some(photo) = member.photo {
                    s.picture(Frame::new(0.8, y + 0.25, 1.0, 1.0), ImageFit::Cover, photo);
                }
                s.text(Frame::new(2.0, y + 0.4, 7.0, 0.4), 18.0, PRIMARY, FontWeight::Bold, Align::Left, member.name);
                s.text(Frame::new(2.0, y + 0.7, 7.0, 0.4), 12.0, BODY_TEXT, FontWeight::Regular, Align::Left, member.title);
            }
        }
        SlideBody::ProblemSolution { problem_title, problem_points, solution_title, pillars } => {
            s.panel(Frame::new(0.5, 1.3, 4.3, 3.8), PANEL, None);
            s.text(Frame::new(0.7, 1.5, 4.0, 0.4), 18.0, PRIMARY, FontWeight::Bold, Align::Left, problem_title);
            s.bullets(Frame::new(0.7, 2.0, 4.0, 3.0), 11.0, problem_points.to_vec());

            s.panel(Frame::new(5.2, 1.3, 4.3, 3.8), WHITE, Some(SECONDARY));
            s.text(Frame::new(5.4, 1.5, 4.0, 0.4), 18.0, PRIMARY, FontWeight::Bold, Align::Left, solution_title);
            let pillar_items = pillars
                .iter()
                .map(|p| format!("{}: {}", p.name, p.description))
                .collect();
            s.bullets(Frame::new(5.4, 2.0, 4.0, 3.0), 11.0, pillar_items);
        }
        SlideBody::Advantages { items } => {
            for (i, item) in items.iter().enumerate() {
                let x = 0.5 + (i % 3) as f32 * 3.1;
                let y = 1.3 + (i / 3) as f32 * 2.1;
                s.panel(Frame::new(x, y, 2.8, 1.8), WHITE, Some(ACCENT));
                s.text(Frame::new(x + 0.1, y + 0.5, 2.6, 0.8), 14.0, PRIMARY, FontWeight::Bold, Align::Center, item);
            }
        }
        SlideBody::Sector { value_chain, operations, photos } => {
            let band = match slide.kind {
                SlideKind::Sector(key) => sector_band(key),
                _ => PANEL,
            };
            s.panel(Frame::new(0.5, 1.3, 4.5, 0.6), band, None);
            s.text(
                Frame::new(0.7, 1.3, 4.1, 0.6),
                12.0,
                PRIMARY,
                FontWeight::Bold,
                Align::Center,
                &format!("Rantai Nilai: {}", value_chain),
            );
            s.bullets(Frame::new(0.5, 2.1, 4.5, 3.0), 12.0, operations.to_vec());
            for (i, photo) in photos.iter().enumerate() {
                s.picture(Frame::new(5.2, 1.3 + i as f32 * 2.0, 4.3, 1.8), ImageFit::Cover, photo.image);
            }
        }
        SlideBody::Roadmap { phases } => {
            for (i, phase) in phases.iter().enumerate() {
                let x = 0.5 + i as f32 * 3.1;
                s.panel(Frame::new(x, 1.3, 2.8, 4.0), PANEL, Some(PRIMARY));
                s.text(Frame::new(x + 0.1, 1.5, 2.6, 0.4), 16.0, PRIMARY, FontWeight::Bold, Align::Center, &phase.title);
                s.bullets(Frame::new(x + 0.1, 2.0, 2.6, 3.2), 10.0, phase.milestones.clone());
            }
        }
        SlideBody::Investment { boxes, closing, contacts } => {
            let colors = [PRIMARY, ACCENT, SECONDARY];
            for (i, b) in boxes.iter().enumerate() {
                let x = 0.5 + i as f32 * 3.1;
                s.panel(Frame::new(x, 1.3, 2.8, 2.5), WHITE, Some(colors[i]));
                s.text(Frame::new(x + 0.1, 1.5, 2.6, 0.3), 14.0, colors[i], FontWeight::Bold, Align::Center, b.title);
                s.bullets(Frame::new(x + 0.1, 1.9, 2.6, 1.8), 9.0, b.items.to_vec());
            }

            s.panel(Frame::new(0.5, 4.1, 9.0, 1.2), PRIMARY, None);
            s.text(
                Frame::new(0.7, 4.3, 8.6, 0.5),
                14.0,
                WHITE,
                FontWeight::Italic,
                Align::Center,
                &format!("\"{}\"", closing),
            );
            let [website, phone, _email] = contacts;
            s.text(
                Frame::new(0.7, 4.8, 8.6, 0.3),
                10.0,
                ACCENT,
                FontWeight::Regular,
                Align::Center,
                &format!("{} | {}", website, phone),
            );
        }
    }

    DeckSlide {
        kind: slide.kind,
        shapes: s.shapes,
    }
}

// ============================================
// 画像
// ============================================

/// パッケージに格納する画像
#[derive(Debug, Clone)]
struct Media {
    extension: &'static str,
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

/// PNG/JPEGはそのまま、その他のラスタ画像はPNGへ再エンコード
///
/// SVG・デコード不能な画像は `None`（プレースホルダーで描く）
fn prepare_media(image: &DataUri) -> Option<Media> {
    if image.is_svg() {
        log::warn!("SVG画像はPPTXに埋め込めないためプレースホルダーで代替します");
        return None;
    }
    let bytes = match image.decode() {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("画像のデコードに失敗: {}", e);
            return None;
        }
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::warn!("画像の読み込みに失敗 ({}): {}", image.mime_type(), e);
            return None;
        }
    };
    let (width, height) = (decoded.width(), decoded.height());

    match image.extension() {
        "png" | "jpeg" => Some(Media {
            extension: image.extension(),
            bytes,
            width,
            height,
        }),
        _ => {
            let mut png = Vec::new();
            if let Err(e) = decoded.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png) {
                log::warn!("PNGへの再エンコードに失敗: {}", e);
                return None;
            }
            Some(Media {
                extension: "png",
                bytes: png,
                width,
                height,
            })
        }
    }
}

/// 画像を枠に収める位置と切り抜きを計算
///
/// `Cover` は枠を埋めるよう中央で切り抜き、`Contain` は全体が収まるよう縮めて中央寄せ。
pub fn fit_picture(frame: Frame, fit: ImageFit, width: u32, height: u32) -> (Frame, Option<Crop>) {
    if width == 0 || height == 0 || frame.w <= 0.0 || frame.h <= 0.0 {
        return (frame, None);
    }
    let image_aspect = width as f32 / height as f32;
    let frame_aspect = frame.w / frame.h;

    match fit {
        ImageFit::Cover => {
            if (image_aspect - frame_aspect).abs() < 1e-3 {
                return (frame, None);
            }
            if image_aspect > frame_aspect {
                let side = ((1.0 - frame_aspect / image_aspect) / 2.0 * 100_000.0).round() as u32;
                (frame, Some(Crop { left: side, top: 0, right: side, bottom: 0 }))
            } else {
                let side = ((1.0 - image_aspect / frame_aspect) / 2.0 * 100_000.0).round() as u32;
                (frame, Some(Crop { left: 0, top: side, right: 0, bottom: side }))
            }
        }
        ImageFit::Contain => {
            if image_aspect > frame_aspect {
                let h = frame.w / image_aspect;
                (Frame::new(frame.x, frame.y + (frame.h - h) / 2.0, frame.w, h), None)
            } else {
                let w = frame.h * image_aspect;
                (Frame::new(frame.x + (frame.w - w) / 2.0, frame.y, w, frame.h), None)
            }
        }
    }
}

// ============================================
// パッケージ出力
// ============================================

/// デッキ全体をPPTXバイト列として生成
pub fn render_pptx(doc: &PresentationDocument, assets: &AssetBundle) -> Result<Vec<u8>> {
    render_deck(doc, assets).map_err(|e| {
        log::error!("PPTX生成に失敗: {}", e);
        e
    })
}

fn render_deck(doc: &PresentationDocument, assets: &AssetBundle) -> Result<Vec<u8>> {
    let deck = build_deck(doc, assets);
    if deck.is_empty() {
        return Err(DeckError::PptxGeneration("スライドがありません".to_string()));
    }

    // 同じ画像は1回だけ格納する
    let mut unique: Vec<&DataUri> = Vec::new();
    for image in deck.iter().flat_map(|slide| slide.images()) {
        if !unique.contains(&image) {
            unique.push(image);
        }
    }
    let prepared: Vec<Option<Media>> = unique.par_iter().map(|image| prepare_media(image)).collect();

    let mut media_names: Vec<Option<String>> = Vec::with_capacity(prepared.len());
    let mut media_parts: Vec<(String, Vec<u8>)> = Vec::new();
    for media in &prepared {
        match media {
            Some(media) => {
                let name = format!("image{}.{}", media_parts.len() + 1, media.extension);
                media_parts.push((name.clone(), media.bytes.clone()));
                media_names.push(Some(name));
            }
            None => media_names.push(None),
        }
    }

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".to_string(), xml::content_types(deck.len())?.into_bytes()),
        ("_rels/.rels".to_string(), xml::root_rels()?.into_bytes()),
        ("docProps/core.xml".to_string(), xml::core_props(&doc.meta.title).into_bytes()),
        ("docProps/app.xml".to_string(), xml::app_props(deck.len()).into_bytes()),
        ("ppt/presentation.xml".to_string(), xml::presentation(deck.len())?.into_bytes()),
        ("ppt/_rels/presentation.xml.rels".to_string(), xml::presentation_rels(deck.len())?.into_bytes()),
        ("ppt/slideMasters/slideMaster1.xml".to_string(), xml::slide_master().into_bytes()),
        ("ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(), xml::slide_master_rels()?.into_bytes()),
        ("ppt/slideLayouts/slideLayout1.xml".to_string(), xml::slide_layout().into_bytes()),
        ("ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(), xml::slide_layout_rels()?.into_bytes()),
        ("ppt/theme/theme1.xml".to_string(), xml::theme().into_bytes()),
    ];

    for (n, slide) in deck.iter().enumerate() {
        let mut targets: Vec<String> = Vec::new();
        let mut pictures: Vec<Option<PictureRef>> = Vec::new();

        for shape in &slide.shapes {
            let Shape::Picture { frame, fit, image } = shape else {
                continue;
            };
            let index = unique.iter().position(|u| u == image);
            let resolved = index.and_then(|i| Some((prepared[i].as_ref()?, media_names[i].as_ref()?)));
            pictures.push(resolved.map(|(media, name)| {
                let position = match targets.iter().position(|t| t == name) {
                    Some(position) => position,
                    None => {
                        targets.push(name.clone());
                        targets.len() - 1
                    }
                };
                let (frame, crop) = fit_picture(*frame, *fit, media.width, media.height);
                PictureRef {
                    rel_id: format!("rId{}", position + 2),
                    frame,
                    crop,
                }
            }));
        }

        parts.push((format!("ppt/slides/slide{}.xml", n + 1), xml::slide(slide, &pictures)?.into_bytes()));
        parts.push((format!("ppt/slides/_rels/slide{}.xml.rels", n + 1), xml::slide_rels(&targets)?.into_bytes()));
    }

    for (name, bytes) in media_parts {
        parts.push((format!("ppt/media/{}", name), bytes));
    }

    write_zip(parts)
}

fn write_zip(parts: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&bytes)?;
    }
    Ok(zip.finish()?.into_inner())
}

/// PPTXファイルを生成
pub fn generate_pptx(doc: &PresentationDocument, assets: &AssetBundle, output_path: &Path) -> Result<()> {
    let bytes = render_pptx(doc, assets)?;
    std::fs::write(output_path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksim_deck_common::Portfolio;
    use std::io::Read;

    fn png(width: u32, height: u32) -> DataUri {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([15, 23, 42]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("PNGエンコード失敗");
        DataUri::from_bytes("image/png", &bytes)
    }

    fn bundle(image: &DataUri) -> AssetBundle {
        AssetBundle {
            logo: image.clone(),
            management_photos: vec![image.clone(), image.clone()],
            portfolio: Portfolio::filled(image),
        }
    }

    #[test]
    fn test_fit_picture_cover_crops_wide_image() {
        let (frame, crop) = fit_picture(Frame::new(0.0, 0.0, 1.0, 1.0), ImageFit::Cover, 200, 100);
        assert_eq!(frame, Frame::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(crop, Some(Crop { left: 25_000, top: 0, right: 25_000, bottom: 0 }));
    }

    #[test]
    fn test_fit_picture_contain_centers() {
        let (frame, crop) = fit_picture(Frame::new(1.0, 1.0, 2.0, 2.0), ImageFit::Contain, 100, 200);
        assert!(crop.is_none());
        assert!((frame.w - 1.0).abs() < 1e-4);
        assert!((frame.x - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_deck_headers_and_sector_titles() {
        let doc = PresentationDocument::default();
        let image = png(4, 4);
        let assets = bundle(&image);
        let deck = build_deck(&doc, &assets);

        assert_eq!(deck.len(), SlideKind::ALL.len());
        assert!(deck[1].text_content().contains(&"EXECUTIVE SUMMARY".to_string()));
        assert!(deck[5].text_content().contains(&"SEKTOR 1: KELAPA SAWIT".to_string()));
        assert!(deck[7].text_content().contains(&"SEKTOR 3: PERTANIAN".to_string()));
    }

    #[test]
    fn test_prepare_media_rejects_svg_and_broken() {
        assert!(prepare_media(&DataUri::from_bytes("image/svg+xml", b"<svg/>")).is_none());
        assert!(prepare_media(&DataUri::from_bytes("image/png", b"not a png")).is_none());
        let media = prepare_media(&png(3, 2)).expect("PNGは埋め込めるはず");
        assert_eq!((media.width, media.height, media.extension), (3, 2, "png"));
    }

    #[test]
    fn test_render_pptx_package() {
        let mut doc = PresentationDocument::default();
        doc.closing = "Bersama membangun ekonomi umat".into();
        let image = png(8, 8);
        let assets = bundle(&image);

        let bytes = render_pptx(&doc, &assets).expect("PPTX生成失敗");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("ZIPとして読めない");
        assert!(archive.by_name("ppt/presentation.xml").is_ok());
        assert!(archive.by_name("ppt/media/image1.png").is_ok());
        // 同一画像は1つにまとまる
        assert!(archive.by_name("ppt/media/image2.png").is_err());

        let mut last = String::new();
        archive
            .by_name("ppt/slides/slide10.xml")
            .expect("最終スライドがない")
            .read_to_string(&mut last)
            .expect("読み込み失敗");
        assert!(last.contains("Bersama membangun ekonomi umat"));
    }
}
