//! PDF/PPTX出力の統合テスト

use ksim_deck::assets::offline_bundle;
use ksim_deck::cli::{ExportFormat, PdfQuality};
use ksim_deck::export::{self, layout, pdf, pptx};
use ksim_deck_common::preset::investor_preset;
use ksim_deck_common::{
    build_slides, AssetBundle, DataUri, Portfolio, PresentationDocument, SectorKey, SlideBody, SlideDescriptor, SlideKind,
};
use std::io::{Cursor, Read};
use tempfile::tempdir;

fn create_test_document() -> PresentationDocument {
    investor_preset("Oktober 2026")
}

fn create_test_image() -> DataUri {
    let img = image::RgbImage::from_fn(64, 36, |x, y| image::Rgb([(x * 4) as u8, (y * 7) as u8, 120]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("PNGエンコード失敗");
    DataUri::from_bytes("image/png", &bytes)
}

fn create_test_bundle(doc: &PresentationDocument) -> AssetBundle {
    let image = create_test_image();
    AssetBundle {
        logo: image.clone(),
        management_photos: vec![image.clone(); doc.meta.office.management_team.len()],
        portfolio: Portfolio::filled(&image),
    }
}

#[test]
fn test_pdf_generation_with_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("deck.pdf");
    let doc = create_test_document();
    let assets = create_test_bundle(&doc);

    let result = pdf::generate_pdf(&doc, &assets, &output_path, PdfQuality::Low);
    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());

    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
    assert_eq!(layout::layout_pages(&doc, &assets).len(), SlideKind::ALL.len());
}

#[test]
fn test_pdf_generation_with_placeholders() {
    let doc = create_test_document();
    let assets = offline_bundle(&doc);

    let bytes = pdf::render_pdf(&doc, &assets, PdfQuality::Medium).expect("PDF生成失敗");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_pptx_package_contents() {
    let doc = create_test_document();
    let assets = create_test_bundle(&doc);

    let bytes = pptx::render_pptx(&doc, &assets).expect("PPTX生成失敗");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("ZIPとして読めない");

    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/theme/theme1.xml",
    ] {
        assert!(archive.by_name(name).is_ok(), "{} がない", name);
    }

    let slide_parts = archive
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count();
    assert_eq!(slide_parts, 10);

    let mut last = String::new();
    archive
        .by_name("ppt/slides/slide10.xml")
        .expect("最終スライドがない")
        .read_to_string(&mut last)
        .expect("読み込み失敗");
    // XMLエスケープ済みの締めの言葉
    let closing = doc.closing.replace('&', "&amp;").replace('\'', "&apos;");
    assert!(last.contains(&closing), "締めの言葉がない");
}

#[test]
fn test_pptx_with_svg_placeholders() {
    let doc = create_test_document();
    let assets = offline_bundle(&doc);

    let bytes = pptx::render_pptx(&doc, &assets).expect("PPTX生成失敗");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("ZIPとして読めない");
    assert!(archive.file_names().all(|n| !n.starts_with("ppt/media/")));

    let mut cover = String::new();
    archive
        .by_name("ppt/slides/slide1.xml")
        .expect("表紙がない")
        .read_to_string(&mut cover)
        .expect("読み込み失敗");
    assert!(cover.contains("KSIM STRATEGIC DECK"));
}

#[test]
fn test_exporters_agree_on_content() {
    let doc = create_test_document();
    let assets = create_test_bundle(&doc);

    let pages = layout::layout_pages(&doc, &assets);
    let slides = pptx::build_deck(&doc, &assets);
    assert_eq!(pages.len(), slides.len());

    for (page, slide) in pages.iter().zip(&slides) {
        assert_eq!(page.kind, slide.kind);
    }

    let closing = format!("\"{}\"", doc.closing);
    let pdf_last = pages.last().expect("ページがない").text_content();
    let pptx_last = slides.last().expect("スライドがない").text_content();
    assert!(pdf_last.contains(&closing));
    assert!(pptx_last.contains(&closing));

    let pdf_sectors: Vec<SectorKey> = pages
        .iter()
        .filter_map(|p| match p.kind {
            SlideKind::Sector(key) => Some(key),
            _ => None,
        })
        .collect();
    let pptx_sectors: Vec<SectorKey> = slides
        .iter()
        .filter_map(|s| match s.kind {
            SlideKind::Sector(key) => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(pdf_sectors, SectorKey::ALL.to_vec());
    assert_eq!(pptx_sectors, SectorKey::ALL.to_vec());
}

/// スライドに載るべき文書由来のテキスト
fn document_texts(slide: &SlideDescriptor<'_>) -> Vec<String> {
    let mut texts = Vec::new();
    if !matches!(slide.kind, SlideKind::Sector(_)) {
        texts.push(slide.heading.to_string());
    }

    match &slide.body {
        SlideBody::Cover { subtitle, date, .. } => {
            texts.push(subtitle.to_string());
            texts.push(date.to_string());
        }
        SlideBody::ExecutiveSummary { points, metric_value, .. } => {
            texts.extend(points.iter().cloned());
            texts.push(metric_value.to_string());
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
            texts.push(value_chain.to_string());
            texts.extend(operations.iter().cloned());
        }
        SlideBody::Roadmap { phases } => {
            for phase in phases.iter() {
                texts.push(phase.title.clone());
                texts.extend(phase.milestones.iter().cloned());
            }
        }
        SlideBody::Investment { boxes, closing, contacts } => {
            for b in boxes.iter() {
                texts.extend(b.items.iter().cloned());
            }
            texts.push(format!("\"{}\"", closing));
            texts.push(contacts[0].to_string());
            texts.push(contacts[1].to_string());
        }
    }
    texts
}

/// 見出しの大文字化や接頭辞を許して含まれているか
fn surfaces(texts: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    texts.iter().any(|t| t.to_lowercase().contains(&needle))
}

#[test]
fn test_exporters_surface_same_text_per_slide() {
    let doc = create_test_document();
    let assets = create_test_bundle(&doc);

    let descriptors = build_slides(&doc, &assets);
    let pages = layout::layout_pages(&doc, &assets);
    let slides = pptx::build_deck(&doc, &assets);
    assert_eq!(descriptors.len(), pages.len());
    assert_eq!(descriptors.len(), slides.len());

    for ((descriptor, page), slide) in descriptors.iter().zip(&pages).zip(&slides) {
        let pdf_texts = page.text_content();
        let pptx_texts = slide.text_content();
        let expected = document_texts(descriptor);
        assert!(!expected.is_empty());

        for text in &expected {
            assert!(surfaces(&pdf_texts, text), "PDF {:?} に {:?} がない", descriptor.kind, text);
            assert!(surfaces(&pptx_texts, text), "PPTX {:?} に {:?} がない", descriptor.kind, text);
        }
    }
}

#[test]
fn test_export_both_writes_two_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let doc = create_test_document();
    let assets = offline_bundle(&doc);

    let written = export::export_deck(&doc, &assets, &ExportFormat::Both, dir.path(), PdfQuality::Low)
        .expect("エクスポート失敗");
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("KSIM_Strategic_Deck.pdf").exists());
    assert!(dir.path().join("KSIM_Strategic_Deck.pptx").exists());
}
