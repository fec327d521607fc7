//! PresentationML パーツの書き出し

use super::{Crop, DeckSlide, Frame, Shape};
use crate::error::{DeckError, Result};
use crate::export::layout::{Align, FontWeight, Swatch, PLACEHOLDER_GOLD, PLACEHOLDER_LABEL, PLACEHOLDER_NAVY};
use std::fmt::Write as FmtWrite;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str = "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// 1インチ = 914400 EMU
pub const EMU_PER_INCH: f32 = 914_400.0;

/// 16:9 スライドサイズ（EMU）
pub const SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub const SLIDE_HEIGHT_EMU: i64 = 5_143_500;

/// 箇条書きのインデント（EMU）
const BULLET_INDENT_EMU: i64 = 228_600;

const FONT_FACE: &str = "Arial";

/// XML特殊文字をエスケープ
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub fn emu(inches: f32) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

fn xml_err(e: std::fmt::Error) -> DeckError {
    DeckError::PptxGeneration(e.to_string())
}

/// スライドに埋め込む画像への参照
#[derive(Debug, Clone, PartialEq)]
pub struct PictureRef {
    pub rel_id: String,
    pub frame: Frame,
    pub crop: Option<Crop>,
}

// ============================================
// パッケージ構造
// ============================================

pub fn content_types(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#);
    xml.push_str(r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#);
    for n in 1..=slide_count {
        write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
            n
        )
        .map_err(xml_err)?;
    }
    xml.push_str(r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#);
    xml.push_str(r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#);
    xml.push_str("</Types>");
    Ok(xml)
}

/// (Id, Type, Target) の組からリレーションシップパーツを作る
pub fn relationships(rels: &[(String, &str, String)]) -> Result<String> {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    write!(xml, r#"<Relationships xmlns="{}">"#, NS_REL).map_err(xml_err)?;
    for (id, rel_type, target) in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id,
            rel_type,
            escape_xml(target)
        )
        .map_err(xml_err)?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

pub fn root_rels() -> Result<String> {
    relationships(&[
        ("rId1".to_string(), REL_OFFICE_DOCUMENT, "ppt/presentation.xml".to_string()),
        ("rId2".to_string(), REL_CORE, "docProps/core.xml".to_string()),
        ("rId3".to_string(), REL_APP, "docProps/app.xml".to_string()),
    ])
}

pub fn core_props(title: &str) -> String {
    format!(
        r#"{}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>Koperasi Syarikat Islam Mandiri</dc:creator></cp:coreProperties>"#,
        XML_DECL,
        escape_xml(title)
    )
}

pub fn app_props(slide_count: usize) -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>ksim-deck</Application><Slides>{}</Slides></Properties>"#,
        XML_DECL, slide_count
    )
}

/// presentation.xml（rId1 = マスター、rId2.. = スライド）
pub fn presentation(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    )
    .map_err(xml_err)?;
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    xml.push_str("<p:sldIdLst>");
    for i in 0..slide_count {
        write!(xml, r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, i + 2).map_err(xml_err)?;
    }
    xml.push_str("</p:sldIdLst>");
    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/>"#,
        SLIDE_WIDTH_EMU, SLIDE_HEIGHT_EMU
    )
    .map_err(xml_err)?;
    xml.push_str("</p:presentation>");
    Ok(xml)
}

pub fn presentation_rels(slide_count: usize) -> Result<String> {
    let mut rels = vec![("rId1".to_string(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".to_string())];
    for n in 1..=slide_count {
        rels.push((format!("rId{}", n + 1), REL_SLIDE, format!("slides/slide{}.xml", n)));
    }
    rels.push((format!("rId{}", slide_count + 2), REL_THEME, "theme/theme1.xml".to_string()));
    relationships(&rels)
}

fn group_header() -> &'static str {
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
}

pub fn slide_master() -> String {
    format!(
        r#"{}<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        group_header()
    )
}

pub fn slide_master_rels() -> Result<String> {
    relationships(&[
        ("rId1".to_string(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string()),
        ("rId2".to_string(), REL_THEME, "../theme/theme1.xml".to_string()),
    ])
}

pub fn slide_layout() -> String {
    format!(
        r#"{}<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        group_header()
    )
}

pub fn slide_layout_rels() -> Result<String> {
    relationships(&[(
        "rId1".to_string(),
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml".to_string(),
    )])
}

/// デッキの配色とフォント
pub fn theme() -> String {
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "0F172A"),
        ("lt2", "F1F5F9"),
        ("accent1", "0F172A"),
        ("accent2", "C5A059"),
        ("accent3", "334155"),
        ("accent4", "3B82F6"),
        ("accent5", "10B981"),
        ("accent6", "94A3B8"),
        ("hlink", "3B82F6"),
        ("folHlink", "334155"),
    ];
    let clr_scheme: String = colors
        .iter()
        .map(|(name, hex)| format!(r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, hex))
        .collect();
    let font = format!(r#"<a:latin typeface="{}"/><a:ea typeface=""/><a:cs typeface=""/>"#, FONT_FACE);
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = format!(r#"<a:ln w="6350">{}</a:ln>"#, solid);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        r#"{decl}<a:theme xmlns:a="{ns}" name="KSIM"><a:themeElements><a:clrScheme name="KSIM">{clr}</a:clrScheme><a:fontScheme name="KSIM"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme><a:fmtScheme name="KSIM"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"#,
        decl = XML_DECL,
        ns = NS_A,
        clr = clr_scheme,
        font = font,
        fills = solid.repeat(3),
        lines = line.repeat(3),
        effects = effect.repeat(3),
    )
}

/// スライドのリレーションシップ（rId1 = レイアウト、以降は画像）
pub fn slide_rels(media_targets: &[String]) -> Result<String> {
    let mut rels = vec![("rId1".to_string(), REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml".to_string())];
    for (i, target) in media_targets.iter().enumerate() {
        rels.push((format!("rId{}", i + 2), REL_IMAGE, format!("../media/{}", target)));
    }
    relationships(&rels)
}

// ============================================
// スライド本体
// ============================================

/// スライドXML
///
/// `pictures` は `Shape::Picture` の出現順に対応する。`None` の画像は
/// 紺地に金文字のプレースホルダーとして描く。
pub fn slide(slide: &DeckSlide<'_>, pictures: &[Option<PictureRef>]) -> Result<String> {
    let mut xml = String::with_capacity(8192);
    xml.push_str(XML_DECL);
    write!(xml, r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#, NS_A, NS_R, NS_P).map_err(xml_err)?;
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(group_header());

    let mut next_id: u32 = 2;
    let mut pictures = pictures.iter();

    for shape in &slide.shapes {
        match shape {
            Shape::Panel { frame, fill, line, rounded } => {
                write_panel(&mut xml, next_id, frame, *fill, *line, *rounded)?;
                next_id += 1;
            }
            Shape::Text { frame, size, color, weight, align, bullets, paragraphs } => {
                let style = RunStyle { size: *size, color: *color, weight: *weight };
                write_text(&mut xml, next_id, frame, &style, *align, *bullets, paragraphs)?;
                next_id += 1;
            }
            Shape::Picture { frame, .. } => match pictures.next().and_then(|p| p.as_ref()) {
                Some(picture) => {
                    write_picture(&mut xml, next_id, picture)?;
                    next_id += 1;
                }
                None => {
                    write_panel(&mut xml, next_id, frame, PLACEHOLDER_NAVY, None, false)?;
                    let style = RunStyle {
                        size: 14.0,
                        color: PLACEHOLDER_GOLD,
                        weight: FontWeight::Bold,
                    };
                    let label = [PLACEHOLDER_LABEL.to_string()];
                    write_text(&mut xml, next_id + 1, frame, &style, Align::Center, false, &label)?;
                    next_id += 2;
                }
            },
        }
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        emu(frame.x),
        emu(frame.y),
        emu(frame.w),
        emu(frame.h)
    )
    .map_err(xml_err)
}

fn solid_fill(color: Swatch) -> String {
    format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.hex())
}

fn write_panel(xml: &mut String, id: u32, frame: &Frame, fill: Swatch, line: Option<Swatch>, rounded: bool) -> Result<()> {
    let geometry = if rounded { "roundRect" } else { "rect" };
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Shape {}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        id, id
    )
    .map_err(xml_err)?;
    write_xfrm(xml, frame)?;
    write!(xml, r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#, geometry).map_err(xml_err)?;
    xml.push_str(&solid_fill(fill));
    match line {
        Some(color) => write!(xml, r#"<a:ln w="12700">{}</a:ln>"#, solid_fill(color)).map_err(xml_err)?,
        None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
    }
    xml.push_str("</p:spPr></p:sp>");
    Ok(())
}

struct RunStyle {
    size: f32,
    color: Swatch,
    weight: FontWeight,
}

fn write_text(
    xml: &mut String,
    id: u32,
    frame: &Frame,
    style: &RunStyle,
    align: Align,
    bullets: bool,
    paragraphs: &[String],
) -> Result<()> {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Text Box {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        id, id
    )
    .map_err(xml_err)?;
    write_xfrm(xml, frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
    let anchor = if bullets { "t" } else { "ctr" };
    write!(
        xml,
        r#"<p:txBody><a:bodyPr wrap="square" lIns="45720" tIns="45720" rIns="45720" bIns="45720" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
        anchor
    )
    .map_err(xml_err)?;

    let algn = match align {
        Align::Left => "l",
        Align::Center => "ctr",
    };
    let (bold, italic) = match style.weight {
        FontWeight::Regular => (false, false),
        FontWeight::Bold => (true, false),
        FontWeight::Italic => (false, true),
    };

    // 段落が空でも txBody には <a:p> が1つ必要
    if paragraphs.is_empty() {
        xml.push_str("<a:p/>");
    }
    for paragraph in paragraphs {
        if bullets {
            write!(
                xml,
                r#"<a:p><a:pPr marL="{}" indent="-{}" algn="{}"><a:buFont typeface="{}"/><a:buChar char="•"/></a:pPr>"#,
                BULLET_INDENT_EMU, BULLET_INDENT_EMU, algn, FONT_FACE
            )
            .map_err(xml_err)?;
        } else {
            write!(xml, r#"<a:p><a:pPr algn="{}"><a:buNone/></a:pPr>"#, algn).map_err(xml_err)?;
        }
        write!(xml, r#"<a:r><a:rPr lang="id-ID" sz="{}""#, (style.size * 100.0).round() as u32).map_err(xml_err)?;
        if bold {
            xml.push_str(r#" b="1""#);
        }
        if italic {
            xml.push_str(r#" i="1""#);
        }
        write!(
            xml,
            r#" dirty="0">{}<a:latin typeface="{}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            solid_fill(style.color),
            FONT_FACE,
            escape_xml(paragraph)
        )
        .map_err(xml_err)?;
    }

    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}

fn write_picture(xml: &mut String, id: u32, picture: &PictureRef) -> Result<()> {
    write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{}" name="Picture {}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{}"/>"#,
        id, id, picture.rel_id
    )
    .map_err(xml_err)?;
    if let Some(crop) = &picture.crop {
        write!(
            xml,
            r#"<a:srcRect l="{}" t="{}" r="{}" b="{}"/>"#,
            crop.left, crop.top, crop.right, crop.bottom
        )
        .map_err(xml_err)?;
    }
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>");
    write_xfrm(xml, &picture.frame)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksim_deck_common::SlideKind;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("R&D <Sawit> \"KSIM\""), "R&amp;D &lt;Sawit&gt; &quot;KSIM&quot;");
    }

    #[test]
    fn test_emu_conversion() {
        assert_eq!(emu(1.0), 914_400);
        assert_eq!(emu(10.0), SLIDE_WIDTH_EMU);
        assert_eq!(emu(5.625), SLIDE_HEIGHT_EMU);
    }

    #[test]
    fn test_presentation_lists_every_slide() {
        let xml = presentation(3).expect("XML生成失敗");
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId4"/>"#));
        let rels = presentation_rels(3).expect("XML生成失敗");
        assert!(rels.contains(r#"Id="rId5""#));
        assert!(rels.contains("theme/theme1.xml"));
    }

    #[test]
    fn test_missing_picture_becomes_placeholder() {
        let image = ksim_deck_common::DataUri::from_bytes("image/svg+xml", b"<svg/>");
        let deck = DeckSlide {
            kind: SlideKind::Cover,
            shapes: vec![Shape::Picture {
                frame: Frame::new(1.0, 1.0, 2.0, 1.0),
                fit: crate::export::layout::ImageFit::Cover,
                image: &image,
            }],
        };
        let xml = slide(&deck, &[None]).expect("XML生成失敗");
        assert!(xml.contains("0A2647"));
        assert!(xml.contains(PLACEHOLDER_LABEL));
        assert!(!xml.contains("<p:pic>"));
    }

    #[test]
    fn test_text_runs_are_escaped_and_sized() {
        let deck = DeckSlide {
            kind: SlideKind::Advantages,
            shapes: vec![Shape::Text {
                frame: Frame::new(0.5, 0.4, 9.0, 0.5),
                size: 28.0,
                color: Swatch::rgb(0x0F, 0x17, 0x2A),
                weight: FontWeight::Bold,
                align: Align::Left,
                bullets: false,
                paragraphs: vec!["PROBLEM & SOLUTION".to_string()],
            }],
        };
        let xml = slide(&deck, &[]).expect("XML生成失敗");
        assert!(xml.contains(r#"sz="2800" b="1""#));
        assert!(xml.contains("<a:t>PROBLEM &amp; SOLUTION</a:t>"));
    }
}
