pub mod layout;
pub mod pdf;
pub mod pptx;

use crate::cli::{ExportFormat, PdfQuality};
use crate::error::Result;
use ksim_deck_common::{AssetBundle, PresentationDocument};
use std::path::{Path, PathBuf};

/// 出力ファイルの既定名（拡張子なし）
pub const DEFAULT_FILE_STEM: &str = "KSIM_Strategic_Deck";

fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_FILE_STEM, extension))
    } else {
        output.to_path_buf()
    }
}

fn output_paths_for_both(output: &Path) -> (PathBuf, PathBuf) {
    if output.is_dir() || output.extension().is_none() {
        let pdf_path = output.join(format!("{}.pdf", DEFAULT_FILE_STEM));
        let pptx_path = output.join(format!("{}.pptx", DEFAULT_FILE_STEM));
        (pdf_path, pptx_path)
    } else {
        let parent = output.parent().unwrap_or_else(|| Path::new("."));
        let stem = output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_FILE_STEM);
        let pdf_path = parent.join(format!("{}.pdf", stem));
        let pptx_path = parent.join(format!("{}.pptx", stem));
        (pdf_path, pptx_path)
    }
}

/// デッキをファイルへ書き出し、出力したパスを返す
pub fn export_deck(
    doc: &PresentationDocument,
    assets: &AssetBundle,
    format: &ExportFormat,
    output: &Path,
    pdf_quality: PdfQuality,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    match format {
        ExportFormat::Pdf => {
            let output_path = output_path_for_format(output, "pdf");
            println!("- PDFを生成中... (品質: {})", pdf_quality);
            pdf::generate_pdf(doc, assets, &output_path, pdf_quality)?;
            println!("✔ PDF出力: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Pptx => {
            let output_path = output_path_for_format(output, "pptx");
            println!("- PPTXを生成中...");
            pptx::generate_pptx(doc, assets, &output_path)?;
            println!("✔ PPTX出力: {}", output_path.display());
            written.push(output_path);
        }
        ExportFormat::Both => {
            let (pdf_path, pptx_path) = output_paths_for_both(output);

            println!("- PDFを生成中... (品質: {})", pdf_quality);
            pdf::generate_pdf(doc, assets, &pdf_path, pdf_quality)?;
            println!("✔ PDF出力: {}", pdf_path.display());

            println!("- PPTXを生成中...");
            pptx::generate_pptx(doc, assets, &pptx_path)?;
            println!("✔ PPTX出力: {}", pptx_path.display());

            written.push(pdf_path);
            written.push(pptx_path);
        }
    }

    Ok(written)
}
