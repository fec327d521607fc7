use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ksim-deck")]
#[command(about = "KSIM 投資家向けプレゼンテーション生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// デッキをWebで配信（API + 静的ファイル）
    Serve {
        /// 待ち受けアドレス（省略時は設定値）
        #[arg(long)]
        bind: Option<String>,

        /// ポート番号（省略時は設定値）
        #[arg(short, long)]
        port: Option<u16>,

        /// 静的ファイルのディレクトリ（省略時は設定値）
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// デッキをPDF/PPTXに出力
    Export {
        /// 出力形式 (pdf/pptx/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ポートフォリオ画像をAIで生成してから出力
        #[arg(long)]
        ai_visuals: bool,

        /// 画像を取得せずプレースホルダーで出力
        #[arg(long)]
        offline: bool,

        /// PDF画像品質 (high/medium/low)
        #[arg(long, default_value = "medium")]
        pdf_quality: PdfQuality,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Pptx,
    #[default]
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "pptx" | "powerpoint" => Ok(ExportFormat::Pptx),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, pptx, or both", s)),
        }
    }
}

/// PDF画像品質設定
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PdfQuality {
    /// 高品質: 1400px, 85%
    High,
    /// 中品質: 800px, 75%（デフォルト）
    #[default]
    Medium,
    /// 低品質: 500px, 60%
    Low,
}

impl PdfQuality {
    /// 最大ピクセル幅
    pub fn max_width(&self) -> u32 {
        match self {
            PdfQuality::High => 1400,
            PdfQuality::Medium => 800,
            PdfQuality::Low => 500,
        }
    }

    /// JPEG品質 (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PdfQuality::High => 85,
            PdfQuality::Medium => 75,
            PdfQuality::Low => 60,
        }
    }
}

impl std::str::FromStr for PdfQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(PdfQuality::High),
            "medium" | "med" | "m" => Ok(PdfQuality::Medium),
            "low" | "l" => Ok(PdfQuality::Low),
            _ => Err(format!("Unknown quality: {}. Use high, medium, or low", s)),
        }
    }
}

impl std::fmt::Display for PdfQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PdfQuality::High => write!(f, "high"),
            PdfQuality::Medium => write!(f, "medium"),
            PdfQuality::Low => write!(f, "low"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert_eq!("PPTX".parse::<ExportFormat>(), Ok(ExportFormat::Pptx));
        assert_eq!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both));
        assert!("excel".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_command_defaults() {
        let cli = Cli::try_parse_from(["ksim-deck", "export"]).expect("引数解析失敗");
        match cli.command {
            Commands::Export { format, output, ai_visuals, offline, pdf_quality } => {
                assert_eq!(format, ExportFormat::Both);
                assert!(output.is_none());
                assert!(!ai_visuals);
                assert!(!offline);
                assert_eq!(pdf_quality, PdfQuality::Medium);
            }
            _ => panic!("exportコマンドとして解析されていない"),
        }
    }
}
