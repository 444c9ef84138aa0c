use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sayu-linkage")]
#[command(about = "展示会場名の名寄せ・リンケージレポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 展示レコードを正規会場に照合してレポートを出力
    Link {
        /// 正規会場JSONファイル
        #[arg(required = true)]
        venues: PathBuf,

        /// 展示レコードJSONファイル、またはJSONファイルを含むフォルダ
        #[arg(required = true)]
        records: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント/linkage-report.json）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/excel/both)
        #[arg(short, long, default_value = "json")]
        format: ReportFormat,

        /// 未一致会場名の上位件数（省略時は設定値）
        #[arg(long)]
        top: Option<usize>,

        /// エイリアスプリセット (korea/international/all)
        #[arg(long)]
        preset: Option<String>,

        /// カスタムエイリアスファイル（JSON）
        #[arg(long)]
        alias: Option<PathBuf>,

        /// 並列処理を無効化
        #[arg(long)]
        sequential: bool,

        /// 都市の整合性チェックを無効化
        #[arg(long)]
        no_city_check: bool,
    },

    /// 未一致会場名を対話的に確認し、エイリアスファイルを作成
    Review {
        /// linkコマンドのレポートJSON
        #[arg(required = true)]
        report: PathBuf,

        /// 正規会場JSONファイル
        #[arg(required = true)]
        venues: PathBuf,

        /// 出力エイリアスファイル（既存なら追記）
        #[arg(short, long, default_value = "venue-aliases.json")]
        output: PathBuf,
    },

    /// 展示レコードの画像URL・作家フィールドを修復
    Repair {
        /// 展示レコードJSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドライラン（変更を適用せずプレビュー）
        #[arg(long)]
        dry_run: bool,
    },

    /// 設定を表示/編集
    Config {
        /// データベースURLを設定
        #[arg(long)]
        set_database_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Json,
    Excel,
    Both,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "excel" | "xlsx" => Ok(ReportFormat::Excel),
            "both" => Ok(ReportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use json, excel, or both", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Excel => write!(f, "excel"),
            ReportFormat::Both => write!(f, "both"),
        }
    }
}
