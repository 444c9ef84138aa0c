use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkageError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("入力ファイルが不正: {0}")]
    InvalidInput(String),

    #[error("展示レコードが見つかりません: {0}")]
    NoRecordsFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error(transparent)]
    Common(#[from] sayu_linkage_common::Error),
}

pub type Result<T> = std::result::Result<T, LinkageError>;
