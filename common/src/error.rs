//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 会場コレクション自体が不正（呼び出し側の契約違反）
    #[error("Malformed venue collection: {0}")]
    MalformedCollection(String),

    /// 判定結果の不変条件違反（デシリアライズ時）
    #[error("Invalid match decision: {0}")]
    InvalidDecision(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
