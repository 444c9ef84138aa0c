//! スナップショット読み込み
//!
//! 正規会場と展示レコードをJSONから読み込む。展示レコードは
//! 単一ファイルか、JSONファイルを含むフォルダ（直下のみ）を受け付ける。

use crate::error::{LinkageError, Result};
use sayu_linkage_common::{CanonicalVenue, RawExhibitionRecord};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const JSON_EXTENSIONS: &[&str] = &["json", "JSON"];

/// 正規会場を読み込む
pub fn load_venues(path: &Path) -> Result<Vec<CanonicalVenue>> {
    load_json_array(path)
}

/// 展示レコードを読み込む（ファイルまたはフォルダ）
pub fn load_records(path: &Path) -> Result<Vec<RawExhibitionRecord>> {
    if path.is_dir() {
        let mut records = Vec::new();
        for file in scan_json_files(path)? {
            let mut batch: Vec<RawExhibitionRecord> = load_json_array(&file)?;
            tracing::debug!(file = %file.display(), count = batch.len(), "loaded records");
            records.append(&mut batch);
        }
        Ok(records)
    } else {
        load_json_array(path)
    }
}

/// 修復用に展示レコードを読み込んだままのJSONで読む（ファイルのみ）
///
/// 書き戻し先が一意に決まらないので、フォルダは受け付けない。
pub fn load_raw_records(path: &Path) -> Result<Vec<serde_json::Value>> {
    if path.is_dir() {
        return Err(LinkageError::InvalidInput(format!(
            "{}: フォルダは修復できません（JSONファイルを指定してください）",
            path.display()
        )));
    }
    load_json_array(path)
}

/// フォルダ直下のJSONファイルをファイル名順に列挙
pub fn scan_json_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(LinkageError::FolderNotFound(folder.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| JSON_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();

    files.sort();

    Ok(files)
}

/// JSON配列を読み込む（配列以外はエラー）
fn load_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(LinkageError::FileNotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    if !value.is_array() {
        return Err(LinkageError::InvalidInput(format!(
            "{}: JSON配列ではありません",
            path.display()
        )));
    }

    Ok(serde_json::from_value(value)?)
}
