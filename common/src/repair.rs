//! レコード修復モジュール
//!
//! 取り込みスクリプトで繰り返し発生した不整合を冪等な変換でまとめて直す。
//!
//! - 画像URLのフォルダ重複（`/sayu/artvee/sayu/artvee/x.jpg` → `/sayu/artvee/x.jpg`）
//! - 作家フィールドの形の揺れ（文字列・配列・`{name}` 配列）→ 重複なしの文字列配列
//!
//! 修復は読み込んだままのJSONに対して行う。型付きレコードへの変換で
//! 作家フィールドが先に整形されると、修正内容を報告できないため。
//! 未知のフィールドもそのまま残る。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 重複とみなすセグメント列の最小長
///
/// 1セグメントの繰り返し（`/2024/01/01/`）は正当なパスにもあるので対象外。
const MIN_REPEAT_RUN: usize = 2;

const IMAGE_URL_KEYS: &[&str] = &["imageUrl", "image_url"];
const ARTISTS_KEY: &str = "artists";

/// 修正対象フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairField {
    ImageUrl,
    Artists,
}

impl std::fmt::Display for RepairField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairField::ImageUrl => write!(f, "画像URL"),
            RepairField::Artists => write!(f, "作家"),
        }
    }
}

/// 個別の修正内容
#[derive(Debug, Clone)]
pub struct RepairCorrection {
    /// レコードの位置
    pub index: usize,
    pub field: RepairField,
    pub original: String,
    pub corrected: String,
}

/// URLパス中で直後に繰り返されるセグメント列（2セグメント以上）を1つにまとめる
///
/// スキーム・ホスト・クエリ・フラグメントはそのまま残す。
pub fn collapse_repeated_segments(url: &str) -> String {
    let path_start = match url.find("://") {
        Some(scheme_end) => url[scheme_end + 3..]
            .find('/')
            .map(|i| scheme_end + 3 + i)
            .unwrap_or(url.len()),
        None => 0,
    };
    let path_end = url[path_start..]
        .find(['?', '#'])
        .map(|i| path_start + i)
        .unwrap_or(url.len());

    let (prefix, rest) = url.split_at(path_start);
    let (path, suffix) = rest.split_at(path_end - path_start);

    let mut segments: Vec<&str> = path.split('/').collect();
    while remove_first_repeat(&mut segments) {}

    format!("{}{}{}", prefix, segments.join("/"), suffix)
}

/// 最初に見つかった繰り返しを1つ削除（削除したらtrue）
fn remove_first_repeat(segments: &mut Vec<&str>) -> bool {
    for run in MIN_REPEAT_RUN..=segments.len() / 2 {
        for start in 0..=segments.len() - 2 * run {
            let first = &segments[start..start + run];
            let second = &segments[start + run..start + 2 * run];
            if first == second && first.iter().all(|s| !s.is_empty()) {
                segments.drain(start + run..start + 2 * run);
                return true;
            }
        }
    }
    false
}

/// 作家フィールドを名前のリストに揃える
pub fn coerce_artists(value: &Value) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    let mut push = |name: &str| {
        let name = name.trim();
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    };

    match value {
        Value::String(s) => {
            for part in s.split([',', ';', '、', '/']) {
                push(part);
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => push(s),
                    Value::Object(obj) => {
                        if let Some(Value::String(s)) = obj.get("name") {
                            push(s);
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Object(obj) => {
            if let Some(Value::String(s)) = obj.get("name") {
                push(s);
            }
        }
        _ => {}
    }

    names
}

/// serde用: 作家フィールドをどの形でも受け付ける
pub fn deserialize_artists<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_artists(&value))
}

/// 修正前の値の表示（文字列はそのまま、それ以外はJSON）
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 読み込んだままのレコード群を修復し、修正内容を返す
///
/// オブジェクト以外の要素と、`null` の作家フィールドは対象外。
pub fn repair_records(records: &mut [Value]) -> Vec<RepairCorrection> {
    let mut corrections = Vec::new();

    for (index, record) in records.iter_mut().enumerate() {
        let Some(obj) = record.as_object_mut() else {
            continue;
        };

        for key in IMAGE_URL_KEYS {
            if let Some(Value::String(url)) = obj.get_mut(*key) {
                let fixed = collapse_repeated_segments(url);
                if fixed != *url {
                    corrections.push(RepairCorrection {
                        index,
                        field: RepairField::ImageUrl,
                        original: url.clone(),
                        corrected: fixed.clone(),
                    });
                    *url = fixed;
                }
            }
        }

        if let Some(artists) = obj.get_mut(ARTISTS_KEY) {
            if artists.is_null() {
                continue;
            }
            let names = coerce_artists(artists);
            let fixed = Value::from(names.clone());
            if fixed != *artists {
                corrections.push(RepairCorrection {
                    index,
                    field: RepairField::Artists,
                    original: display_value(artists),
                    corrected: names.join(", "),
                });
                *artists = fixed;
            }
        }
    }

    corrections
}
