//! バッチ内の展示重複検出
//!
//! 同じ展示が複数の取得元から入ってくるケースを照合結果から拾う。
//!
//! ## 判定
//! - 完全重複: 正規化したタイトル・会場・開始日がすべて同じ
//! - 類似: 会場と開始日が同じで、タイトルの類似度が閾値を超える
//!
//! 会場は照合できた場合は会場ID、できなかった場合は正規化した会場名で比べる。

use crate::normalize::normalize_name;
use crate::types::MatchDecision;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strsim::normalized_levenshtein;

/// 類似タイトルとみなす最低類似度
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.7;

/// 重複の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKind {
    Exact,
    Similar,
}

impl std::fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicateKind::Exact => write!(f, "完全重複"),
            DuplicateKind::Similar => write!(f, "類似"),
        }
    }
}

/// 重複グループ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub kind: DuplicateKind,
    /// 代表タイトル（最初に出現したレコードのもの）
    pub title: String,
    /// 会場キー（`id:<会場ID>` または `name:<正規化会場名>`）
    pub venue_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// バッチ内のレコード位置
    pub indices: Vec<usize>,
    /// タイトル類似度（%）。完全重複は100
    pub similarity: u8,
}

/// 比較キー
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ExhibitionKey {
    title: String,
    venue: String,
    start_date: String,
}

fn exhibition_key(decision: &MatchDecision) -> Option<ExhibitionKey> {
    let record = decision.record();
    let title = normalize_name(record.title.as_deref().unwrap_or(""));
    if title.is_empty() {
        return None;
    }

    let venue = match decision.matched_venue() {
        Some(venue) => format!("id:{}", venue.id),
        None => {
            let name = normalize_name(&record.venue_name_text);
            if name.is_empty() {
                return None;
            }
            format!("name:{}", name)
        }
    };

    Some(ExhibitionKey {
        title,
        venue,
        start_date: record.start_date.as_deref().unwrap_or("").trim().to_string(),
    })
}

/// 判定列から重複グループを検出する
///
/// 完全重複のグループを先に、出現順で返す。類似は完全重複の代表同士を組で比べる。
pub fn find_duplicates(decisions: &[MatchDecision]) -> Vec<DuplicateGroup> {
    // 出現順を保持
    let mut positions: HashMap<ExhibitionKey, usize> = HashMap::new();
    let mut buckets: Vec<(ExhibitionKey, Vec<usize>)> = Vec::new();

    for (index, decision) in decisions.iter().enumerate() {
        let Some(key) = exhibition_key(decision) else {
            continue;
        };
        match positions.get(&key) {
            Some(&i) => buckets[i].1.push(index),
            None => {
                positions.insert(key.clone(), buckets.len());
                buckets.push((key, vec![index]));
            }
        }
    }

    let title_of = |index: usize| {
        decisions[index]
            .record()
            .title
            .clone()
            .unwrap_or_default()
    };
    let start_date_of = |key: &ExhibitionKey| {
        (!key.start_date.is_empty()).then(|| key.start_date.clone())
    };

    let mut groups: Vec<DuplicateGroup> = buckets
        .iter()
        .filter(|(_, indices)| indices.len() > 1)
        .map(|(key, indices)| DuplicateGroup {
            kind: DuplicateKind::Exact,
            title: title_of(indices[0]),
            venue_key: key.venue.clone(),
            start_date: start_date_of(key),
            indices: indices.clone(),
            similarity: 100,
        })
        .collect();

    for (i, (a, a_indices)) in buckets.iter().enumerate() {
        for (b, b_indices) in &buckets[i + 1..] {
            if a.venue != b.venue || a.start_date != b.start_date {
                continue;
            }
            let score = normalized_levenshtein(&a.title, &b.title);
            if score <= TITLE_SIMILARITY_THRESHOLD {
                continue;
            }

            let mut indices = a_indices.clone();
            indices.extend(b_indices);
            indices.sort_unstable();

            groups.push(DuplicateGroup {
                kind: DuplicateKind::Similar,
                title: title_of(a_indices[0]),
                venue_key: a.venue.clone(),
                start_date: start_date_of(a),
                indices,
                similarity: (score * 100.0).round() as u8,
            });
        }
    }

    if !groups.is_empty() {
        tracing::debug!(groups = groups.len(), "duplicate exhibitions found");
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CanonicalVenue, RawExhibitionRecord};

    fn record(title: &str, venue: &str, start: Option<&str>) -> RawExhibitionRecord {
        RawExhibitionRecord {
            venue_name_text: venue.to_string(),
            title: Some(title.to_string()),
            start_date: start.map(str::to_string),
            ..Default::default()
        }
    }

    fn linked(record: RawExhibitionRecord, venue_id: &str) -> MatchDecision {
        MatchDecision::exact(
            record,
            CanonicalVenue {
                id: venue_id.to_string(),
                name: venue_id.to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_exact_duplicate_across_venue_spellings() {
        // 表記が違っても同じ会場に照合されれば同一展示
        let decisions = vec![
            linked(record("Kim Whanki Retrospective", "국제갤러리", Some("2024-03-01")), "kukje"),
            linked(record("kim whanki retrospective (K1)", "Kukje Gallery", Some("2024-03-01")), "kukje"),
            linked(record("Kim Whanki Retrospective", "국제갤러리", Some("2024-09-01")), "kukje"),
        ];

        let groups = find_duplicates(&decisions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, DuplicateKind::Exact);
        assert_eq!(groups[0].indices, vec![0, 1]);
        assert_eq!(groups[0].venue_key, "id:kukje");
        assert_eq!(groups[0].similarity, 100);
    }

    #[test]
    fn test_unmatched_records_compare_by_venue_name() {
        let decisions = vec![
            MatchDecision::none(record("Pop-up Show", "Unknown Space", None)),
            MatchDecision::none(record("Pop-up Show", "  unknown   space ", None)),
            MatchDecision::none(record("Pop-up Show", "Other Space", None)),
        ];

        let groups = find_duplicates(&decisions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].venue_key, "name:unknown space");
        assert_eq!(groups[0].indices, vec![0, 1]);
        assert!(groups[0].start_date.is_none());
    }

    #[test]
    fn test_similar_titles_same_venue_and_date() {
        let decisions = vec![
            linked(record("Lee Ufan: Dialogue", "리움", Some("2024-05-01")), "leeum"),
            linked(record("Lee Ufan - Dialogues", "Leeum", Some("2024-05-01")), "leeum"),
            linked(record("Lee Ufan: Dialogue", "Tate", Some("2024-05-01")), "tate"),
            linked(record("Completely Different", "Leeum", Some("2024-05-01")), "leeum"),
        ];

        let groups = find_duplicates(&decisions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, DuplicateKind::Similar);
        assert_eq!(groups[0].indices, vec![0, 1]);
        assert!(groups[0].similarity > 70 && groups[0].similarity < 100);
    }

    #[test]
    fn test_untitled_records_are_ignored() {
        let decisions = vec![
            MatchDecision::none(RawExhibitionRecord::with_venue_name("Space K")),
            MatchDecision::none(RawExhibitionRecord::with_venue_name("Space K")),
        ];
        assert!(find_duplicates(&decisions).is_empty());
    }
}
