//! 類似会場の提案
//!
//! 一致しなかった会場名に対し、編集距離ベースの類似度で候補を並べる。
//! 人手確認（review）で使う。自動リンクには使わない。

use crate::matcher::{IndexedVenue, VenueIndex};
use strsim::normalized_levenshtein;

/// 提案に含める最低類似度
pub const SUGGESTION_THRESHOLD: f64 = 0.3;

/// 類似会場
#[derive(Debug, Clone)]
pub struct Suggestion<'a> {
    pub venue: &'a IndexedVenue,
    pub score: f64,
}

/// 正規化済みクエリに近い会場を類似度順に最大 `limit` 件返す
pub fn suggest<'a>(index: &'a VenueIndex, query_key: &str, limit: usize) -> Vec<Suggestion<'a>> {
    if query_key.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<Suggestion<'a>> = index
        .entries()
        .iter()
        .filter_map(|venue| {
            let score = venue
                .keys()
                .map(|key| normalized_levenshtein(query_key, key))
                .fold(0.0_f64, f64::max);
            (score > SUGGESTION_THRESHOLD).then_some(Suggestion { venue, score })
        })
        .collect();

    // 同スコアはスナップショット順
    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CanonicalVenue;

    fn index() -> VenueIndex {
        let venues = vec![
            ("v1", "국제갤러리", "Kukje Gallery"),
            ("v2", "갤러리현대", "Gallery Hyundai"),
            ("v3", "Tate Modern", ""),
        ]
        .into_iter()
        .map(|(id, name, en)| CanonicalVenue {
            id: id.to_string(),
            name: name.to_string(),
            name_english: en.to_string(),
            ..Default::default()
        })
        .collect();
        VenueIndex::build(venues).unwrap()
    }

    #[test]
    fn test_suggest_typo() {
        let idx = index();
        let found = suggest(&idx, "kukje galery", 3);
        assert!(!found.is_empty());
        assert_eq!(found[0].venue.venue().id, "v1");
        assert!(found[0].score > 0.8);
    }

    #[test]
    fn test_suggest_respects_limit_and_threshold() {
        let idx = index();
        assert!(suggest(&idx, "gallery", 1).len() <= 1);
        assert!(suggest(&idx, "zzzzzzzzzzzzzzzz", 5).is_empty());
        assert!(suggest(&idx, "", 5).is_empty());
    }
}
