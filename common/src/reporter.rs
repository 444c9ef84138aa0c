//! リンケージ集計
//!
//! 判定結果を件数に集計し、頻出の未一致会場名と重複展示を人手確認用に抽出する。

use crate::dedup::{find_duplicates, DuplicateGroup};
use crate::types::{MatchDecision, MatchType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 未一致会場名とその出現数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedName {
    pub name: String,
    pub count: usize,
}

/// バッチの集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkageSummary {
    pub total: usize,
    pub exact_count: usize,
    pub partial_count: usize,
    pub none_count: usize,
    /// フラグ付き判定の数（数字のみ・都市不一致など）
    #[serde(default)]
    pub flagged_count: usize,
    pub top_unmatched_names: Vec<UnmatchedName>,
    /// バッチ内の重複展示
    #[serde(default)]
    pub duplicate_groups: Vec<DuplicateGroup>,
}

impl LinkageSummary {
    /// 一致率（完全+部分）
    pub fn match_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.exact_count + self.partial_count) as f64 / self.total as f64
    }
}

/// 判定列を集計する
///
/// `top_unmatched_names` は未一致の `venue_name_text` を出現数の降順に最大 `top_n` 件。
/// 同数の場合は最初に出現した順。
pub fn summarize(decisions: &[MatchDecision], top_n: usize) -> LinkageSummary {
    let mut summary = LinkageSummary {
        total: decisions.len(),
        ..Default::default()
    };

    // 出現順を保持するため、名前→位置のマップとVecを併用
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut unmatched: Vec<(&str, usize)> = Vec::new();

    for decision in decisions {
        match decision.match_type() {
            MatchType::Exact => summary.exact_count += 1,
            MatchType::Partial => summary.partial_count += 1,
            MatchType::None => {
                summary.none_count += 1;
                let name = decision.record().venue_name_text.as_str();
                match positions.get(name) {
                    Some(&i) => unmatched[i].1 += 1,
                    None => {
                        positions.insert(name, unmatched.len());
                        unmatched.push((name, 1));
                    }
                }
            }
        }
        if !decision.flags().is_empty() {
            summary.flagged_count += 1;
        }
    }

    // 安定ソートなので同数は出現順のまま
    unmatched.sort_by(|a, b| b.1.cmp(&a.1));

    summary.top_unmatched_names = unmatched
        .into_iter()
        .take(top_n)
        .map(|(name, count)| UnmatchedName {
            name: name.to_string(),
            count,
        })
        .collect();

    summary.duplicate_groups = find_duplicates(decisions);

    summary
}
