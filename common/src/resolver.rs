//! 照合結果の決定
//!
//! 候補列から1件の MatchDecision を決める。
//!
//! ## 優先順位
//! 1. 完全一致を部分一致より優先
//! 2. 完全一致が複数ある場合はスナップショット順で最初のもの
//! 3. 部分一致が複数ある場合は共有部分が最長のもの（同長なら最初）
//!
//! 数字のみのクエリは完全一致にしない。完全一致の候補は部分一致へ格下げするが、
//! 本来の部分一致候補よりは優先する。3文字未満の数字のみのクエリは一致なし。

use crate::matcher::{Candidate, MIN_PARTIAL_LEN};
use crate::normalize::{char_len, is_numeric_only};
use crate::types::{MatchDecision, MatchFlag, MatchType, RawExhibitionRecord};

/// 候補の順位（宣言順に弱い→強い）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Partial,
    /// 数字のみのクエリの完全一致
    DowngradedExact,
    Exact,
}

/// 候補列から判定を作る
///
/// 一致なしはエラーではなく `MatchType::None` の判定になる。
pub fn resolve<'a, I>(record: &RawExhibitionRecord, query: &str, candidates: I) -> MatchDecision
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    let numeric = is_numeric_only(query);
    let short = !query.is_empty() && char_len(query) < MIN_PARTIAL_LEN;
    let mut best: Option<(Tier, Candidate<'a>)> = None;

    for candidate in candidates {
        let tier = match candidate.match_type {
            MatchType::Exact if numeric => Tier::DowngradedExact,
            MatchType::Exact => Tier::Exact,
            _ => Tier::Partial,
        };

        if tier == Tier::Exact {
            best = Some((tier, candidate));
            break;
        }
        // 短いクエリは完全一致か一致なしのみ
        if short {
            continue;
        }

        let better = match &best {
            Some((current_tier, current)) => {
                (tier, candidate.shared_len) > (*current_tier, current.shared_len)
            }
            None => true,
        };
        if better {
            best = Some((tier, candidate));
        }
    }

    let mut decision = match best {
        Some((Tier::Exact, c)) => MatchDecision::exact(record.clone(), c.venue.venue().clone()),
        Some((_, c)) => MatchDecision::partial(record.clone(), c.venue.venue().clone()),
        None => MatchDecision::none(record.clone()),
    };

    if numeric {
        decision = decision.with_flag(MatchFlag::NumericOnlyQuery);
    }
    if short {
        decision = decision.with_flag(MatchFlag::ShortQuery);
    }

    decision
}
