//! 会場リンケージ本体
//!
//! ## 処理フロー
//! 1. 会場名を正規化
//! 2. 正規会場インデックスと照合
//! 3. 完全一致がなければエイリアスを引いて再照合
//! 4. 判定を決定し、都市の整合性を確認
//!
//! 各レコードは独立に処理される。`Linker` は読み取り専用なのでスレッド間で共有できる。

use crate::alias::AliasConfig;
use crate::error::Result;
use crate::matcher::{Candidate, VenueIndex, MIN_PARTIAL_LEN};
use crate::normalize::{char_len, normalize_name, normalize_opt};
use crate::reporter::{summarize, LinkageSummary};
use crate::resolver::resolve;
use crate::types::{CanonicalVenue, MatchDecision, MatchFlag, MatchType, RawExhibitionRecord};
use serde::{Deserialize, Serialize};

/// リンケージオプション
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkageOptions {
    /// 部分一致を許可する最小文字数（3未満は3として扱う）
    pub min_partial_len: usize,
    /// 集計で出力する未一致会場名の件数
    pub top_unmatched: usize,
    /// 都市の整合性チェック
    pub check_city: bool,
}

impl Default for LinkageOptions {
    fn default() -> Self {
        Self {
            min_partial_len: MIN_PARTIAL_LEN,
            top_unmatched: 10,
            check_city: true,
        }
    }
}

/// 会場リンケージ
#[derive(Debug, Clone)]
pub struct Linker {
    index: VenueIndex,
    aliases: AliasConfig,
    options: LinkageOptions,
}

impl Linker {
    /// 会場スナップショットからリンカーを作成
    pub fn new(venues: Vec<CanonicalVenue>, options: LinkageOptions) -> Result<Self> {
        Ok(Self {
            index: VenueIndex::build(venues)?,
            aliases: AliasConfig::default(),
            options,
        })
    }

    pub fn with_aliases(mut self, aliases: AliasConfig) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn index(&self) -> &VenueIndex {
        &self.index
    }

    pub fn options(&self) -> &LinkageOptions {
        &self.options
    }

    /// 1レコードを照合する
    pub fn link(&self, record: &RawExhibitionRecord) -> MatchDecision {
        let query = normalize_name(&record.venue_name_text);
        let direct = self.match_query(record, &query);

        let mut decision = if direct.match_type() == MatchType::Exact {
            direct
        } else {
            match self.link_via_alias(record, &query) {
                Some(via) => direct.flags().iter().fold(via, |d, &flag| d.with_flag(flag)),
                None => direct,
            }
        };

        if self.options.check_city && self.city_mismatch(record, &decision) {
            decision = decision.with_flag(MatchFlag::CityMismatch);
        }

        tracing::trace!(
            venue_name = %record.venue_name_text,
            match_type = %decision.match_type(),
            "linked record"
        );

        decision
    }

    /// バッチを順に照合する
    pub fn link_all(&self, records: &[RawExhibitionRecord]) -> Vec<MatchDecision> {
        records.iter().map(|r| self.link(r)).collect()
    }

    /// 判定列を集計する（件数は options.top_unmatched）
    pub fn summarize(&self, decisions: &[MatchDecision]) -> LinkageSummary {
        summarize(decisions, self.options.top_unmatched)
    }

    fn match_query(&self, record: &RawExhibitionRecord, query: &str) -> MatchDecision {
        let candidates = self.index.candidates(query, self.options.min_partial_len);
        resolve(record, query, candidates)
    }

    /// エイリアス先の会場を完全一致候補として判定し直す
    ///
    /// 数字のみ・短いクエリの規則は直接照合と同じく適用される。一致なしになれば採用しない。
    fn link_via_alias(&self, record: &RawExhibitionRecord, query: &str) -> Option<MatchDecision> {
        let target = self.aliases.lookup(query)?;
        let venue = self.index.find_by_key(&normalize_name(target))?;

        let candidate = Candidate {
            venue,
            match_type: MatchType::Exact,
            shared_len: char_len(query),
        };
        let decision = resolve(record, query, std::iter::once(candidate));
        if decision.match_type() == MatchType::None {
            return None;
        }

        tracing::debug!(alias = query, venue_id = %venue.venue().id, "alias applied");

        Some(decision.with_flag(MatchFlag::AliasApplied))
    }

    fn city_mismatch(&self, record: &RawExhibitionRecord, decision: &MatchDecision) -> bool {
        let Some(venue) = decision.matched_venue() else {
            return false;
        };
        let record_city = normalize_opt(record.venue_city.as_deref());
        let venue_city = normalize_name(&venue.city);

        !record_city.is_empty() && !venue_city.is_empty() && record_city != venue_city
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venues() -> Vec<CanonicalVenue> {
        vec![
            CanonicalVenue {
                id: "kukje".to_string(),
                name: "국제갤러리".to_string(),
                name_english: "Kukje Gallery".to_string(),
                city: "서울".to_string(),
                country: "KR".to_string(),
            },
            CanonicalVenue {
                id: "mmca".to_string(),
                name: "국립현대미술관 서울".to_string(),
                name_english: "MMCA Seoul".to_string(),
                city: "서울".to_string(),
                country: "KR".to_string(),
            },
        ]
    }

    #[test]
    fn test_link_exact_with_qualifier() {
        let linker = Linker::new(venues(), LinkageOptions::default()).unwrap();
        let decision = linker.link(&RawExhibitionRecord::with_venue_name("  국제갤러리 (Seoul) "));
        assert_eq!(decision.match_type(), MatchType::Exact);
        assert_eq!(decision.matched_venue().unwrap().id, "kukje");
    }

    #[test]
    fn test_alias_used_only_without_direct_exact() {
        let aliases = AliasConfig::from_preset("korea").unwrap();
        let linker = Linker::new(venues(), LinkageOptions::default())
            .unwrap()
            .with_aliases(aliases);

        // "mmca" は英語名 "MMCA Seoul" の部分一致だが、エイリアスで完全一致になる
        let decision = linker.link(&RawExhibitionRecord::with_venue_name("MMCA"));
        assert_eq!(decision.match_type(), MatchType::Exact);
        assert!(decision.has_flag(MatchFlag::AliasApplied));

        // 直接の完全一致にはフラグを付けない
        let decision = linker.link(&RawExhibitionRecord::with_venue_name("MMCA Seoul"));
        assert!(!decision.has_flag(MatchFlag::AliasApplied));
    }

    #[test]
    fn test_numeric_alias_is_never_exact() {
        let mut venues = venues();
        venues.push(CanonicalVenue {
            id: "annex".to_string(),
            name: "Gallery 407 Annex".to_string(),
            ..Default::default()
        });
        let aliases = AliasConfig::from_json(r#"{"venues": {"407": "Gallery 407 Annex", "12": "Gallery 407 Annex"}}"#).unwrap();
        let linker = Linker::new(venues, LinkageOptions::default())
            .unwrap()
            .with_aliases(aliases);

        let decision = linker.link(&RawExhibitionRecord::with_venue_name("407"));
        assert_eq!(decision.match_type(), MatchType::Partial);
        assert_eq!(decision.confidence(), 70);
        assert_eq!(decision.matched_venue().unwrap().id, "annex");
        assert!(decision.has_flag(MatchFlag::NumericOnlyQuery));
        assert!(decision.has_flag(MatchFlag::AliasApplied));

        // 短い数字のみのクエリはエイリアスがあっても一致なし
        let decision = linker.link(&RawExhibitionRecord::with_venue_name("12"));
        assert_eq!(decision.match_type(), MatchType::None);
        assert!(!decision.has_flag(MatchFlag::AliasApplied));
        assert!(decision.has_flag(MatchFlag::NumericOnlyQuery));
        assert!(decision.has_flag(MatchFlag::ShortQuery));
    }

    #[test]
    fn test_alias_to_unknown_venue_falls_back() {
        let aliases = AliasConfig::from_preset("international").unwrap();
        let linker = Linker::new(venues(), LinkageOptions::default())
            .unwrap()
            .with_aliases(aliases);

        let decision = linker.link(&RawExhibitionRecord::with_venue_name("MoMA"));
        assert_eq!(decision.match_type(), MatchType::None);
    }

    #[test]
    fn test_city_mismatch_flag() {
        let linker = Linker::new(venues(), LinkageOptions::default()).unwrap();
        let record = RawExhibitionRecord {
            venue_name_text: "Kukje Gallery".to_string(),
            venue_city: Some("부산".to_string()),
            ..Default::default()
        };
        let decision = linker.link(&record);
        assert_eq!(decision.match_type(), MatchType::Exact);
        assert_eq!(decision.confidence(), 100);
        assert!(decision.has_flag(MatchFlag::CityMismatch));

        let options = LinkageOptions {
            check_city: false,
            ..Default::default()
        };
        let linker = Linker::new(venues(), options).unwrap();
        assert!(!linker.link(&record).has_flag(MatchFlag::CityMismatch));
    }

    #[test]
    fn test_link_all_preserves_order() {
        let linker = Linker::new(venues(), LinkageOptions::default()).unwrap();
        let records = vec![
            RawExhibitionRecord::with_venue_name("unknown"),
            RawExhibitionRecord::with_venue_name("국제갤러리"),
        ];
        let decisions = linker.link_all(&records);
        assert_eq!(decisions[0].match_type(), MatchType::None);
        assert_eq!(decisions[1].match_type(), MatchType::Exact);

        let summary = linker.summarize(&decisions);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.top_unmatched_names[0].name, "unknown");
    }
}
