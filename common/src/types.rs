//! 会場リンケージの型定義
//!
//! - CanonicalVenue: 正規会場レコード（外部で管理、読み取り専用）
//! - RawExhibitionRecord: 取り込み元の展示レコード（会場名は自由記述）
//! - MatchDecision: レコードごとの照合結果

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// 正規会場レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVenue {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "name_en", alias = "name_english")]
    pub name_english: String,

    #[serde(default)]
    pub city: String,

    #[serde(default)]
    pub country: String,
}

/// 取り込み元の展示レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExhibitionRecord {
    #[serde(default, alias = "venue_name", alias = "venueName")]
    pub venue_name_text: String,

    #[serde(default, alias = "venue_city", skip_serializing_if = "Option::is_none")]
    pub venue_city: Option<String>,

    #[serde(default, alias = "venue_country", skip_serializing_if = "Option::is_none")]
    pub venue_country: Option<String>,

    /// 展示タイトル（レポート表示用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// 開始日（重複検出で使う。形式は取得元のまま比較する）
    #[serde(default, alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// 取得元（artmap、culture_portal など）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// 文字列・配列・オブジェクト配列のいずれでも受け付ける
    #[serde(
        default,
        deserialize_with = "crate::repair::deserialize_artists",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub artists: Vec<String>,
}

impl RawExhibitionRecord {
    /// 会場名のみのレコードを作成
    pub fn with_venue_name(name: impl Into<String>) -> Self {
        Self {
            venue_name_text: name.into(),
            ..Default::default()
        }
    }
}

/// 照合の強さ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Partial,
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchType::Exact => write!(f, "exact"),
            MatchType::Partial => write!(f, "partial"),
            MatchType::None => write!(f, "none"),
        }
    }
}

/// 判定に付与される注意フラグ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFlag {
    /// 数字のみのクエリ（展示室番号の可能性）
    NumericOnlyQuery,
    /// 3文字未満のクエリ
    ShortQuery,
    /// エイリアス経由で一致
    AliasApplied,
    /// レコードの都市と会場の都市が異なる
    CityMismatch,
}

impl std::fmt::Display for MatchFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchFlag::NumericOnlyQuery => write!(f, "数字のみ"),
            MatchFlag::ShortQuery => write!(f, "短いクエリ"),
            MatchFlag::AliasApplied => write!(f, "エイリアス"),
            MatchFlag::CityMismatch => write!(f, "都市不一致"),
        }
    }
}

/// レコードごとの照合結果
///
/// `matched_venue` は `match_type != None` のときのみ存在し、
/// `confidence == 100` は `match_type == Exact` のときのみ。
/// 生成はコンストラクタ経由に限定する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "DecisionRepr")]
pub struct MatchDecision {
    record: RawExhibitionRecord,
    matched_venue: Option<CanonicalVenue>,
    match_type: MatchType,
    confidence: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    flags: Vec<MatchFlag>,
}

impl MatchDecision {
    pub const EXACT_CONFIDENCE: u8 = 100;
    pub const PARTIAL_CONFIDENCE: u8 = 70;
    pub const NO_MATCH_CONFIDENCE: u8 = 0;

    pub fn exact(record: RawExhibitionRecord, venue: CanonicalVenue) -> Self {
        Self {
            record,
            matched_venue: Some(venue),
            match_type: MatchType::Exact,
            confidence: Self::EXACT_CONFIDENCE,
            flags: Vec::new(),
        }
    }

    pub fn partial(record: RawExhibitionRecord, venue: CanonicalVenue) -> Self {
        Self {
            record,
            matched_venue: Some(venue),
            match_type: MatchType::Partial,
            confidence: Self::PARTIAL_CONFIDENCE,
            flags: Vec::new(),
        }
    }

    pub fn none(record: RawExhibitionRecord) -> Self {
        Self {
            record,
            matched_venue: None,
            match_type: MatchType::None,
            confidence: Self::NO_MATCH_CONFIDENCE,
            flags: Vec::new(),
        }
    }

    /// フラグを追加（重複は無視）
    pub fn with_flag(mut self, flag: MatchFlag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn record(&self) -> &RawExhibitionRecord {
        &self.record
    }

    pub fn matched_venue(&self) -> Option<&CanonicalVenue> {
        self.matched_venue.as_ref()
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn flags(&self) -> &[MatchFlag] {
        &self.flags
    }

    pub fn has_flag(&self, flag: MatchFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// 人手確認が必要か（不一致、またはフラグ付き）
    pub fn needs_review(&self) -> bool {
        self.match_type == MatchType::None || !self.flags.is_empty()
    }
}

/// デシリアライズ用の中間表現
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionRepr {
    record: RawExhibitionRecord,
    #[serde(default)]
    matched_venue: Option<CanonicalVenue>,
    match_type: MatchType,
    confidence: u8,
    #[serde(default)]
    flags: Vec<MatchFlag>,
}

impl TryFrom<DecisionRepr> for MatchDecision {
    type Error = Error;

    fn try_from(repr: DecisionRepr) -> Result<Self, Self::Error> {
        let expected = match repr.match_type {
            MatchType::Exact => MatchDecision::EXACT_CONFIDENCE,
            MatchType::Partial => MatchDecision::PARTIAL_CONFIDENCE,
            MatchType::None => MatchDecision::NO_MATCH_CONFIDENCE,
        };
        if repr.confidence != expected {
            return Err(Error::InvalidDecision(format!(
                "{} decision must have confidence {}, got {}",
                repr.match_type, expected, repr.confidence
            )));
        }
        if repr.matched_venue.is_some() != (repr.match_type != MatchType::None) {
            return Err(Error::InvalidDecision(format!(
                "{} decision has inconsistent matchedVenue",
                repr.match_type
            )));
        }

        Ok(MatchDecision {
            record: repr.record,
            matched_venue: repr.matched_venue,
            match_type: repr.match_type,
            confidence: repr.confidence,
            flags: repr.flags,
        })
    }
}
