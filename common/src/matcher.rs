//! 会場照合モジュール
//!
//! 正規化済みクエリを正規会場インデックスと比較し、候補を列挙する。
//!
//! ## 照合ルール
//! - 完全一致: クエリが会場名キーまたは英語名キーと等しい
//! - 部分一致: クエリが3文字以上で、キーとの間に包含関係があり、
//!   短い方も3文字以上
//!
//! 候補は遅延評価のイテレータで返す（1回の走査のみ）。

use crate::error::{Error, Result};
use crate::normalize::{char_len, normalize_name};
use crate::types::{CanonicalVenue, MatchType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 部分一致を許可する最小文字数
pub const MIN_PARTIAL_LEN: usize = 3;

/// 正規化キーを事前計算した会場
#[derive(Debug, Clone)]
pub struct IndexedVenue {
    venue: CanonicalVenue,
    name_key: String,
    english_key: String,
}

impl IndexedVenue {
    fn new(venue: CanonicalVenue) -> Self {
        let name_key = normalize_name(&venue.name);
        let english_key = normalize_name(&venue.name_english);
        Self {
            venue,
            name_key,
            english_key,
        }
    }

    pub fn venue(&self) -> &CanonicalVenue {
        &self.venue
    }

    pub fn name_key(&self) -> &str {
        &self.name_key
    }

    pub fn english_key(&self) -> &str {
        &self.english_key
    }

    /// 空でないキーのみ
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        [self.name_key.as_str(), self.english_key.as_str()]
            .into_iter()
            .filter(|k| !k.is_empty())
    }
}

/// 照合対象から除外した会場（名前が空）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MalformedVenue {
    pub id: String,
    /// スナップショット内の位置
    pub position: usize,
    pub reason: String,
}

/// 照合候補
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub venue: &'a IndexedVenue,
    pub match_type: MatchType,
    /// 共有部分文字列の長さ（短い方の文字数）
    pub shared_len: usize,
}

/// 正規会場インデックス（バッチ実行中は読み取り専用）
#[derive(Debug, Clone, Default)]
pub struct VenueIndex {
    entries: Vec<IndexedVenue>,
    skipped: Vec<MalformedVenue>,
}

impl VenueIndex {
    /// スナップショットからインデックスを構築
    ///
    /// IDが空・重複している場合はコレクション自体が不正としてエラー。
    /// 名前が空の会場は警告を出して除外する。
    pub fn build(venues: Vec<CanonicalVenue>) -> Result<Self> {
        let mut entries = Vec::with_capacity(venues.len());
        let mut skipped = Vec::new();
        let mut seen_ids = HashSet::new();

        for (position, venue) in venues.into_iter().enumerate() {
            if venue.id.trim().is_empty() {
                return Err(Error::MalformedCollection(format!(
                    "venue at position {} has no id",
                    position
                )));
            }
            if !seen_ids.insert(venue.id.clone()) {
                return Err(Error::MalformedCollection(format!(
                    "duplicate venue id '{}' at position {}",
                    venue.id, position
                )));
            }

            let indexed = IndexedVenue::new(venue);
            if indexed.keys().next().is_none() {
                tracing::warn!(
                    venue_id = %indexed.venue.id,
                    position,
                    "venue has no usable name, excluded from matching"
                );
                skipped.push(MalformedVenue {
                    id: indexed.venue.id.clone(),
                    position,
                    reason: "name and nameEnglish are both empty".to_string(),
                });
                continue;
            }

            entries.push(indexed);
        }

        Ok(Self { entries, skipped })
    }

    /// 候補を遅延列挙する
    ///
    /// `min_partial_len` は `MIN_PARTIAL_LEN` 未満には下げられない。
    pub fn candidates<'a>(&'a self, query: &'a str, min_partial_len: usize) -> Candidates<'a> {
        let query_len = char_len(query);
        Candidates {
            query,
            query_len,
            allow_partial: query_len >= min_partial_len.max(MIN_PARTIAL_LEN),
            entries: self.entries.iter(),
        }
    }

    pub fn entries(&self) -> &[IndexedVenue] {
        &self.entries
    }

    pub fn skipped(&self) -> &[MalformedVenue] {
        &self.skipped
    }

    pub fn get(&self, id: &str) -> Option<&IndexedVenue> {
        self.entries.iter().find(|e| e.venue.id == id)
    }

    /// 会場名（または英語名）の正規化キーで検索
    pub fn find_by_key(&self, key: &str) -> Option<&IndexedVenue> {
        if key.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.keys().any(|k| k == key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 候補イテレータ（再開不可）
pub struct Candidates<'a> {
    query: &'a str,
    query_len: usize,
    allow_partial: bool,
    entries: std::slice::Iter<'a, IndexedVenue>,
}

impl<'a> Candidates<'a> {
    fn evaluate(&self, venue: &'a IndexedVenue) -> Option<Candidate<'a>> {
        if venue.keys().any(|k| k == self.query) {
            return Some(Candidate {
                venue,
                match_type: MatchType::Exact,
                shared_len: self.query_len,
            });
        }

        if !self.allow_partial {
            return None;
        }

        venue
            .keys()
            .filter_map(|key| {
                let shorter = self.query_len.min(char_len(key));
                let contained = key.contains(self.query) || self.query.contains(key);
                (contained && shorter >= MIN_PARTIAL_LEN).then_some(shorter)
            })
            .max()
            .map(|shared_len| Candidate {
                venue,
                match_type: MatchType::Partial,
                shared_len,
            })
    }
}

impl<'a> Iterator for Candidates<'a> {
    type Item = Candidate<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.query.is_empty() {
            return None;
        }
        while let Some(venue) = self.entries.next() {
            if let Some(candidate) = self.evaluate(venue) {
                return Some(candidate);
            }
        }
        None
    }
}
