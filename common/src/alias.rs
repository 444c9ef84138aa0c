//! 会場エイリアス変換モジュール
//!
//! 略称や別表記（MMCA、SeMA、MoMA など）を正規会場名へ対応付ける。
//! キーは正規化して保持するので、表記ゆれ（大文字小文字・括弧・空白）は吸収される。

use crate::error::Result;
use crate::normalize::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// エイリアス定義（別名 → 正規会場名）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasConfig {
    #[serde(default)]
    pub venues: HashMap<String, String>,
}

impl AliasConfig {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "korea" | "kr" | "한국" => Some(Self::korea_preset()),
            "international" | "intl" | "해외" => Some(Self::international_preset()),
            "all" | "전체" => {
                let mut config = Self::korea_preset();
                config.merge(&Self::international_preset());
                Some(config)
            }
            _ => None,
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// JSONファイルに保存
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 国内主要館
    fn korea_preset() -> Self {
        let mut config = Self::default();

        config.insert("MMCA", "국립현대미술관 서울");
        config.insert("MMCA Seoul", "국립현대미술관 서울");
        config.insert("국현", "국립현대미술관 서울");
        config.insert("SeMA", "서울시립미술관");
        config.insert("Seoul Museum of Art", "서울시립미술관");
        config.insert("리움", "리움미술관");
        config.insert("Leeum", "리움미술관");
        config.insert("Leeum Samsung Museum of Art", "리움미술관");
        config.insert("Kukje", "국제갤러리");
        config.insert("Arario Seoul", "아라리오갤러리 서울");
        config.insert("아라리오 서울", "아라리오갤러리 서울");
        config.insert("현대화랑", "갤러리현대");

        config
    }

    /// 海外主要館
    fn international_preset() -> Self {
        let mut config = Self::default();

        config.insert("MoMA", "Museum of Modern Art");
        config.insert("The MoMA", "Museum of Modern Art");
        config.insert("Met Museum", "The Metropolitan Museum of Art");
        config.insert("Metropolitan Museum", "The Metropolitan Museum of Art");
        config.insert("Tate", "Tate Modern");
        config.insert("Zwirner", "David Zwirner");
        config.insert("Gagosian", "Gagosian Gallery");

        config
    }

    /// 別名を追加（キーは正規化）
    pub fn insert(&mut self, alias: &str, canonical_name: &str) {
        let key = normalize_name(alias);
        if !key.is_empty() {
            self.venues.insert(key, canonical_name.to_string());
        }
    }

    /// 正規化済みクエリの別名を引く（完全一致のみ）
    pub fn lookup(&self, query_key: &str) -> Option<&str> {
        self.venues.get(query_key).map(String::as_str)
    }

    /// 設定をマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &AliasConfig) {
        self.venues.extend(other.venues.clone());
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// 手書きJSONのキーを正規化し直す
    fn normalized(self) -> Self {
        let mut config = Self::default();
        for (alias, canonical) in self.venues {
            config.insert(&alias, &canonical);
        }
        config
    }
}

/// プリセットとカスタムファイルからエイリアス設定を構築
pub fn build_aliases(preset: Option<&str>, custom_json: Option<&str>) -> Result<AliasConfig> {
    let mut config = AliasConfig::default();

    if let Some(preset_name) = preset {
        if let Some(preset_config) = AliasConfig::from_preset(preset_name) {
            config.merge(&preset_config);
        } else {
            tracing::warn!(preset = preset_name, "unknown alias preset (korea/international/all)");
        }
    }

    // カスタム定義はプリセットを上書き
    if let Some(json) = custom_json {
        let custom_config = AliasConfig::from_json(json)?;
        config.merge(&custom_config);
    }

    Ok(config)
}
