use crate::error::{LinkageError, Result};
use sayu_linkage_common::LinkageOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 会場スナップショットの取得元DB設定
///
/// 照合処理自体はI/Oを持たないので、ここで保持するのは取り込み側に渡す値のみ。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub service_key: Option<String>,
    pub venues_table: String,
    pub exhibitions_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            service_key: None,
            venues_table: "venues".into(),
            exhibitions_table: "exhibitions".into(),
        }
    }
}

impl DatabaseConfig {
    /// 環境変数を優先してURLを取得
    pub fn get_url(&self) -> Result<String> {
        if let Ok(url) = std::env::var("SAYU_DATABASE_URL") {
            return Ok(url);
        }

        self.url
            .clone()
            .ok_or_else(|| LinkageError::Config("データベースURLが設定されていません".into()))
    }

    /// 環境変数を優先してサービスキーを取得
    pub fn get_service_key(&self) -> Option<String> {
        std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .ok()
            .or_else(|| self.service_key.clone())
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(url) = &self.url {
            if !(url.starts_with("https://") || url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(LinkageError::Config(format!("不正なデータベースURL: {}", url)));
            }
        }
        if self.venues_table.trim().is_empty() {
            return Err(LinkageError::Config("venues_table が空です".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub linkage: LinkageOptions,
    /// 既定のエイリアスプリセット
    pub alias_preset: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.database.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LinkageError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("sayu-linkage").join("config.json"))
    }

    pub fn set_database_url(&mut self, url: String) -> Result<()> {
        self.database.url = Some(url);
        self.database.validate()?;
        self.save()
    }
}
