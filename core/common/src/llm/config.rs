//! config.json 用の設定型
//!
//! 完了エンドポイント・モデル・トークン上限・タイムアウト・カタログの場所を解決するための構造体。
//! ファイルが無ければ既定値、読めなければ Json エラー。

use crate::domain::{CatalogLocation, ModelName};
use crate::error::Error;
use crate::llm::openai_compat::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::ports::outbound::FileSystem;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_CATALOG: &str = "products.json";
/// ルーティン生成時の max_tokens
pub const DEFAULT_ROUTINE_MAX_TOKENS: u32 = 250;
/// フォローアップ時の max_tokens
pub const DEFAULT_FOLLOW_UP_MAX_TOKENS: u32 = 200;

/// 解決済みの設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub model: ModelName,
    /// API キーを読む環境変数名（None のとき Authorization を付けない）
    pub api_key_env: Option<String>,
    pub routine_max_tokens: u32,
    pub follow_up_max_tokens: u32,
    pub timeout: Duration,
    pub catalog: CatalogLocation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: ModelName::new(DEFAULT_MODEL),
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            routine_max_tokens: DEFAULT_ROUTINE_MAX_TOKENS,
            follow_up_max_tokens: DEFAULT_FOLLOW_UP_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            catalog: CatalogLocation::new(DEFAULT_CATALOG),
        }
    }
}

/// コマンドライン等からの上書き（Some の項目だけ差し替える）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub model: Option<ModelName>,
    pub timeout_secs: Option<u64>,
    pub catalog: Option<CatalogLocation>,
}

/// serde 用の内部構造（省略可能な項目を Option で受ける）
#[derive(Debug, Default, Deserialize)]
struct SettingsRaw {
    #[serde(alias = "url")]
    endpoint: Option<String>,
    #[serde(alias = "default_model")]
    model: Option<String>,
    /// null を明示すると Authorization なし
    #[serde(default, deserialize_with = "explicit_null")]
    api_key_env: Option<Option<String>>,
    max_tokens: Option<MaxTokensRaw>,
    timeout_secs: Option<u64>,
    catalog: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MaxTokensRaw {
    routine: Option<u32>,
    follow_up: Option<u32>,
}

/// キーが存在すれば Some(値 or None)、存在しなければ None（default）
fn explicit_null<'de, D>(d: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(d).map(Some)
}

impl Settings {
    /// JSON 文字列からパース（ファイル読みは load で行う）
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: SettingsRaw = serde_json::from_str(json)?;
        let d = Settings::default();
        let max_tokens = raw.max_tokens.unwrap_or_default();
        Ok(Settings {
            endpoint: raw.endpoint.unwrap_or(d.endpoint),
            model: raw.model.map(ModelName::new).unwrap_or(d.model),
            api_key_env: match raw.api_key_env {
                Some(explicit) => explicit.filter(|s| !s.is_empty()),
                None => d.api_key_env,
            },
            routine_max_tokens: max_tokens.routine.unwrap_or(d.routine_max_tokens),
            follow_up_max_tokens: max_tokens.follow_up.unwrap_or(d.follow_up_max_tokens),
            timeout: raw.timeout_secs.map(Duration::from_secs).unwrap_or(d.timeout),
            catalog: raw.catalog.map(CatalogLocation::new).unwrap_or(d.catalog),
        })
    }

    /// 設定ファイルを読む。存在しなければ既定値。
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self, Error> {
        if !fs.exists(path) {
            return Ok(Settings::default());
        }
        let s = fs.read_to_string(path)?;
        Settings::parse(&s)
            .map_err(|e| Error::json(format!("Invalid settings '{}': {}", path.display(), e)))
    }

    /// 上書きを適用する
    pub fn apply(mut self, overrides: SettingsOverrides) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(catalog) = overrides.catalog {
            self.catalog = catalog;
        }
        self
    }
}
