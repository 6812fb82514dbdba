//! カタログ取得元の実装（ローカルファイル / HTTP GET）

use crate::ports::outbound::CatalogSource;
use common::domain::CatalogLocation;
use common::error::Error;
use common::llm::openai_compat::{error_message_from_body, map_reqwest_error};
use common::ports::outbound::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// FileSystem ポート経由でファイルを読む
pub struct FileCatalogSource {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }
}

impl CatalogSource for FileCatalogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, Error> {
        self.fs.read_to_string(&self.path)
    }
}

/// reqwest（blocking）で GET する
pub struct HttpCatalogSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl CatalogSource for HttpCatalogSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, Error> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| map_reqwest_error("Catalog request failed", e))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| map_reqwest_error("Failed to read catalog", e))?;
        if !status.is_success() {
            return Err(Error::http(error_message_from_body(status.as_u16(), &body)));
        }
        Ok(body)
    }
}

/// 場所の形から取得元を選ぶ（http(s) なら HTTP、それ以外はファイル）
pub fn catalog_source_for(
    location: &CatalogLocation,
    fs: Arc<dyn FileSystem>,
    timeout: Duration,
) -> Result<Arc<dyn CatalogSource>, Error> {
    if location.is_remote() {
        Ok(Arc::new(HttpCatalogSource::new(location.to_string(), timeout)?))
    } else {
        Ok(Arc::new(FileCatalogSource::new(fs, PathBuf::from(&**location))))
    }
}
