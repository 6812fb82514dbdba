//! カタログの読み込みとセッション中のキャッシュ

use crate::domain::{Catalog, Notice};
use crate::ports::outbound::CatalogSource;
use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

/// カタログを取得できなかった（通信失敗・形の違うペイロード）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("products could not be loaded from {location}: {cause}")]
    Unavailable { location: String, cause: Error },
}

impl CatalogError {
    pub fn notice(&self) -> Notice {
        let CatalogError::Unavailable { cause, .. } = self;
        Notice::CatalogUnavailable(cause.to_string())
    }
}

impl From<CatalogError> for Error {
    fn from(e: CatalogError) -> Self {
        let msg = e.to_string();
        let CatalogError::Unavailable { cause, .. } = e;
        match cause {
            Error::Json(_) | Error::MalformedResponse(_) => Error::json(msg),
            Error::Http(_) | Error::Timeout(_) => Error::http(msg),
            _ => Error::io_msg(msg),
        }
    }
}

/// 取得元から読み込んだカタログを保持する
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    log: Arc<dyn Log>,
    cache: Option<Catalog>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>, log: Arc<dyn Log>) -> Self {
        Self {
            source,
            log,
            cache: None,
        }
    }

    /// キャッシュがあればそれを返し、無ければ取得する
    pub fn load(&mut self) -> Result<&Catalog, CatalogError> {
        if self.cache.is_none() {
            self.cache = Some(self.fetch()?);
        }
        self.cached().ok_or_else(|| self.unavailable(Error::system("catalog cache is empty")))
    }

    /// 常に取得し直す。失敗しても以前のキャッシュは残す。
    pub fn reload(&mut self) -> Result<&Catalog, CatalogError> {
        let catalog = self.fetch()?;
        self.cache = Some(catalog);
        self.cached().ok_or_else(|| self.unavailable(Error::system("catalog cache is empty")))
    }

    pub fn cached(&self) -> Option<&Catalog> {
        self.cache.as_ref()
    }

    /// カテゴリ一覧（初出順）
    pub fn categories(&mut self) -> Result<Vec<String>, CatalogError> {
        Ok(self
            .load()?
            .categories()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    fn unavailable(&self, cause: Error) -> CatalogError {
        CatalogError::Unavailable {
            location: self.source.describe(),
            cause,
        }
    }

    fn fetch(&self) -> Result<Catalog, CatalogError> {
        let location = self.source.describe();
        let parsed = self.source.fetch().and_then(|body| {
            Catalog::parse(&body).map_err(|e| {
                Error::json(format!("expected an object with a products array: {}", e))
            })
        });
        match parsed {
            Ok(catalog) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Info, "catalog loaded")
                        .layer("usecase")
                        .kind("catalog")
                        .field("location", location)
                        .field("products", catalog.len()),
                );
                Ok(catalog)
            }
            Err(cause) => {
                let _ = self.log.log(
                    &LogRecord::new(LogLevel::Error, cause.to_string())
                        .layer("usecase")
                        .kind("catalog")
                        .field("location", location.clone()),
                );
                Err(CatalogError::Unavailable { location, cause })
            }
        }
    }
}
