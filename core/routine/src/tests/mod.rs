//! ユースケース単位のテスト（テスト用の差し替え実装もここに置く）

mod chat_usecase_tests;
mod shell_tests;

use crate::ports::outbound::CatalogSource;
use common::error::Error;
use common::ports::outbound::KeyValueStore;
use std::sync::Mutex;

pub(crate) const SAMPLE_CATALOG: &str = r#"{
  "products": [
    {"id": 1, "name": "Glow Serum", "brand": "Lumi", "category": "Skincare", "image": "img/glow.jpg",
     "description": "Brightening vitamin C serum"},
    {"id": 2, "name": "Daily Cleanser", "brand": "GlowLab", "category": "Skincare", "image": "img/cleanser.jpg",
     "description": "Gentle foaming cleanser"},
    {"id": 3, "name": "Curl Cream", "brand": "Coil", "category": "Haircare", "image": "img/curl.jpg"}
  ]
}"#;

/// 固定の本文（またはエラー）を返すカタログ取得元
pub(crate) struct StaticSource {
    body: Result<String, Error>,
}

impl StaticSource {
    pub(crate) fn ok(body: &str) -> Self {
        Self {
            body: Ok(body.to_string()),
        }
    }

    pub(crate) fn failing(e: Error) -> Self {
        Self { body: Err(e) }
    }
}

impl CatalogSource for StaticSource {
    fn describe(&self) -> String {
        "memory://products.json".to_string()
    }

    fn fetch(&self) -> Result<String, Error> {
        self.body.clone()
    }
}

/// 読み書きが失敗する KeyValueStore（容量超過・読めないディスクの代わり）
pub(crate) struct FailingKv {
    fail_get: bool,
    writes: Mutex<usize>,
}

impl FailingKv {
    pub(crate) fn on_write() -> Self {
        Self {
            fail_get: false,
            writes: Mutex::new(0),
        }
    }

    pub(crate) fn on_read_and_write() -> Self {
        Self {
            fail_get: true,
            writes: Mutex::new(0),
        }
    }

    pub(crate) fn attempted_writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl KeyValueStore for FailingKv {
    fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        if self.fail_get {
            Err(Error::io_msg("storage is not readable"))
        } else {
            Ok(None)
        }
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), Error> {
        *self.writes.lock().unwrap() += 1;
        Err(Error::io_msg("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> Result<(), Error> {
        Ok(())
    }
}
