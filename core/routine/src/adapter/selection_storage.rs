//! 選択スナップショットを KeyValueStore に JSON 配列で保存するアダプタ

use crate::ports::outbound::SelectionStorage;
use common::domain::Product;
use common::error::Error;
use common::ports::outbound::KeyValueStore;
use std::sync::Arc;

/// 選択を保存するキー
pub const SELECTION_KEY: &str = "selectedProducts";

/// KeyValueStore の 1 キーに Product 配列をそのまま保存する実装
pub struct KvSelectionStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KvSelectionStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: SELECTION_KEY.to_string(),
        }
    }
}

impl SelectionStorage for KvSelectionStorage {
    fn load(&self) -> Result<Option<Vec<Product>>, Error> {
        match self.store.get(&self.key)? {
            None => Ok(None),
            Some(s) => serde_json::from_str::<Vec<Product>>(&s)
                .map(Some)
                .map_err(|e| Error::json(format!("Invalid selection snapshot: {}", e))),
        }
    }

    fn save(&self, products: &[Product]) -> Result<(), Error> {
        let json = serde_json::to_string(products).map_err(|e| Error::json(e.to_string()))?;
        self.store.set(&self.key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::MemoryKeyValueStore;

    #[test]
    fn test_save_load_and_empty_snapshot() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let storage = KvSelectionStorage::new(store.clone());
        assert_eq!(storage.load().unwrap(), None);

        let products = vec![Product::new("A", "X").with_description("d")];
        storage.save(&products).unwrap();
        assert_eq!(storage.load().unwrap(), Some(products));

        storage.save(&[]).unwrap();
        assert_eq!(store.get(SELECTION_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(SELECTION_KEY, "{oops").unwrap();
        let storage = KvSelectionStorage::new(store);
        assert!(matches!(storage.load(), Err(Error::Json(_))));
    }
}
