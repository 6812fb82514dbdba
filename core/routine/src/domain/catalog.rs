//! 製品カタログ（`{ "products": [...] }` の読み込み結果）

use common::domain::Product;
use serde::Deserialize;

/// カタログファイルの形
#[derive(Debug, Deserialize)]
struct CatalogFile {
    products: Vec<Product>,
}

/// 読み込み済みのカタログ。セッション中は不変。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// `products` 配列を持つオブジェクトとしてパースする
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::new(file.products))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// 名前で引く（名前はカタログ内で一意）
    pub fn find(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// カテゴリ一覧（初出順・重複なし・空は除く）
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in &self.products {
            let c = p.category.as_str();
            if !c.is_empty() && !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }
}
