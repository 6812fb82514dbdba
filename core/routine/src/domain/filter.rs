//! カテゴリ・検索語による絞り込み（純粋関数）

use common::domain::Product;

/// カテゴリ条件。空文字や小文字の "all" は絞り込みなし（"All" などは通常のカテゴリ名）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter(Option<String>);

impl CategoryFilter {
    pub fn all() -> Self {
        Self(None)
    }

    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Self(None)
        } else {
            Self(Some(s.to_string()))
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self.0 {
            Some(ref c) => product.category == *c,
            None => true,
        }
    }
}

/// 表示対象を決める条件（カテゴリ完全一致 AND 検索語の部分一致）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: CategoryFilter,
    search: String,
}

impl ProductFilter {
    pub fn new(category: CategoryFilter, search: &str) -> Self {
        let mut f = Self {
            category,
            search: String::new(),
        };
        f.set_search(search);
        f
    }

    /// 検索語（前後空白を除き小文字化して保持）
    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn matches(&self, product: &Product) -> bool {
        if !self.category.matches(product) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&self.search);
        hit(product.name.as_str())
            || product.description.as_deref().map(hit).unwrap_or(false)
            || hit(product.brand.as_str())
    }

    /// カタログ順を保った部分列を返す
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}
