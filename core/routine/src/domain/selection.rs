//! 選択中の製品列（名前で一意・挿入順）

use common::domain::Product;
use serde::{Deserialize, Serialize};

/// 選択の変化（購読者への通知内容）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Added(Product),
    Removed { index: usize, product: Product },
    Cleared,
}

/// 選択中の製品列
///
/// 同じ名前の製品は 1 つまで。削除しても残りの相対順は変わらない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    items: Vec<Product>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// スナップショットから復元する（重複名は先勝ちで落とす）
    pub fn from_snapshot(products: Vec<Product>) -> Self {
        let mut s = Self::new();
        for p in products {
            if !s.contains(&p.name) {
                s.items.push(p);
            }
        }
        s
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|p| p.name == name)
    }

    /// 同名があれば外し、無ければ末尾に足す
    pub fn toggle(&mut self, product: &Product) -> SelectionChange {
        match self.position(&product.name) {
            Some(index) => {
                let product = self.items.remove(index);
                SelectionChange::Removed { index, product }
            }
            None => {
                self.items.push(product.clone());
                SelectionChange::Added(product.clone())
            }
        }
    }

    /// 位置で外す。範囲外は None（呼び出し側でエラーにする）。
    pub fn remove(&mut self, index: usize) -> Option<SelectionChange> {
        if index >= self.items.len() {
            return None;
        }
        let product = self.items.remove(index);
        Some(SelectionChange::Removed { index, product })
    }

    pub fn clear(&mut self) -> SelectionChange {
        self.items.clear();
        SelectionChange::Cleared
    }
}
