//! 選択スナップショットの保存・読み込み Outbound ポート

use common::domain::Product;
use common::error::Error;

/// 選択（Product の列）を永続化する能力
pub trait SelectionStorage: Send + Sync {
    /// 保存済みスナップショット。無ければ Ok(None)、壊れていれば Err。
    fn load(&self) -> Result<Option<Vec<Product>>, Error>;
    /// スナップショット全体を書き込む
    fn save(&self, products: &[Product]) -> Result<(), Error>;
}
