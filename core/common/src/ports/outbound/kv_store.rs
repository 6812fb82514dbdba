//! キー・値ストア Outbound ポート
//!
//! 単一ライター前提のローカル永続化（ブラウザの localStorage 相当）。
//! 値は文字列（通常は JSON）。

use crate::error::Error;

/// キー・値ストア抽象
///
/// 実装は `common::adapter::FileKeyValueStore`（ファイル）や `MemoryKeyValueStore`（メモリ）。
pub trait KeyValueStore: Send + Sync {
    /// 値を読む。キーが無ければ Ok(None)。
    fn get(&self, key: &str) -> Result<Option<String>, Error>;
    /// 値を書く（上書き）
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    /// キーを消す。無くてもエラーにしない。
    fn remove(&self, key: &str) -> Result<(), Error>;
}
