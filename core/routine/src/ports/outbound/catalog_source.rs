//! カタログ取得の Outbound ポート
//!
//! 生の JSON 文字列を返すだけ。パースとキャッシュは CatalogLoader が持つ。

use common::error::Error;

/// カタログの取得元（ファイル / HTTP）
pub trait CatalogSource: Send + Sync {
    /// ログ・エラー表示用の説明（パスや URL）
    fn describe(&self) -> String;
    /// カタログ JSON を取得する
    fn fetch(&self) -> Result<String, Error>;
}
