//! チャット完了の Outbound ポート
//!
//! 会話全体を 1 回送り、応答テキストを得る（ストリーミングしない）。

use common::error::Error;
use common::msg::ChatMessage;

/// 単発のチャット完了
pub trait ChatCompletion: Send + Sync {
    /// 応答テキストを返す。通信失敗・タイムアウト・形の違う応答は Err。
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, Error>;
    /// ログ用のモデル名
    fn model(&self) -> String;
}
