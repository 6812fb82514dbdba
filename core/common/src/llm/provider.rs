//! LLMプロバイダのトレイト定義

use crate::error::Error;
use crate::msg::ChatMessage;
use serde_json::Value;

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（OpenAI 互換、Echo など）はこのトレイトを実装する必要があります。
/// 1 回の呼び出しは「ペイロード生成 → HTTP → 応答テキスト抽出」の 3 段に分かれる。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// モデル名を返す（ログ用）
    fn model(&self) -> &str;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `messages` - 送信する会話全体（hidden フラグは送らない）
    /// * `max_tokens` - 応答の最大トークン数
    fn make_request_payload(&self, messages: &[ChatMessage], max_tokens: u32) -> Value;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Returns
    /// * `Ok(String)` - 2xx のレスポンス本文
    /// * `Err(Error)` - 通信失敗（`Error::Http`）、タイムアウト（`Error::Timeout`）、非 2xx
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスからテキストを抽出
    ///
    /// # Returns
    /// * `Ok(Some(text))` - 応答テキスト
    /// * `Ok(None)` - 期待した位置にテキストが無い
    /// * `Err(Error)` - JSON として読めない
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;

    /// 会話を送って応答テキストを得る
    ///
    /// 応答にテキストが無い場合は `Error::MalformedResponse`。
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, Error> {
        let payload = self.make_request_payload(messages, max_tokens);
        let body = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;
        let response = self.make_http_request(&body)?;
        let text = self
            .parse_response_text(&response)
            .map_err(|e| Error::malformed(e.to_string()))?;
        match text {
            Some(t) => Ok(t),
            None => Err(Error::malformed("response has no choices[0].message.content")),
        }
    }
}
