//! Echoプロバイダの実装
//!
//! 実際にLLM APIを呼び出さず、最後のユーザーメッセージを箇条書きで返します。
//! オフラインでの動作確認やデバッグ用に使用します。

use crate::error::Error;
use crate::llm::openai_compat::extract_content;
use crate::llm::provider::LlmProvider;
use crate::msg::{ChatMessage, Role};
use serde_json::{json, Value};

/// Echoプロバイダ
#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }

    fn make_request_payload(&self, messages: &[ChatMessage], max_tokens: u32) -> Value {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        json!({
            "model": "echo",
            "messages": messages.len(),
            "max_tokens": max_tokens,
            "last_user": last_user
        })
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let v: Value = serde_json::from_str(request_json)
            .map_err(|e| Error::json(format!("Failed to parse request JSON: {}", e)))?;
        let last = v["last_user"].as_str().unwrap_or("");
        let content = format!(
            "[echo] {} message(s) received.\n\n- {}",
            v["messages"],
            last.lines().next().unwrap_or("")
        );
        Ok(json!({ "choices": [{ "message": { "content": content } }] }).to_string())
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        Ok(extract_content(&v))
    }
}
