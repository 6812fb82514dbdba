//! OpenAI Chat Completions 互換プロバイダ
//!
//! `endpoint` にリクエストをそのまま POST する（`/chat/completions` は付け足さない）。
//! ボディは `{model, messages, max_tokens}`、応答は `choices[0].message.content` を読む。

use crate::error::Error;
use crate::llm::provider::LlmProvider;
use crate::msg::ChatMessage;
use crate::ports::outbound::EnvResolver;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    model: String,
    endpoint: String,
    api_key_env: Option<String>,
    env: Arc<dyn EnvResolver>,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `model` - モデル名
    /// * `endpoint` - POST 先の URL
    /// * `api_key_env` - API キーを読む環境変数名（None または未設定のとき Authorization を付けない）
    /// * `timeout` - 1 リクエストの上限時間
    pub fn new(
        model: impl Into<String>,
        endpoint: impl Into<String>,
        api_key_env: Option<String>,
        timeout: Duration,
        env: Arc<dyn EnvResolver>,
    ) -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            model: model.into(),
            endpoint: endpoint.into(),
            api_key_env,
            env,
            client,
        })
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| self.env.var(name))
            .map(|key| format!("Bearer {}", key))
    }
}

/// reqwest のエラーを Timeout / Http に振り分ける
pub fn map_reqwest_error(context: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("{}: {}", context, e))
    } else {
        Error::http(format!("{}: {}", context, e))
    }
}

/// 非 2xx 応答からエラーメッセージを作る（`error.message` があればそれを使う）
pub fn error_message_from_body(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

/// `choices[0].message.content` を取り出す（空文字は無しと同じ扱い）
pub fn extract_content(v: &Value) -> Option<String> {
    v["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai_compat"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(&self, messages: &[ChatMessage], max_tokens: u32) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();
        json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": max_tokens
        })
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(request_json.to_string());

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .map_err(|e| map_reqwest_error("HTTP request failed", e))?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| map_reqwest_error("Failed to read response", e))?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Chat completions error: {}",
                error_message_from_body(status.as_u16(), &response_text)
            )));
        }

        Ok(response_text)
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)
            .map_err(|e| Error::json(format!("Failed to parse response JSON: {}", e)))?;
        Ok(extract_content(&v))
    }
}
