//! 型付きメッセージ履歴（ChatMessage）
//!
//! チャットセッションは Vec<ChatMessage> を保持し、LLM プロバイダが API のリクエスト形式に変換する。
//! `hidden` は表示専用のフラグで、リクエストには載らない。

use serde::{Deserialize, Serialize};

/// メッセージの役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// 会話メッセージ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// 合成したコンテキスト（system プロンプトなど）を表示から外す
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            hidden: false,
        }
    }

    pub fn system(s: impl Into<String>) -> Self {
        Self::new(Role::System, s)
    }

    pub fn user(s: impl Into<String>) -> Self {
        Self::new(Role::User, s)
    }

    pub fn assistant(s: impl Into<String>) -> Self {
        Self::new(Role::Assistant, s)
    }

    /// 表示から外す
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}
