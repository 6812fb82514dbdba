//! LLM プロバイダの実装
//!
//! チャット完了エンドポイントへの 1 回の呼び出しを抽象化する。

pub mod config;
pub mod echo;
pub mod openai_compat;
pub mod provider;

pub use config::{Settings, SettingsOverrides};
pub use echo::EchoProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::LlmProvider;
