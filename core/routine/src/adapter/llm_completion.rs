//! ChatCompletion の標準実装（LlmProvider に委譲する）

use crate::ports::outbound::ChatCompletion;
use common::error::Error;
use common::llm::LlmProvider;
use common::msg::ChatMessage;
use std::sync::Arc;

/// LlmProvider をそのまま ChatCompletion として使うアダプタ
pub struct ProviderCompletion {
    provider: Arc<dyn LlmProvider>,
}

impl ProviderCompletion {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

impl ChatCompletion for ProviderCompletion {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, Error> {
        self.provider.complete(messages, max_tokens)
    }

    fn model(&self) -> String {
        format!("{}/{}", self.provider.name(), self.provider.model())
    }
}
