//! テスト用: 用意した応答を順に返す ChatCompletion 実装

use common::error::Error;
use common::msg::ChatMessage;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::outbound::ChatCompletion;

/// テスト用: 用意した結果を順に返し、受け取ったリクエストを記録する Stub
pub struct StubCompletion {
    replies: Mutex<VecDeque<Result<String, Error>>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, u32)>>,
}

impl StubCompletion {
    pub fn new(replies: Vec<Result<String, Error>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn text(reply: &str) -> Self {
        Self::new(vec![Ok(reply.to_string())])
    }

    /// これまでの呼び出し（送った会話と max_tokens）
    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatCompletion for StubCompletion {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), max_tokens));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::http("stub has no more replies")))
    }

    fn model(&self) -> String {
        "stub".to_string()
    }
}
