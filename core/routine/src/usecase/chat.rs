//! ルーティン生成とフォローアップ（ChatSession と ChatCompletion をつなぐ）

use crate::domain::{Catalog, ChatError, ChatSession, PendingRequest, RequestKind, Selection};
use crate::ports::outbound::ChatCompletion;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Arc;

pub struct ChatUseCase {
    completion: Arc<dyn ChatCompletion>,
    log: Arc<dyn Log>,
    routine_max_tokens: u32,
    follow_up_max_tokens: u32,
}

impl ChatUseCase {
    pub fn new(
        completion: Arc<dyn ChatCompletion>,
        log: Arc<dyn Log>,
        routine_max_tokens: u32,
        follow_up_max_tokens: u32,
    ) -> Self {
        Self {
            completion,
            log,
            routine_max_tokens,
            follow_up_max_tokens,
        }
    }

    /// カタログ全体と選択からルーティンを生成し、応答テキストを返す
    pub fn generate(
        &self,
        session: &mut ChatSession,
        catalog: &Catalog,
        selection: &Selection,
    ) -> Result<String, ChatError> {
        let pending = session.begin_generation(catalog.products(), selection.items())?;
        self.dispatch(session, pending)
    }

    /// フォローアップを送る。空入力は Ok(None)。
    pub fn follow_up(
        &self,
        session: &mut ChatSession,
        text: &str,
    ) -> Result<Option<String>, ChatError> {
        match session.begin_follow_up(text)? {
            Some(pending) => self.dispatch(session, pending).map(Some),
            None => Ok(None),
        }
    }

    fn max_tokens(&self, kind: RequestKind) -> u32 {
        match kind {
            RequestKind::Routine => self.routine_max_tokens,
            RequestKind::FollowUp => self.follow_up_max_tokens,
        }
    }

    fn dispatch(
        &self,
        session: &mut ChatSession,
        pending: PendingRequest,
    ) -> Result<String, ChatError> {
        let kind = pending.kind();
        let max_tokens = self.max_tokens(kind);
        let _ = self.log.log(
            &LogRecord::new(LogLevel::Info, "completion request")
                .layer("usecase")
                .kind("chat")
                .field("request", kind.as_str())
                .field("model", self.completion.model())
                .field("messages", pending.messages().len())
                .field("max_tokens", max_tokens),
        );
        let result = self
            .completion
            .complete(pending.messages(), max_tokens)
            .map_err(ChatError::from_remote);
        if let Err(ref e) = result {
            let _ = self.log.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("usecase")
                    .kind("chat")
                    .field("request", kind.as_str()),
            );
        }
        session.finish(pending, result).map(|m| m.content.clone())
    }
}
