//! チャットセッションの状態機械
//!
//! Idle → Generating → Ready → Awaiting → Ready。
//! リモート呼び出し自体はここでは行わず、`begin_*` が送る内容を返し、結果を `finish` に戻す。
//! 同時に 2 つのリクエストを出さない（in_flight が埋まっている間は Busy）。

use crate::domain::notice::Notice;
use crate::domain::prompt::generation_messages;
use common::domain::Product;
use common::error::Error;
use common::msg::ChatMessage;

/// セッション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// ルーティン未生成
    Idle,
    /// ルーティン生成中
    Generating,
    /// ルーティン生成済み・入力待ち
    Ready,
    /// フォローアップ応答待ち
    Awaiting,
}

/// リクエスト種別（max_tokens の選択とログに使う）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Routine,
    FollowUp,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Routine => "routine",
            RequestKind::FollowUp => "follow_up",
        }
    }
}

/// 送信待ちのリクエスト。`begin_*` だけが作り、`finish` が消費する。
#[derive(Debug, PartialEq, Eq)]
pub struct PendingRequest {
    seq: u64,
    kind: RequestKind,
    messages: Vec<ChatMessage>,
    /// 失敗時に戻す状態
    resume: ChatState,
}

impl PendingRequest {
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// エンドポイントに送る会話全体
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// チャット操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("a routine has not been generated yet")]
    RoutineNotGenerated,
    #[error("another request is still in progress")]
    Busy,
    #[error("remote call failed: {0}")]
    RemoteCallFailure(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("request is not the one in flight")]
    StaleRequest,
}

impl ChatError {
    /// プロバイダのエラーを分類する
    pub fn from_remote(e: Error) -> Self {
        match e {
            Error::MalformedResponse(m) | Error::Json(m) => ChatError::MalformedResponse(m),
            Error::Timeout(m) => ChatError::Timeout(m),
            other => ChatError::RemoteCallFailure(other.to_string()),
        }
    }

    /// 画面に出す通知
    pub fn notice(&self) -> Notice {
        match self {
            ChatError::RoutineNotGenerated => Notice::GenerateFirst,
            ChatError::Busy => Notice::Busy,
            ChatError::MalformedResponse(_) => Notice::NoResponse,
            ChatError::RemoteCallFailure(m) | ChatError::Timeout(m) => Notice::Error(m.clone()),
            ChatError::StaleRequest => Notice::Error(self.to_string()),
        }
    }
}

impl From<ChatError> for Error {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::RoutineNotGenerated | ChatError::Busy => {
                Error::invalid_argument(e.notice().to_string())
            }
            ChatError::RemoteCallFailure(m) => Error::http(m),
            ChatError::MalformedResponse(m) => Error::malformed(m),
            ChatError::Timeout(m) => Error::timeout(m),
            ChatError::StaleRequest => Error::system(e.to_string()),
        }
    }
}

/// チャットセッション（1 ページセッションにつき 1 つ）
#[derive(Debug, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    state: ChatState,
    routine_generated: bool,
    next_seq: u64,
    in_flight: Option<u64>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            state: ChatState::Idle,
            routine_generated: false,
            next_seq: 1,
            in_flight: None,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn routine_generated(&self) -> bool {
        self.routine_generated
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn ensure_idle_line(&self) -> Result<(), ChatError> {
        if self.is_busy() {
            Err(ChatError::Busy)
        } else {
            Ok(())
        }
    }

    fn issue(&mut self, kind: RequestKind, messages: Vec<ChatMessage>, resume: ChatState) -> PendingRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight = Some(seq);
        PendingRequest {
            seq,
            kind,
            messages,
            resume,
        }
    }

    /// ルーティン生成を始める。トランスクリプトは成功するまで触らない。
    pub fn begin_generation(
        &mut self,
        catalog: &[Product],
        selection: &[Product],
    ) -> Result<PendingRequest, ChatError> {
        self.ensure_idle_line()?;
        let resume = self.state;
        self.state = ChatState::Generating;
        Ok(self.issue(RequestKind::Routine, generation_messages(catalog, selection), resume))
    }

    /// フォローアップを始める。空入力は Ok(None)（何もしない）。
    pub fn begin_follow_up(&mut self, text: &str) -> Result<Option<PendingRequest>, ChatError> {
        self.ensure_idle_line()?;
        if !self.routine_generated {
            return Err(ChatError::RoutineNotGenerated);
        }
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.transcript.push(ChatMessage::user(text));
        self.state = ChatState::Awaiting;
        let messages = self.transcript.clone();
        Ok(Some(self.issue(RequestKind::FollowUp, messages, ChatState::Ready)))
    }

    /// 応答（または失敗）を反映する
    ///
    /// - 生成成功: トランスクリプトを合成 2 件 + 応答で置き換え、routine_generated = true
    /// - 生成失敗: トランスクリプトはそのまま、状態は呼び出し前に戻す
    /// - フォローアップ成功: 応答を追記
    /// - フォローアップ失敗: ユーザー発言は残し、応答は追記しない
    pub fn finish(
        &mut self,
        pending: PendingRequest,
        result: Result<String, ChatError>,
    ) -> Result<&ChatMessage, ChatError> {
        if self.in_flight != Some(pending.seq) {
            return Err(ChatError::StaleRequest);
        }
        self.in_flight = None;
        match (pending.kind, result) {
            (RequestKind::Routine, Ok(reply)) => {
                self.transcript = pending.messages;
                self.transcript.push(ChatMessage::assistant(reply));
                self.routine_generated = true;
                self.state = ChatState::Ready;
            }
            (RequestKind::FollowUp, Ok(reply)) => {
                self.transcript.push(ChatMessage::assistant(reply));
                self.state = ChatState::Ready;
            }
            (_, Err(e)) => {
                self.state = pending.resume;
                return Err(e);
            }
        }
        self.transcript
            .last()
            .ok_or_else(|| ChatError::RemoteCallFailure("empty transcript".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::msg::Role;

    fn generated() -> ChatSession {
        let mut s = ChatSession::new();
        let pending = s.begin_generation(&[Product::new("A", "X")], &[]).unwrap();
        s.finish(pending, Ok("Use A.".to_string())).unwrap();
        s
    }

    #[test]
    fn test_generation_success_appends_one_assistant_message() {
        let mut s = ChatSession::new();
        let pending = s.begin_generation(&[], &[]).unwrap();
        assert_eq!(s.state(), ChatState::Generating);
        assert!(s.transcript().is_empty());
        assert_eq!(pending.messages().len(), 2);
        let reply = s.finish(pending, Ok("- Cleanser".to_string())).unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(s.transcript().len(), 3);
        assert_eq!(
            s.transcript().iter().filter(|m| m.role == Role::Assistant).count(),
            1
        );
        assert!(s.routine_generated());
        assert_eq!(s.state(), ChatState::Ready);
    }

    #[test]
    fn test_generation_failure_leaves_transcript_and_returns_idle() {
        let mut s = ChatSession::new();
        let pending = s.begin_generation(&[], &[]).unwrap();
        let err = s
            .finish(pending, Err(ChatError::RemoteCallFailure("down".into())))
            .unwrap_err();
        assert_eq!(err.notice(), Notice::Error("down".into()));
        assert!(s.transcript().is_empty());
        assert!(!s.routine_generated());
        assert_eq!(s.state(), ChatState::Idle);
        assert!(!s.is_busy());
    }

    #[test]
    fn test_regeneration_failure_keeps_previous_routine() {
        let mut s = generated();
        let before = s.transcript().to_vec();
        let pending = s.begin_generation(&[], &[]).unwrap();
        s.finish(pending, Err(ChatError::Timeout("30s".into())))
            .unwrap_err();
        assert_eq!(s.transcript(), before.as_slice());
        assert_eq!(s.state(), ChatState::Ready);
        assert!(s.routine_generated());
    }

    #[test]
    fn test_follow_up_rejected_before_generation() {
        let mut s = ChatSession::new();
        let err = s.begin_follow_up("what next?").unwrap_err();
        assert_eq!(err, ChatError::RoutineNotGenerated);
        assert_eq!(err.notice(), Notice::GenerateFirst);
        assert!(s.transcript().is_empty());
        assert!(!s.is_busy());
    }

    #[test]
    fn test_follow_up_success_and_failure() {
        let mut s = generated();
        let pending = s.begin_follow_up("  morning or night?  ").unwrap().unwrap();
        assert_eq!(s.state(), ChatState::Awaiting);
        assert_eq!(pending.kind(), RequestKind::FollowUp);
        assert_eq!(pending.messages().last().unwrap().content, "morning or night?");
        s.finish(pending, Ok("Night.".into())).unwrap();
        assert_eq!(s.transcript().len(), 5);

        let pending = s.begin_follow_up("and SPF?").unwrap().unwrap();
        let err = s
            .finish(pending, Err(ChatError::MalformedResponse("no choices".into())))
            .unwrap_err();
        assert_eq!(err.notice(), Notice::NoResponse);
        assert_eq!(s.transcript().len(), 6);
        assert_eq!(s.transcript().last().unwrap().content, "and SPF?");
        assert_eq!(s.state(), ChatState::Ready);
    }

    #[test]
    fn test_empty_follow_up_is_ignored() {
        let mut s = generated();
        assert!(s.begin_follow_up("   ").unwrap().is_none());
        assert_eq!(s.transcript().len(), 3);
        assert_eq!(s.state(), ChatState::Ready);
    }

    #[test]
    fn test_busy_guard_blocks_overlapping_requests() {
        let mut s = generated();
        let first = s.begin_follow_up("one").unwrap().unwrap();
        assert_eq!(s.begin_follow_up("two").unwrap_err(), ChatError::Busy);
        assert_eq!(s.begin_generation(&[], &[]).unwrap_err(), ChatError::Busy);
        assert_eq!(s.transcript().last().unwrap().content, "one");
        s.finish(first, Ok("ok".into())).unwrap();
        assert!(s.begin_follow_up("two").unwrap().is_some());
    }

    #[test]
    fn test_stale_request_rejected() {
        let mut s = generated();
        let mut other = generated();
        let pending = other.begin_follow_up("x").unwrap().unwrap();
        assert_eq!(
            s.finish(pending, Ok("y".into())).unwrap_err(),
            ChatError::StaleRequest
        );
        assert_eq!(s.transcript().len(), 3);
    }

    #[test]
    fn test_from_remote_classification() {
        assert!(matches!(
            ChatError::from_remote(Error::timeout("t")),
            ChatError::Timeout(_)
        ));
        assert!(matches!(
            ChatError::from_remote(Error::malformed("m")),
            ChatError::MalformedResponse(_)
        ));
        assert!(matches!(
            ChatError::from_remote(Error::http("503")),
            ChatError::RemoteCallFailure(_)
        ));
    }
}
