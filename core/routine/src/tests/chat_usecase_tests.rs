use super::SAMPLE_CATALOG;
use crate::adapter::StubCompletion;
use crate::domain::{Catalog, ChatError, ChatSession, ChatState, Notice, Selection};
use crate::usecase::ChatUseCase;
use common::adapter::NoopLog;
use common::error::Error;
use common::msg::Role;
use std::sync::Arc;

fn use_case(stub: Arc<StubCompletion>) -> ChatUseCase {
    ChatUseCase::new(stub, Arc::new(NoopLog), 250, 200)
}

fn selection_of(catalog: &Catalog, names: &[&str]) -> Selection {
    let mut s = Selection::new();
    for n in names {
        s.toggle(catalog.find(n).unwrap());
    }
    s
}

#[test]
fn test_generate_sends_context_and_routine_budget() {
    let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();
    let selection = selection_of(&catalog, &["Glow Serum"]);
    let stub = Arc::new(StubCompletion::text("Morning:\n- Glow Serum"));
    let uc = use_case(stub.clone());
    let mut session = ChatSession::new();

    let reply = uc.generate(&mut session, &catalog, &selection).unwrap();
    assert_eq!(reply, "Morning:\n- Glow Serum");
    assert!(session.routine_generated());
    assert_eq!(session.state(), ChatState::Ready);

    let calls = stub.calls();
    assert_eq!(calls.len(), 1);
    let (messages, max_tokens) = &calls[0];
    assert_eq!(*max_tokens, 250);
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::System);
    assert!(messages[1].content.contains("- Curl Cream: \n"));
    assert!(messages[1]
        .content
        .contains("Selected products:\n- Glow Serum: Brightening vitamin C serum"));
}

#[test]
fn test_follow_up_before_generation_makes_no_call() {
    let stub = Arc::new(StubCompletion::text("unused"));
    let uc = use_case(stub.clone());
    let mut session = ChatSession::new();
    let err = uc.follow_up(&mut session, "Which first?").unwrap_err();
    assert_eq!(err.notice(), Notice::GenerateFirst);
    assert!(session.transcript().is_empty());
    assert!(stub.calls().is_empty());
}

#[test]
fn test_follow_up_sends_whole_transcript_with_follow_up_budget() {
    let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();
    let stub = Arc::new(StubCompletion::new(vec![
        Ok("- Cleanser\n- Serum".to_string()),
        Ok("Use it at night.".to_string()),
    ]));
    let uc = use_case(stub.clone());
    let mut session = ChatSession::new();
    uc.generate(&mut session, &catalog, &Selection::new()).unwrap();

    let reply = uc.follow_up(&mut session, "When do I use the serum?").unwrap();
    assert_eq!(reply.as_deref(), Some("Use it at night."));
    let calls = stub.calls();
    let (messages, max_tokens) = &calls[1];
    assert_eq!(*max_tokens, 200);
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(session.transcript().len(), 5);
}

#[test]
fn test_empty_follow_up_is_ignored() {
    let stub = Arc::new(StubCompletion::text("routine"));
    let uc = use_case(stub.clone());
    let mut session = ChatSession::new();
    uc.generate(&mut session, &Catalog::default(), &Selection::new())
        .unwrap();
    assert_eq!(uc.follow_up(&mut session, "  \n").unwrap(), None);
    assert_eq!(stub.calls().len(), 1);
}

#[test]
fn test_failures_are_classified_and_unwind() {
    let stub = Arc::new(StubCompletion::new(vec![
        Err(Error::malformed("response has no choices[0].message.content")),
        Err(Error::timeout("after 30s")),
        Err(Error::http("HTTP 500: boom")),
    ]));
    let uc = use_case(stub);
    let mut session = ChatSession::new();
    let catalog = Catalog::default();

    let err = uc.generate(&mut session, &catalog, &Selection::new()).unwrap_err();
    assert_eq!(err.notice(), Notice::NoResponse);
    assert_eq!(session.state(), ChatState::Idle);

    let err = uc.generate(&mut session, &catalog, &Selection::new()).unwrap_err();
    assert!(matches!(err, ChatError::Timeout(_)));
    assert!(err.notice().to_string().starts_with("Error: "));

    let err = uc.generate(&mut session, &catalog, &Selection::new()).unwrap_err();
    assert!(matches!(err, ChatError::RemoteCallFailure(_)));
    assert!(session.transcript().is_empty());
    assert!(!session.routine_generated());
    assert!(!session.is_busy());
}

/// 1 回だけ指定のステータスで応答するローカル HTTP サーバ
fn serve_once(status: &'static str, body: &'static str) -> String {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            if let Some(v) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = v.trim().parse().unwrap();
            }
        }
        let mut request_body = vec![0u8; content_length];
        reader.read_exact(&mut request_body).unwrap();
        write!(
            stream,
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
        .unwrap();
    });
    format!("http://{}/v1/chat/completions", addr)
}

#[test]
fn test_server_error_status_becomes_remote_call_failure() {
    use crate::adapter::ProviderCompletion;
    use common::adapter::StdEnvResolver;
    use common::llm::OpenAiCompatProvider;
    use std::time::Duration;

    let url = serve_once("500 Internal Server Error", r#"{"error":{"message":"upstream down"}}"#);
    let provider =
        OpenAiCompatProvider::new("gpt-4o", url, None, Duration::from_secs(5), Arc::new(StdEnvResolver))
            .unwrap();
    let uc = ChatUseCase::new(
        Arc::new(ProviderCompletion::new(Arc::new(provider))),
        Arc::new(NoopLog),
        250,
        200,
    );
    let catalog = Catalog::parse(SAMPLE_CATALOG).unwrap();
    let selection = selection_of(&catalog, &["Glow Serum"]);
    let mut session = ChatSession::new();

    let err = uc.generate(&mut session, &catalog, &selection).unwrap_err();
    assert_eq!(
        err,
        ChatError::RemoteCallFailure("HTTP error: Chat completions error: upstream down".into())
    );
    assert_eq!(
        err.notice().to_string(),
        "Error: HTTP error: Chat completions error: upstream down"
    );
    assert_eq!(session.state(), ChatState::Idle);
    assert!(!session.is_busy());
}
