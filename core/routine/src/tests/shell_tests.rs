use super::{StaticSource, SAMPLE_CATALOG};
use crate::adapter::{KvSelectionStorage, StubCompletion};
use crate::ports::outbound::CatalogSource;
use crate::usecase::{CatalogLoader, ChatUseCase, RoutineUseCase, SelectionStore};
use common::adapter::{MemoryKeyValueStore, NoopLog};
use common::error::Error;
use common::ports::outbound::Log;
use std::io::Cursor;
use std::sync::Arc;

fn app(source: Arc<dyn CatalogSource>, stub: Arc<StubCompletion>) -> RoutineUseCase {
    let log: Arc<dyn Log> = Arc::new(NoopLog);
    let store = SelectionStore::restore(
        Arc::new(KvSelectionStorage::new(Arc::new(MemoryKeyValueStore::new()))),
        Arc::clone(&log),
    );
    RoutineUseCase::new(
        CatalogLoader::new(source, Arc::clone(&log)),
        store,
        ChatUseCase::new(stub, Arc::clone(&log), 250, 200),
        log,
    )
}

fn run_shell(app: &mut RoutineUseCase, script: &str) -> String {
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut out: Vec<u8> = Vec::new();
    let code = app.shell(&mut input, &mut out).unwrap();
    assert_eq!(code, 0);
    String::from_utf8(out).unwrap()
}

#[test]
fn test_initial_view_has_placeholders() {
    let mut app = app(
        Arc::new(StaticSource::ok(SAMPLE_CATALOG)),
        Arc::new(StubCompletion::new(vec![])),
    );
    let out = run_shell(&mut app, "quit\n");
    assert!(out.contains("Select a category to view products"));
    assert!(out.contains("No products selected"));
}

#[test]
fn test_category_toggle_rerenders_views() {
    let mut app = app(
        Arc::new(StaticSource::ok(SAMPLE_CATALOG)),
        Arc::new(StubCompletion::new(vec![])),
    );
    let out = run_shell(&mut app, "category Skincare\ntoggle Glow Serum\n");
    assert!(out.contains("[ ] Glow Serum (Lumi)"));
    assert!(out.contains("[x] Glow Serum (Lumi)"));
    assert!(out.contains(" 1. Glow Serum"));
    assert!(!out.contains("Curl Cream"));
    assert_eq!(app.store().items().len(), 1);
}

#[test]
fn test_search_without_category_filters_everything() {
    let mut app = app(
        Arc::new(StaticSource::ok(SAMPLE_CATALOG)),
        Arc::new(StubCompletion::new(vec![])),
    );
    let out = run_shell(&mut app, "search CURL\n");
    assert!(out.contains("[ ] Curl Cream (Coil)"));
    assert!(!out.contains("Glow Serum"));
}

#[test]
fn test_chat_flow_generate_then_ask() {
    let stub = Arc::new(StubCompletion::new(vec![
        Ok("Morning:\n- Daily Cleanser\n- Glow Serum".to_string()),
        Ok("Yes, every day.".to_string()),
    ]));
    let mut app = app(Arc::new(StaticSource::ok(SAMPLE_CATALOG)), stub.clone());
    let out = run_shell(
        &mut app,
        "Can I skip toner?\ntoggle Daily Cleanser\ngenerate\nIs it daily?\n",
    );
    assert!(out.contains("Please generate a routine first."));
    assert!(out.contains("Generating your routine..."));
    assert!(out.contains("  \u{2022} Glow Serum"));
    assert!(out.contains("Yes, every day."));
    assert!(!out.contains("Here are all available products"));
    assert_eq!(stub.calls().len(), 2);
}

#[test]
fn test_failures_are_notices_not_exits() {
    let stub = Arc::new(StubCompletion::new(vec![Err(Error::malformed("no choices"))]));
    let mut app = app(Arc::new(StaticSource::ok(SAMPLE_CATALOG)), stub);
    let out = run_shell(
        &mut app,
        "toggle Nope\nremove 1\nremove 0\nclear\ngenerate\nremove x\nquit\n",
    );
    assert!(out.contains("Error: unknown product: Nope"));
    assert!(out.contains("Error: no selected product at position 1 (selection has 0)"));
    assert!(out.contains("Error: positions start at 1"));
    assert!(out.contains("Sorry, no response from AI."));
    assert!(out.contains("usage: remove <number>"));
}

#[test]
fn test_unavailable_catalog_keeps_shell_usable() {
    let mut app = app(
        Arc::new(StaticSource::failing(Error::http("HTTP 404: not found"))),
        Arc::new(StubCompletion::new(vec![])),
    );
    let out = run_shell(&mut app, "category Skincare\nselected\n");
    assert!(out.contains("Products could not be loaded: HTTP error: HTTP 404: not found"));
    assert!(out.contains("No products selected"));
}

#[test]
fn test_question_starting_with_command_word_is_sent_as_follow_up() {
    let stub = Arc::new(StubCompletion::new(vec![
        Ok("Morning:\n- Glow Serum".to_string()),
        Ok("Once a day is enough.".to_string()),
        Ok("Swap the serum for a balm.".to_string()),
    ]));
    let mut app = app(Arc::new(StaticSource::ok(SAMPLE_CATALOG)), stub.clone());
    let question = "clear skin is my goal, should I use the serum twice a day?";
    let out = run_shell(
        &mut app,
        &format!("toggle Glow Serum\ngenerate\n{}\ngenerate a night version?\n", question),
    );
    assert_eq!(app.store().items().len(), 1);
    assert!(out.contains("Once a day is enough."));
    assert!(out.contains("Swap the serum for a balm."));
    let calls = stub.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1].1, 200);
    assert_eq!(calls[1].0.last().map(|m| m.content.as_str()), Some(question));
    assert_eq!(calls[2].1, 200);
}
