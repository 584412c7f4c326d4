mod common;

use common::{MockBackend, client};
use drqa::api::ApiError;
use drqa::api::models::UserLogin;
use drqa::chat::{ChatController, ChatError, FALLBACK_REPLY};
use drqa::events::AppEvent;
use drqa::session::SessionStore;
use drqa::types::{QueryMode, Role};
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn hello_gets_an_answer_and_names_the_chat() {
    let backend = MockBackend::new();
    backend.answer(Ok("Hi there".into()));
    let mut chat = ChatController::new(client(&backend));
    let mut store = SessionStore::new();
    let id = store.create_session();

    let reply = chat
        .send_message(&mut store, "Hello", QueryMode::Comprehensive)
        .await
        .unwrap();
    assert!(reply.is_some());

    let session = store.get(id).unwrap();
    assert_eq!(session.title(), "Hello");
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].origin, Role::User);
    assert_eq!(messages[0].text, "Hello");
    assert_eq!(messages[1].origin, Role::Assistant);
    assert_eq!(messages[1].text, "Hi there");
    assert!(!chat.is_awaiting(id));
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn each_mode_issues_exactly_one_query() {
    let backend = MockBackend::new();
    let mut chat = ChatController::new(client(&backend)).with_max_tokens(256);
    let mut store = SessionStore::new();
    store.create_session();

    chat.send_message(&mut store, "plain", QueryMode::Simple)
        .await
        .unwrap();
    assert_eq!(backend.calls(), ["query"]);

    chat.set_document_context(true);
    chat.send_message(&mut store, "deep", QueryMode::Comprehensive)
        .await
        .unwrap();
    assert_eq!(backend.calls(), ["query", "query_comprehensive"]);

    let request = &backend.comprehensive_requests()[0];
    assert_eq!(request.query, "deep");
    assert!(request.use_pdf_context);
    assert!(request.generate_comprehensive);
    assert_eq!(request.max_tokens, 256);
}

#[tokio::test]
async fn simple_mode_reads_the_comprehensive_answer() {
    let backend = MockBackend::new();
    backend.answer_simple_as_comprehensive();
    backend.answer(Ok("Hi there".into()));
    let mut chat = ChatController::new(client(&backend));
    let mut store = SessionStore::new();
    let id = store.create_session();

    chat.send_message(&mut store, "Hello", QueryMode::Simple)
        .await
        .unwrap();

    assert_eq!(backend.calls(), ["query"]);
    let reply = store.get(id).unwrap().last_message().unwrap();
    assert_eq!(reply.origin, Role::Assistant);
    assert_eq!(reply.text, "Hi there");
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn failed_query_appends_the_fallback_once() {
    let backend = MockBackend::new();
    backend.answer(Err(ApiError::new("Internal server error", Some(500))));
    let mut chat = ChatController::new(client(&backend));
    let mut store = SessionStore::new();
    let id = store.create_session();

    chat.send_message(&mut store, "Why?", QueryMode::Simple)
        .await
        .unwrap();

    let messages = store.get(id).unwrap().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "Why?");
    assert_eq!(messages[0].origin, Role::User);
    assert_eq!(messages[1].text, FALLBACK_REPLY);
    assert_eq!(messages[1].origin, Role::Assistant);
    assert_eq!(
        chat.last_error(),
        Some("Failed to get response: Internal server error")
    );

    chat.dismiss_error();
    assert!(chat.last_error().is_none());
}

#[tokio::test]
async fn sending_without_an_active_session_changes_nothing() {
    let backend = MockBackend::new();
    let mut chat = ChatController::new(client(&backend));
    let mut store = SessionStore::new();

    let result = chat
        .send_message(&mut store, "anyone?", QueryMode::Simple)
        .await;

    assert_eq!(result, Ok(None));
    assert!(store.is_empty());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn blank_input_is_rejected() {
    let backend = MockBackend::new();
    let mut chat = ChatController::new(client(&backend));
    let mut store = SessionStore::new();
    let id = store.create_session();

    let result = chat.send_message(&mut store, "   ", QueryMode::Simple).await;
    assert_eq!(result, Err(ChatError::EmptyMessage));
    assert!(store.get(id).unwrap().is_empty());
}

#[tokio::test]
async fn reply_for_a_deleted_session_is_dropped() {
    let backend = MockBackend::new();
    backend.answer(Ok("too late".into()));
    let api = client(&backend);
    let mut chat = ChatController::new(api.clone());
    let mut store = SessionStore::new();
    let doomed = store.create_session();

    let ticket = chat
        .begin(&mut store, "question", QueryMode::Simple)
        .unwrap()
        .unwrap();
    assert_eq!(ticket.session(), doomed);
    assert!(chat.is_awaiting(doomed));

    store.delete_session(doomed).unwrap();
    let survivor = store.create_session();

    let outcome = ticket.dispatch(&api).await;
    assert_eq!(chat.complete(&mut store, ticket, outcome), None);

    assert!(!chat.is_awaiting(doomed));
    assert!(store.get(survivor).unwrap().is_empty());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn second_send_waits_for_the_first_reply() {
    let backend = MockBackend::new();
    let api = client(&backend);
    let mut chat = ChatController::new(api.clone());
    let mut store = SessionStore::new();
    let id = store.create_session();

    let ticket = chat
        .begin(&mut store, "first", QueryMode::Simple)
        .unwrap()
        .unwrap();
    assert_eq!(
        chat.begin(&mut store, "second", QueryMode::Simple),
        Err(ChatError::AwaitingReply(id))
    );
    assert_eq!(store.get(id).unwrap().messages().len(), 1);

    let outcome = ticket.dispatch(&api).await;
    chat.complete(&mut store, ticket, outcome);
    assert!(chat.begin(&mut store, "second", QueryMode::Simple).is_ok());
}

#[tokio::test]
async fn unauthorized_query_logs_the_user_out_once() {
    let backend = MockBackend::new();
    let api = client(&backend);
    api.login(UserLogin {
        username: "ada".into(),
        password: "Engine42".into(),
    })
    .await
    .unwrap();
    assert!(api.is_authenticated());

    let mut events = api.events().subscribe();
    backend.answer(Err(ApiError::unauthorized()));
    let mut chat = ChatController::new(api.clone());
    let mut store = SessionStore::new();
    let id = store.create_session();

    chat.send_message(&mut store, "still there?", QueryMode::Comprehensive)
        .await
        .unwrap();

    assert!(!api.is_authenticated());
    assert!(api.cached_user().is_none());
    assert_eq!(events.try_recv(), Ok(AppEvent::LoggedOut));
    assert_eq!(events.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(
        store.get(id).unwrap().last_message().unwrap().text,
        FALLBACK_REPLY
    );
}
