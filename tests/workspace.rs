mod common;

use common::{MockBackend, client, pdf};
use drqa::api::ApiError;
use drqa::api::models::UserLogin;
use drqa::config::ClientConfig;
use drqa::events::AppEvent;
use drqa::types::QueryMode;
use drqa::workspace::Workspace;
use std::path::PathBuf;
use std::sync::Arc;

fn scratch_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("drqa-workspace-{name}-{}", std::process::id()))
}

fn workspace(backend: &Arc<MockBackend>, downloads: &str) -> Workspace {
    let config = ClientConfig {
        download_dir: Some(scratch_dir(downloads)),
        ..ClientConfig::default()
    };
    Workspace::new(client(backend), &config)
}

#[tokio::test]
async fn upload_adds_the_document_and_makes_it_current() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "upload");

    ws.upload_document(pdf("report.pdf", 512)).await.unwrap();

    let current = ws.library().current().unwrap();
    assert_eq!(current.filename, "report.pdf");
    assert_eq!(ws.library().len(), 1);
    assert!(ws.banner().is_none());
}

#[tokio::test]
async fn rejected_upload_adds_nothing_and_shows_a_banner() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "rejected");

    let err = ws
        .upload_document(pdf("huge.pdf", 10_000_000))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(ws.library().is_empty());
    assert!(ws.banner().unwrap().contains("smaller file"));
    assert!(backend.calls().is_empty());

    ws.dismiss_banner();
    assert!(ws.banner().is_none());
}

#[tokio::test]
async fn current_document_turns_on_pdf_context() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "context");
    ws.new_chat();
    ws.set_mode(QueryMode::Comprehensive);

    ws.send("before upload").await.unwrap();
    ws.upload_document(pdf("paper.pdf", 64)).await.unwrap();
    ws.send("after upload").await.unwrap();
    ws.close_document();
    ws.send("after close").await.unwrap();

    let flags: Vec<bool> = backend
        .comprehensive_requests()
        .iter()
        .map(|request| request.use_pdf_context)
        .collect();
    assert_eq!(flags, [false, true, false]);
}

#[tokio::test]
async fn deleting_the_active_chat_keeps_the_rest() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "delete");
    let first = ws.new_chat();
    ws.send("first question").await.unwrap();
    let second = ws.new_chat();
    ws.send("second question").await.unwrap();

    ws.delete_chat(second).unwrap();

    assert_eq!(ws.sessions().active_id(), None);
    assert_eq!(ws.sessions().len(), 1);
    assert_eq!(ws.sessions().get(first).unwrap().messages().len(), 2);
    assert_eq!(ws.send("into the void").await, Ok(None));
    assert!(ws.select_chat(second).is_err());
}

#[tokio::test]
async fn listing_merges_known_documents() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "listing");
    ws.upload_document(pdf("kept.pdf", 300)).await.unwrap();
    backend.set_files(&["kept.pdf", "other.pdf"]);

    ws.refresh_documents().await.unwrap();

    let names: Vec<&str> = ws
        .library()
        .documents()
        .iter()
        .map(|doc| doc.filename.as_str())
        .collect();
    assert!(names.contains(&"kept.pdf"));
    assert!(names.contains(&"other.pdf"));
    assert_eq!(ws.library().get("kept.pdf").unwrap().size_bytes, 300);
}

#[tokio::test]
async fn removing_a_document() {
    let backend = MockBackend::new();
    backend.set_files(&["gone.pdf"]);
    let mut ws = workspace(&backend, "remove");
    ws.refresh_documents().await.unwrap();
    assert!(ws.select_document("gone.pdf"));

    ws.remove_document("gone.pdf").await.unwrap();
    assert!(ws.library().is_empty());
    assert!(ws.library().current().is_none());

    let err = ws.remove_document("gone.pdf").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(ws.banner(), Some("Failed to remove file"));
}

#[tokio::test]
async fn downloads_land_in_the_configured_directory() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "downloads");

    let saved = ws.download_document("notes.pdf").await.unwrap();
    assert_eq!(saved.file_name().unwrap(), "notes.pdf");
    assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"%PDF notes.pdf");

    let export = ws.export_history().await.unwrap();
    let name = export.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("conversation_history_"));
    assert!(name.ends_with(".docx"));

    let _ = tokio::fs::remove_dir_all(ws.download_dir()).await;
}

#[tokio::test]
async fn logout_clears_the_profile_even_when_the_call_fails() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "logout");
    ws.load_profile().await.unwrap();
    assert_eq!(ws.profile().unwrap().username, "ada");
    assert!(ws.api().is_authenticated());

    backend.fail_logout(ApiError::new("Network error - please check your connection", None));
    ws.logout().await;

    assert!(ws.profile().is_none());
    assert!(!ws.api().is_authenticated());
}

#[tokio::test]
async fn expired_session_event_clears_the_profile() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "expired");
    ws.api()
        .login(UserLogin {
            username: "ada".into(),
            password: "Engine42".into(),
        })
        .await
        .unwrap();
    ws.load_profile().await.unwrap();
    let mut events = ws.api().events().subscribe();

    ws.new_chat();
    backend.answer(Err(ApiError::unauthorized()));
    ws.send("hello?").await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event, AppEvent::LoggedOut);
    ws.handle_event(&event);
    assert!(ws.profile().is_none());
    assert!(ws.banner().unwrap().starts_with("Failed to get response"));
}

#[tokio::test]
async fn documents_changed_event_refreshes_the_library() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "changed");
    let mut events = ws.api().events().subscribe();
    backend.set_files(&["fresh.pdf", "shared.pdf"]);

    ws.upload_document(pdf("fresh.pdf", 128)).await.unwrap();
    assert!(!ws.listing_stale());

    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        AppEvent::DocumentsChanged {
            filename: "fresh.pdf".into()
        }
    );
    ws.handle_event(&event);
    assert!(ws.listing_stale());

    let listing = ws.api().list_documents().await;
    ws.finish_refresh(listing).unwrap();

    assert!(!ws.listing_stale());
    assert!(ws.library().get("shared.pdf").is_some());
    assert_eq!(ws.library().get("fresh.pdf").unwrap().size_bytes, 128);
}

#[tokio::test]
async fn failed_listing_keeps_the_library_stale() {
    let backend = MockBackend::new();
    let mut ws = workspace(&backend, "stale");
    ws.handle_event(&AppEvent::DocumentsChanged {
        filename: "x.pdf".into(),
    });

    let err = ws.finish_refresh(Err(ApiError::new("Internal server error", Some(500))));

    assert!(err.is_err());
    assert!(ws.listing_stale());
    assert_eq!(ws.banner(), Some("Failed to load files"));
}

#[tokio::test]
async fn remove_outcome_from_a_spawned_call_updates_the_library() {
    let backend = MockBackend::new();
    backend.set_files(&["a.pdf", "b.pdf"]);
    let mut ws = workspace(&backend, "spawned-remove");
    ws.refresh_documents().await.unwrap();

    let api = Arc::clone(ws.api());
    let outcome = api.remove("a.pdf").await;
    ws.finish_remove("a.pdf", outcome).unwrap();

    assert!(ws.library().get("a.pdf").is_none());
    assert!(ws.library().get("b.pdf").is_some());
    assert!(ws.banner().is_none());
}
