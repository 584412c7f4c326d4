use crate::render::format_file_size;
use crate::routes::Route;
use crate::types::{DocumentFile, UploadedDocument};
use crate::upload::{UploadStatus, UploadTask};
use crate::workspace::Workspace;
use dioxus::prelude::*;
use std::path::Path;
use std::sync::Arc;

#[component]
pub fn DocumentsPanel(route: Signal<Route>, workspace: Signal<Workspace>) -> Element {
    rsx! {
        aside { class: "documents-panel",
            h3 { class: "section-title", "Documents" }
            Uploader { workspace }
            DocumentList { route, workspace }
        }
    }
}

#[component]
fn Uploader(workspace: Signal<Workspace>) -> Element {
    let mut workspace = workspace;
    let uploads = workspace.read().uploads().clone();
    let mut task = use_signal(|| uploads.snapshot());

    {
        let uploads = uploads.clone();
        use_future(move || {
            let mut receiver = uploads.subscribe();
            async move {
                loop {
                    task.set(receiver.borrow_and_update().clone());
                    if receiver.changed().await.is_err() {
                        break;
                    }
                }
            }
        });
    }

    let on_pick = move |evt: FormEvent| {
        let uploads = uploads.clone();
        async move {
            let Some(engine) = evt.files() else {
                return;
            };
            let Some(path) = engine.files().into_iter().next() else {
                return;
            };
            let Some(bytes) = engine.read_file(&path).await else {
                workspace.write().show_banner("Could not read the selected file");
                return;
            };
            let name = Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or(path);
            match uploads.upload(DocumentFile::from_bytes(name, bytes)).await {
                Ok(document) => workspace.write().add_document(document),
                Err(err) => workspace.write().show_banner(err.to_string()),
            }
        }
    };

    let current = task();
    rsx! {
        div { class: "uploader",
            label { class: "btn btn-ghost upload-button",
                input {
                    r#type: "file",
                    accept: ".pdf,application/pdf",
                    multiple: false,
                    disabled: current.is_uploading(),
                    onchange: on_pick,
                }
                "Upload PDF"
            }
            UploadProgress { task: current }
        }
    }
}

#[component]
fn UploadProgress(task: UploadTask) -> Element {
    let name = task.file_name.clone().unwrap_or_default();
    rsx! {
        match task.status {
            UploadStatus::Idle => rsx! {},
            UploadStatus::Uploading => rsx! {
                div { class: "upload-progress",
                    span { "Uploading {name}… {task.progress}%" }
                    progress { max: "100", value: "{task.progress}" }
                }
            },
            UploadStatus::Success { filename } => rsx! {
                div { class: "upload-progress success", "{filename} uploaded" }
            },
            UploadStatus::Failed { error } => rsx! {
                div { class: "upload-progress error", role: "alert", "{error}" }
            },
        }
    }
}

#[component]
fn DocumentList(route: Signal<Route>, workspace: Signal<Workspace>) -> Element {
    let ws = workspace.read();
    let documents = ws.library().documents().to_vec();
    let current = ws.library().current().map(|doc| doc.filename.clone());
    drop(ws);

    rsx! {
        if documents.is_empty() {
            p { class: "text-muted", "No documents uploaded yet." }
        } else {
            div { class: "doc-table",
                for document in documents {
                    DocumentRow {
                        key: "{document.filename}",
                        is_current: current.as_deref() == Some(document.filename.as_str()),
                        document,
                        route,
                        workspace,
                    }
                }
            }
        }
    }
}

#[component]
fn DocumentRow(
    document: UploadedDocument,
    is_current: bool,
    route: Signal<Route>,
    workspace: Signal<Workspace>,
) -> Element {
    let mut route = route;
    let mut workspace = workspace;
    let mut removing = use_signal(|| false);

    let select_name = document.filename.clone();
    let download_name = document.filename.clone();
    let remove_name = document.filename.clone();

    let on_remove = move |_| {
        if removing() {
            return;
        }
        removing.set(true);
        let filename = remove_name.clone();
        let api = Arc::clone(workspace.read().api());
        spawn(async move {
            let outcome = api.remove(&filename).await;
            let _ = workspace.write().finish_remove(&filename, outcome);
            removing.set(false);
        });
    };

    rsx! {
        div { class: format_args!("doc-row {}", if is_current { "active" } else { "" }),
            div {
                class: "doc-row-title",
                role: "button",
                tabindex: "0",
                onclick: move |_| {
                    workspace.write().select_document(&select_name);
                },
                "{document.filename}"
            }
            span { class: "doc-row-date", "{format_file_size(document.size_bytes)}" }
            div { class: "doc-row-actions",
                button {
                    class: "action-btn",
                    r#type: "button",
                    onclick: move |_| route.set(Route::Download { filename: download_name.clone() }),
                    "Download"
                }
                button {
                    class: "action-btn",
                    r#type: "button",
                    disabled: removing(),
                    onclick: on_remove,
                    "Remove"
                }
            }
        }
    }
}
