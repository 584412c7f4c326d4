use crate::routes::Route;
use crate::workspace::{Workspace, fetch_and_save};
use dioxus::prelude::*;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
enum DownloadState {
    Pending,
    Saved(String),
    Failed(String),
}

/// Fetches one stored document into the download directory.
#[component]
pub fn DownloadView(
    route: Signal<Route>,
    workspace: Signal<Workspace>,
    filename: String,
) -> Element {
    let mut route = route;
    let mut state = use_signal(|| DownloadState::Pending);

    {
        let filename = filename.clone();
        use_future(move || {
            let filename = filename.clone();
            async move {
                let (api, dir) = {
                    let ws = workspace.peek();
                    (Arc::clone(ws.api()), ws.download_dir().to_path_buf())
                };
                match fetch_and_save(&api, &dir, &filename).await {
                    Ok(path) => state.set(DownloadState::Saved(path.display().to_string())),
                    Err(err) => {
                        tracing::warn!(%filename, "download failed: {err}");
                        state.set(DownloadState::Failed(err.to_string()));
                    }
                }
            }
        });
    }

    rsx! {
        div { class: "main-container download-page",
            h2 { "{filename}" }
            match state() {
                DownloadState::Pending => rsx! {
                    div { class: "shimmer-line",
                        span { class: "shimmer-text", "Downloading…" }
                    }
                },
                DownloadState::Saved(path) => rsx! {
                    div { class: "banner success", role: "status", "Saved to {path}" }
                },
                DownloadState::Failed(message) => rsx! {
                    div { class: "banner error", role: "alert", "Failed to download file: {message}" }
                },
            }
            button {
                class: "btn btn-ghost",
                r#type: "button",
                onclick: move |_| route.set(Route::Dashboard),
                "Back to dashboard"
            }
        }
    }
}
