use crate::render::{
    format_message_timestamp, format_profile_date, markdown_to_html, user_initials,
};
use crate::routes::Route;
use crate::session::SessionId;
use crate::types::{ChatMessage, QueryMode};
use crate::views::documents::DocumentsPanel;
use crate::workspace::{Workspace, export_conversations};
use dioxus::events::Key;
use dioxus::prelude::*;
use std::sync::Arc;

#[component]
pub fn DashboardView(route: Signal<Route>, workspace: Signal<Workspace>) -> Element {
    use_document_listing(workspace);

    rsx! {
        div { class: "dashboard",
            Sidebar { route, workspace }
            main { class: "main-container",
                Banner { workspace }
                CurrentDocument { workspace }
                Transcript { workspace }
                Composer { workspace }
            }
            DocumentsPanel { route, workspace }
        }
    }
}

fn use_document_listing(workspace: Signal<Workspace>) {
    use_future(move || {
        let mut workspace = workspace;
        async move {
            let api = Arc::clone(workspace.peek().api());
            let listing = api.list_documents().await;
            let _ = workspace.write().finish_refresh(listing);
        }
    });
}

#[component]
fn Banner(workspace: Signal<Workspace>) -> Element {
    let mut workspace = workspace;
    let message = workspace.read().banner().map(str::to_string);
    rsx! {
        if let Some(message) = message {
            div { class: "banner error", role: "alert",
                span { "{message}" }
                button {
                    class: "btn-ghost",
                    r#type: "button",
                    aria_label: "Dismiss",
                    onclick: move |_| workspace.write().dismiss_banner(),
                    dangerous_inner_html: "&times;"
                }
            }
        }
    }
}

#[component]
fn CurrentDocument(workspace: Signal<Workspace>) -> Element {
    let mut workspace = workspace;
    let current = workspace
        .read()
        .library()
        .current()
        .map(|doc| doc.filename.clone());
    rsx! {
        if let Some(filename) = current {
            div { class: "current-document",
                span { class: "text-muted", "Answering from " }
                strong { "{filename}" }
                button {
                    class: "btn-ghost",
                    r#type: "button",
                    onclick: move |_| workspace.write().close_document(),
                    "Close"
                }
            }
        }
    }
}

#[component]
fn Sidebar(route: Signal<Route>, workspace: Signal<Workspace>) -> Element {
    let mut route = route;
    let mut workspace = workspace;
    let mut exporting = use_signal(|| false);

    let ws = workspace.read();
    let active = ws.sessions().active_id();
    let entries: Vec<(SessionId, String, bool)> = ws
        .sessions()
        .sessions()
        .iter()
        .map(|session| {
            (
                session.id(),
                session.title().to_string(),
                Some(session.id()) == active,
            )
        })
        .collect();
    let profile = ws.profile().cloned();
    drop(ws);

    let on_logout = move |_| {
        let api = Arc::clone(workspace.read().api());
        spawn(async move {
            let response = api.logout().await;
            tracing::info!("{}", response.message);
            workspace.write().set_profile(None);
            route.set(Route::Login);
        });
    };

    let on_export = move |_| {
        if exporting() {
            return;
        }
        exporting.set(true);
        let (api, dir, limit) = {
            let ws = workspace.read();
            (
                Arc::clone(ws.api()),
                ws.download_dir().to_path_buf(),
                ws.history_limit(),
            )
        };
        spawn(async move {
            match export_conversations(&api, &dir, limit).await {
                Ok(path) => tracing::info!(path = %path.display(), "conversation exported"),
                Err(err) => {
                    tracing::warn!("export failed: {err}");
                    workspace
                        .write()
                        .show_banner("Failed to download conversation. Please try again.");
                }
            }
            exporting.set(false);
        });
    };

    rsx! {
        aside { class: "sidebar",
            if let Some(profile) = profile {
                div { class: "profile-card",
                    div { class: "avatar", "{user_initials(profile.full_name.as_deref())}" }
                    div { class: "profile-details",
                        strong { "{profile.display_name()}" }
                        span { class: "text-muted", "{profile.email}" }
                        span { class: "text-muted",
                            "Member since {format_profile_date(&profile.created_at)}"
                        }
                    }
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| {
                    workspace.write().new_chat();
                },
                "New Chat"
            }
            nav { class: "session-list",
                if entries.is_empty() {
                    p { class: "text-muted", "No chats yet." }
                }
                for (id, title, is_active) in entries {
                    div {
                        key: "{id}",
                        class: format_args!("session-row {}", if is_active { "active" } else { "" }),
                        role: "button",
                        tabindex: "0",
                        onclick: move |_| {
                            let _ = workspace.write().select_chat(id);
                        },
                        span { class: "session-title", "{title}" }
                        button {
                            class: "btn-ghost",
                            r#type: "button",
                            title: "Delete chat",
                            onclick: move |evt: MouseEvent| {
                                evt.stop_propagation();
                                let _ = workspace.write().delete_chat(id);
                            },
                            dangerous_inner_html: "&times;"
                        }
                    }
                }
            }
            div { class: "sidebar-footer",
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    disabled: exporting(),
                    onclick: on_export,
                    if exporting() { "Exporting…" } else { "Export history" }
                }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: on_logout,
                    "Log out"
                }
            }
        }
    }
}

#[component]
fn Transcript(workspace: Signal<Workspace>) -> Element {
    let ws = workspace.read();
    let Some(session) = ws.sessions().active_session() else {
        return rsx! {
            div { class: "chat-empty",
                p { class: "text-muted", "Start a new chat to ask a question." }
            }
        };
    };
    let messages = session.messages().to_vec();
    let awaiting = ws.chat().is_awaiting(session.id());
    drop(ws);

    rsx! {
        div { id: "chat-list", class: "chat-list",
            for message in messages {
                MessageRow { key: "{message.id}", message }
            }
            if awaiting {
                div { class: "message-row assistant",
                    div { class: "avatar assistant", "Q" }
                    div { class: "shimmer-line",
                        span { class: "shimmer-text", "Thinking…" }
                    }
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: ChatMessage) -> Element {
    let side = if message.is_user() { "user" } else { "assistant" };
    let timestamp = format_message_timestamp(message.timestamp);
    rsx! {
        div { class: "message-row {side}",
            if !message.is_user() {
                div { class: "avatar assistant", "Q" }
            }
            div { class: "message-stack",
                div { class: "bubble {side}",
                    if message.is_user() {
                        "{message.text}"
                    } else {
                        AssistantBubble { content: message.text.clone() }
                    }
                }
                div { class: format_args!(
                        "message-meta {}",
                        if message.is_user() { "align-end" } else { "align-start" }
                    ),
                    span { class: "message-timestamp", "{timestamp}" }
                    if let Some(mode) = message.mode {
                        span { class: "message-mode", "{mode.label()}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(content: String) -> Element {
    let content_html = markdown_to_html(&content);
    let on_copy = move |_| {
        let raw = content.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    rsx! {
        div { class: "bubble-controls",
            div { class: "actions",
                button { class: "action-btn", title: "Copy markdown", onclick: on_copy, "Copy" }
            }
        }
        div { class: "md", dangerous_inner_html: "{content_html}" }
    }
}

#[component]
fn Composer(workspace: Signal<Workspace>) -> Element {
    let mut workspace = workspace;
    let mut input = use_signal(String::new);

    let ws = workspace.read();
    let active = ws.sessions().active_id();
    let awaiting = active.is_some_and(|id| ws.chat().is_awaiting(id));
    let mode = ws.mode();
    drop(ws);

    let mut send = move |text: String| {
        let started = workspace.write().begin_send(&text);
        let ticket = match started {
            Ok(Some(ticket)) => ticket,
            Ok(None) => return,
            Err(err) => {
                tracing::debug!("send rejected: {err}");
                return;
            }
        };
        input.set(String::new());
        let api = Arc::clone(workspace.read().api());
        spawn(async move {
            let outcome = ticket.dispatch(&api).await;
            workspace.write().finish_send(ticket, outcome);
        });
    };

    let placeholder = if active.is_some() {
        "Ask a question about your documents"
    } else {
        "Create a chat to start asking"
    };

    rsx! {
        form { class: "composer no-divider",
            onsubmit: move |evt: FormEvent| evt.prevent_default(),
            div { class: "mode-toggle",
                for option in [QueryMode::Simple, QueryMode::Comprehensive] {
                    button {
                        key: "{option.label()}",
                        class: format_args!("mode-option {}", if option == mode { "active" } else { "" }),
                        r#type: "button",
                        onclick: move |_| workspace.write().set_mode(option),
                        "{option.label()}"
                    }
                }
            }
            div { class: "composer-inner",
                div { class: "hstack", style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                    textarea {
                        rows: "1",
                        placeholder,
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                send(input());
                            }
                        },
                        disabled: awaiting || active.is_none(),
                        autofocus: true,
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: awaiting || active.is_none() || input().trim().is_empty(),
                        onclick: move |_| send(input()),
                        "Send"
                    }
                }
            }
        }
    }
}
