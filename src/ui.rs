use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::events::AppEvent;
use crate::routes::Route;
use crate::views::{
    DashboardView, DownloadView, ForgotPasswordView, LandingView, LoginView, SignupView,
};
use crate::workspace::Workspace;
use dioxus::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

const DRQA_CSS: Asset = asset!("/assets/drqa.css");

/// Shared client handle; props compare by identity.
#[derive(Clone)]
pub struct ApiHandle(pub Arc<ApiClient>);

impl PartialEq for ApiHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<ClientConfig>();
    let client = use_hook(|| {
        ApiClient::http(&config)
            .map(|client| ApiHandle(Arc::new(client)))
            .map_err(|err| err.message)
    });

    rsx! {
        document::Link { rel: "stylesheet", href: DRQA_CSS }
        match client {
            Ok(api) => rsx! { Shell { api, config } },
            Err(message) => rsx! {
                div { class: "main-container",
                    div { class: "banner error", "Could not start: {message}" }
                }
            },
        }
    }
}

#[component]
fn Shell(api: ApiHandle, config: ClientConfig) -> Element {
    let ApiHandle(api) = api;
    let route = use_signal(|| Route::Landing);
    let notice = use_signal(|| Option::<String>::None);
    let workspace = {
        let api = Arc::clone(&api);
        use_signal(move || Workspace::new(api, &config))
    };

    use_session_events(&api, route, workspace);
    use_restore_session(&api, route, workspace);

    let current = route();
    // Guarded pages fall back to the login form once the identity is gone.
    let current = if current.requires_auth() && !api.is_authenticated() {
        Route::Login
    } else {
        current
    };

    rsx! {
        match current {
            Route::Landing => rsx! { LandingView { route } },
            Route::Login => rsx! { LoginView { route, workspace, notice } },
            Route::Signup => rsx! { SignupView { route, workspace, notice } },
            Route::ForgotPassword => rsx! { ForgotPasswordView { route } },
            Route::Dashboard | Route::Workspace => rsx! { DashboardView { route, workspace } },
            Route::Download { filename } => rsx! { DownloadView { route, workspace, filename } },
        }
    }
}

/// Sends the user back to the login page when the backend expires the session
/// and refetches the file list when documents change.
fn use_session_events(api: &Arc<ApiClient>, route: Signal<Route>, workspace: Signal<Workspace>) {
    let api = Arc::clone(api);
    use_future(move || {
        let api = Arc::clone(&api);
        let mut receiver = api.events().subscribe();
        let mut route = route;
        let mut workspace = workspace;
        async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        workspace.write().handle_event(&event);
                        if event == AppEvent::LoggedOut && route.peek().requires_auth() {
                            route.set(Route::Login);
                        }
                        if workspace.peek().listing_stale() && api.is_authenticated() {
                            let listing = api.list_documents().await;
                            let _ = workspace.write().finish_refresh(listing);
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    });
}

/// A still-valid session cookie skips the landing page.
fn use_restore_session(api: &Arc<ApiClient>, route: Signal<Route>, workspace: Signal<Workspace>) {
    let api = Arc::clone(api);
    use_future(move || {
        let api = Arc::clone(&api);
        let mut route = route;
        let mut workspace = workspace;
        async move {
            if let Ok(profile) = api.fetch_profile().await {
                workspace.write().set_profile(Some(profile));
                if *route.peek() == Route::Landing {
                    route.set(Route::Dashboard);
                }
            }
        }
    });
}
