use crate::api::ApiError;
use crate::forms::{ForgotPasswordForm, FormErrors, LoginForm, SignupForm};
use crate::routes::Route;
use crate::workspace::Workspace;
use dioxus::prelude::*;
use std::sync::Arc;

const SIGNUP_NOTICE: &str = "Account created successfully! Please login to continue.";

#[component]
pub fn LoginView(
    route: Signal<Route>,
    workspace: Signal<Workspace>,
    notice: Signal<Option<String>>,
) -> Element {
    let mut route = route;
    let mut workspace = workspace;
    let mut notice = notice;
    let username = use_signal(String::new);
    let password = use_signal(String::new);
    let mut errors = use_signal(FormErrors::default);
    let mut submitting = use_signal(|| false);
    let mut failure = use_signal(|| Option::<String>::None);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let form = LoginForm {
            username: username(),
            password: password(),
        };
        if let Err(found) = form.validate() {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::default());
        failure.set(None);
        submitting.set(true);

        let api = Arc::clone(workspace.read().api());
        spawn(async move {
            match api.login(form.to_request()).await {
                Ok(response) => {
                    workspace.write().set_profile(Some(response.user));
                    notice.set(None);
                    route.set(Route::Dashboard);
                }
                Err(err) => failure.set(Some(login_failure(&err))),
            }
            submitting.set(false);
        });
    };

    let field_errors = errors();

    rsx! {
        AuthFrame { title: "Log in",
            if let Some(message) = notice() {
                div { class: "banner success", role: "status", "{message}" }
            }
            if let Some(message) = failure() {
                div { class: "banner error", role: "alert", "{message}" }
            }
            form { class: "auth-form", onsubmit: on_submit,
                TextField {
                    name: "username",
                    label: "Username",
                    value: username,
                    error: field_errors.for_field("username"),
                }
                TextField {
                    name: "password",
                    label: "Password",
                    kind: "password",
                    value: password,
                    error: field_errors.for_field("password"),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Signing in…" } else { "Log in" }
                }
            }
            div { class: "auth-footer",
                button {
                    class: "link",
                    r#type: "button",
                    onclick: move |_| route.set(Route::ForgotPassword),
                    "Forgot password?"
                }
                button {
                    class: "link",
                    r#type: "button",
                    onclick: move |_| route.set(Route::Signup),
                    "Create an account"
                }
            }
        }
    }
}

fn login_failure(err: &ApiError) -> String {
    if err.is_network() {
        err.message.clone()
    } else {
        "Invalid username or password. Please try again.".to_string()
    }
}

#[component]
pub fn SignupView(
    route: Signal<Route>,
    workspace: Signal<Workspace>,
    notice: Signal<Option<String>>,
) -> Element {
    let mut route = route;
    let mut notice = notice;
    let full_name = use_signal(String::new);
    let username = use_signal(String::new);
    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let mut errors = use_signal(FormErrors::default);
    let mut submitting = use_signal(|| false);
    let mut failure = use_signal(|| Option::<String>::None);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let form = SignupForm {
            full_name: full_name(),
            username: username(),
            email: email(),
            password: password(),
        };
        if let Err(found) = form.validate() {
            errors.set(found);
            return;
        }
        errors.set(FormErrors::default());
        failure.set(None);
        submitting.set(true);

        let api = Arc::clone(workspace.read().api());
        spawn(async move {
            match api.register(form.to_request()).await {
                Ok(user) => {
                    tracing::info!(user = %user.username, "account created");
                    notice.set(Some(SIGNUP_NOTICE.to_string()));
                    route.set(Route::Login);
                }
                Err(err) => failure.set(Some(err.message)),
            }
            submitting.set(false);
        });
    };

    let field_errors = errors();

    rsx! {
        AuthFrame { title: "Create an account",
            if let Some(message) = failure() {
                div { class: "banner error", role: "alert", "{message}" }
            }
            form { class: "auth-form", onsubmit: on_submit,
                TextField {
                    name: "full_name",
                    label: "Full name",
                    value: full_name,
                    error: field_errors.for_field("full_name"),
                }
                TextField {
                    name: "username",
                    label: "Username",
                    value: username,
                    error: field_errors.for_field("username"),
                }
                TextField {
                    name: "email",
                    label: "Email",
                    kind: "email",
                    value: email,
                    error: field_errors.for_field("email"),
                }
                TextField {
                    name: "password",
                    label: "Password",
                    kind: "password",
                    value: password,
                    error: field_errors.for_field("password"),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() { "Creating account…" } else { "Sign up" }
                }
            }
            div { class: "auth-footer",
                span { class: "text-muted", "Already have an account?" }
                button {
                    class: "link",
                    r#type: "button",
                    onclick: move |_| route.set(Route::Login),
                    "Log in"
                }
            }
        }
    }
}

/// No reset endpoint exists yet; the form only validates and confirms.
#[component]
pub fn ForgotPasswordView(route: Signal<Route>) -> Element {
    let mut route = route;
    let email = use_signal(String::new);
    let mut errors = use_signal(FormErrors::default);
    let mut sent = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let form = ForgotPasswordForm { email: email() };
        match form.validate() {
            Ok(()) => {
                errors.set(FormErrors::default());
                sent.set(true);
            }
            Err(found) => errors.set(found),
        }
    };

    let field_errors = errors();

    rsx! {
        AuthFrame { title: "Forgot password",
            if sent() {
                div { class: "banner success", role: "status",
                    "If an account exists for {email}, a reset link is on its way."
                }
            }
            form { class: "auth-form", onsubmit: on_submit,
                TextField {
                    name: "email",
                    label: "Email",
                    kind: "email",
                    value: email,
                    error: field_errors.for_field("email"),
                }
                button { class: "btn btn-primary", r#type: "submit", "Send reset link" }
            }
            div { class: "auth-footer",
                button {
                    class: "link",
                    r#type: "button",
                    onclick: move |_| route.set(Route::Login),
                    "Back to login"
                }
            }
        }
    }
}

#[component]
fn AuthFrame(title: &'static str, children: Element) -> Element {
    rsx! {
        div { class: "auth-wrapper",
            div { class: "auth-container",
                div { class: "auth-left",
                    h2 { "WELCOME!" }
                    p { "Ask questions about your documents." }
                }
                div { class: "auth-right",
                    h2 { "{title}" }
                    {children}
                }
            }
        }
    }
}

#[component]
fn TextField(
    name: &'static str,
    label: &'static str,
    #[props(default = "text")] kind: &'static str,
    value: Signal<String>,
    error: Option<&'static str>,
) -> Element {
    let mut value = value;
    rsx! {
        div { class: "field",
            label { r#for: "{name}", "{label}" }
            input {
                id: "{name}",
                name: "{name}",
                r#type: "{kind}",
                value: "{value}",
                aria_invalid: error.is_some().to_string(),
                oninput: move |evt: FormEvent| value.set(evt.value()),
            }
            if let Some(message) = error {
                div { class: "error-text", role: "alert", "{message}" }
            }
        }
    }
}
