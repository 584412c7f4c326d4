use crate::routes::Route;
use dioxus::prelude::*;

const FEATURES: [(&str, &str); 3] = [
    (
        "Upload your PDFs",
        "Add documents to your library and ask questions about their content.",
    ),
    (
        "Comprehensive answers",
        "Combine what your documents say with broader knowledge in a single answer.",
    ),
    (
        "Keep the conversation",
        "Every chat stays in the sidebar and the full history can be exported.",
    ),
];

#[component]
pub fn LandingView(route: Signal<Route>) -> Element {
    let mut route = route;
    rsx! {
        div { class: "landing",
            header { class: "header no-divider",
                div { class: "header-content",
                    h1 { class: "wordmark", "DrQA" }
                    div { class: "hstack",
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| route.set(Route::Login),
                            "Log in"
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| route.set(Route::Signup),
                            "Sign up"
                        }
                    }
                }
            }
            section { class: "hero",
                h2 { "Ask your documents anything" }
                p { class: "text-muted",
                    "Upload a PDF, ask a question and get an answer grounded in what you uploaded."
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| route.set(Route::Signup),
                    "Get started"
                }
            }
            section { class: "feature-grid",
                for (title, description) in FEATURES {
                    div { key: "{title}", class: "feature-card",
                        h3 { "{title}" }
                        p { class: "text-muted", "{description}" }
                    }
                }
            }
        }
    }
}
