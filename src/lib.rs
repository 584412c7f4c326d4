pub mod api;
pub mod chat;
pub mod config;
pub mod downloads;
pub mod events;
pub mod forms;
pub mod library;
pub mod render;
pub mod routes;
pub mod session;
pub mod types;
pub mod upload;
pub mod workspace;

#[cfg(feature = "ui")]
pub mod ui;
#[cfg(feature = "ui")]
pub mod views;

pub use api::{ApiClient, ApiError, DocumentBackend};
pub use config::ClientConfig;
pub use workspace::Workspace;
