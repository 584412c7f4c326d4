pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod download;
pub mod landing;

pub use auth::{ForgotPasswordView, LoginView, SignupView};
pub use dashboard::DashboardView;
pub use download::DownloadView;
pub use landing::LandingView;
