use std::fmt;

/// Navigation targets of the app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Signup,
    ForgotPassword,
    Dashboard,
    /// Authenticated workspace; renders the same view as `Dashboard`.
    Workspace,
    Download { filename: String },
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/forgot-password" => Route::ForgotPassword,
            "/dashboard" => Route::Dashboard,
            "/app" => Route::Workspace,
            other => {
                let filename = other.strip_prefix("/download/")?;
                if filename.is_empty() || filename.contains('/') {
                    return None;
                }
                Route::Download {
                    filename: filename.to_string(),
                }
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Workspace => "/app".to_string(),
            Route::Download { filename } => format!("/download/{filename}"),
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Workspace | Route::Download { .. }
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
