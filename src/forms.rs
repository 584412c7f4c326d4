//! Client-side validation of the authentication forms.
//!
//! Errors found here are shown next to the field and never reach the API.

use crate::api::models::{UserCreate, UserLogin};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
#[error("form has {} invalid field(s)", .errors.len())]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    fn push(&mut self, field: &'static str, message: &'static str) {
        // First failing rule per field wins.
        if self.for_field(field).is_none() {
            self.errors.push(FieldError { field, message });
        }
    }

    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|err| err.field == field)
            .map(|err| err.message)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.push("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        } else if self.password.chars().count() < 6 {
            errors.push("password", "Password must be at least 6 characters");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> UserLogin {
        UserLogin {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignupForm {
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        let full_name = self.full_name.trim();
        match full_name.chars().count() {
            0 => errors.push("full_name", "Full name is required"),
            1 => errors.push("full_name", "Full name must be at least 2 characters"),
            n if n > 100 => errors.push("full_name", "Full name must be less than 100 characters"),
            _ => {}
        }

        let username = self.username.trim();
        match username.chars().count() {
            0 => errors.push("username", "Username is required"),
            1 | 2 => errors.push("username", "Username must be at least 3 characters"),
            n if n > 50 => errors.push("username", "Username must be less than 50 characters"),
            _ => {}
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.push(
                "username",
                "Username can only contain letters, numbers, and underscores",
            );
        }

        validate_email(&self.email, &mut errors);

        let password = &self.password;
        match password.chars().count() {
            0 => errors.push("password", "Password is required"),
            1..=5 => errors.push("password", "Password must be at least 6 characters"),
            n if n > 100 => errors.push("password", "Password must be less than 100 characters"),
            _ => {}
        }
        let has_lower = password.chars().any(|c| c.is_lowercase());
        let has_upper = password.chars().any(|c| c.is_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            errors.push(
                "password",
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            );
        }

        errors.into_result()
    }

    pub fn to_request(&self) -> UserCreate {
        let full_name = self.full_name.trim();
        UserCreate {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            full_name: (!full_name.is_empty()).then(|| full_name.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        validate_email(&self.email, &mut errors);
        errors.into_result()
    }
}

fn validate_email(email: &str, errors: &mut FormErrors) {
    let email = email.trim();
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.push("email", "Invalid email format");
    }
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && tld.len() >= 2
}
