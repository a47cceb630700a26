use serde::Serialize;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    required(email, "Email")?;
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail);
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn validate_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    required(password, "Password")?;
    required(confirm, "Password confirmation")?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort { min: MIN_PASSWORD_LEN });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        required(&self.password, "Password")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "Name")?;
        validate_email(&self.email)?;
        validate_new_password(&self.password, &self.confirm_password)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.token, "Reset token")?;
        validate_new_password(&self.password, &self.confirm_password)
    }
}
