//! Account creation and credential checks on top of the `UserStore` port.

use serde::Deserialize;
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::UserStore;
use crate::validation::{FieldIssue, Issues};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Raw signup/login body.
#[derive(Default, Deserialize)]
pub struct CredentialsInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated credentials. The email is trimmed and lower-cased.
/// No `Debug` impl so the password cannot end up in a log line.
pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

impl Credentials {
    pub fn try_from_input(input: CredentialsInput) -> Result<Self, Vec<FieldIssue>> {
        let mut issues = Issues::new();

        let email = normalize_email(input.email.as_deref().unwrap_or_default());
        if !is_plausible_email(&email) {
            issues.push("email", "must be a valid email address");
        }

        let password = input.password.unwrap_or_default();
        if password.chars().count() < MIN_PASSWORD_LEN {
            issues.push(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        issues.finish(Credentials { email, password })
    }
}

pub async fn create_account(
    store: &dyn UserStore,
    credentials: Credentials,
    bcrypt_cost: u32,
) -> Result<User, AppError> {
    if store.find_by_email(&credentials.email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(credentials.password, bcrypt_cost).await?;
    // The unique index still guards against a concurrent signup slipping past the check above.
    store.insert_user(&credentials.email, &password_hash).await
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(store: &dyn UserStore, credentials: Credentials) -> Result<User, AppError> {
    let Some(user) = store.find_by_email(&credentials.email).await? else {
        info!("Login failed: unknown account");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(credentials.password, user.password_hash.clone()).await? {
        info!("Login failed for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}
