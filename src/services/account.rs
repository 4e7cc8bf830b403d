use thiserror::Error;

use crate::store::{StoreError, UserRecord, UserStore};

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("user already exists: {0}")]
    DuplicateUser(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RegisterError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyExists(id) => RegisterError::DuplicateUser(id),
            other => RegisterError::Store(other),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Signup<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub name: &'a str,
}

impl<'a> Signup<'a> {
    /// Trimmed id and display name, or the first rule the form breaks.
    /// Passwords are compared as typed.
    pub fn validate(&self) -> Result<(&'a str, &'a str), RegisterError> {
        let user_id = self.user_id.trim();
        let name = self.name.trim();
        if user_id.is_empty() {
            return Err(RegisterError::MissingField("userid"));
        }
        if self.password.is_empty() {
            return Err(RegisterError::MissingField("password"));
        }
        if name.is_empty() {
            return Err(RegisterError::MissingField("username"));
        }
        if self.password != self.password_confirm {
            return Err(RegisterError::PasswordMismatch);
        }
        Ok((user_id, name))
    }
}

/// Creates a fresh record with no coins, score or inventory.
pub async fn register(users: &UserStore, signup: Signup<'_>) -> Result<(), RegisterError> {
    let (user_id, name) = signup.validate()?;
    users
        .insert_new(user_id, UserRecord::new(signup.password, name))
        .await?;
    tracing::info!(user_id, "user registered");
    Ok(())
}

pub async fn login(users: &UserStore, user_id: &str, password: &str) -> bool {
    let accepted = users.authenticate(user_id.trim(), password).await;
    if accepted {
        tracing::info!(user_id, "login succeeded");
    } else {
        tracing::info!(user_id, "login rejected");
    }
    accepted
}
