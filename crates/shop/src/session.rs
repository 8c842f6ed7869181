//! Identity and authentication types.
//!
//! Identity is a two-state machine: `Guest` or `Authenticated`. It drives
//! which persisted snapshots the collections load from and whether remote
//! sync is attempted at all. The transitions themselves (login, restore,
//! logout, merge) live in [`crate::state`].

use thiserror::Error;

use veda_core::{Email, EmailError};

use crate::api::ApiError;
use crate::api::types::UserProfile;
use crate::persist::keys;

/// Minimum password length accepted client-side.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Who the collections currently belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// No authenticated user; state lives under the guest snapshot keys.
    Guest,
    /// A logged-in user; state lives under per-user snapshot keys and
    /// mutations are pushed to the server.
    Authenticated(UserProfile),
}

impl Identity {
    /// The suffix used to derive this identity's snapshot keys.
    #[must_use]
    pub fn storage_suffix(&self) -> &str {
        match self {
            Self::Guest => keys::GUEST_SUFFIX,
            Self::Authenticated(user) => user.id.as_str(),
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// The authenticated profile, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Guest => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// Authentication failures surfaced to the caller.
///
/// Unlike collection mutations, login and registration return a result the
/// UI must branch on; `InvalidCredentials` carries a user-displayable
/// message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server rejected the credentials.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The email failed client-side validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The password failed client-side validation.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Registration hit an existing account.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// Any other API failure.
    #[error("API error: {0}")]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized(message) => {
                let message = if message.is_empty() {
                    "Invalid email or password".to_owned()
                } else {
                    message
                };
                Self::InvalidCredentials(message)
            }
            ApiError::Status { status: 409, .. } => Self::UserAlreadyExists,
            other => Self::Api(other),
        }
    }
}

/// Validate login/registration fields before any network call.
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<Email, AuthError> {
    let email = Email::parse(email)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(email)
}
