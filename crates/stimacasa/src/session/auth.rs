use tracing::info;

use super::identity::{Identity, Role};
use crate::api::{ApiClient, ApiError, LoginResponse};

const DEFAULT_REJECTION: &str = "Credenziali non valide";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } if status == 401 || status == 403 => {
                AuthError::InvalidCredentials(message)
            }
            other => AuthError::Api(other),
        }
    }
}

/// Exchange credentials for an [`Identity`] through `POST /auth/login`.
///
/// The caller decides whether to keep the identity (see `SessionGate::login`).
pub async fn authenticate(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<Identity, AuthError> {
    let response = client.login(email.trim(), password).await?;
    let identity = identity_from_login(email.trim(), response)?;
    info!(user = %identity.name, role = ?identity.role, "login accepted");
    Ok(identity)
}

pub(crate) fn identity_from_login(
    email: &str,
    response: LoginResponse,
) -> Result<Identity, AuthError> {
    if !response.success {
        let message = response
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
        return Err(AuthError::InvalidCredentials(message));
    }

    let username = if response.username.trim().is_empty() {
        email.to_string()
    } else {
        response.username
    };

    Ok(Identity {
        id: username.clone(),
        name: username,
        email: email.to_string(),
        role: Role::from_backend(&response.roles),
    })
}
