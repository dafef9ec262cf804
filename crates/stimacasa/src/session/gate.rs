use tracing::{info, warn};

use super::identity::{Identity, Role};
use super::storage::{SessionStorage, StorageError};

/// Fixed storage key holding the serialized identity.
pub const IDENTITY_KEY: &str = "user";

/// Where denied callers are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Grant access iff an identity is present and carries exactly the required role.
pub fn can_access(required: Role, identity: Option<&Identity>) -> bool {
    identity.and_then(|identity| identity.role) == Some(required)
}

/// Guard refusal; the caller redirects to [`LOGIN_ROUTE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("access requires the {required} role, redirect to {LOGIN_ROUTE}")]
pub struct AccessDenied {
    pub required: Role,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("could not serialize identity: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Authenticated identity for one client session, mirrored into durable storage.
///
/// Built once with [`SessionGate::init`] and passed explicitly to every guarded view.
#[derive(Debug)]
pub struct SessionGate<S> {
    storage: S,
    identity: Option<Identity>,
}

impl<S: SessionStorage> SessionGate<S> {
    /// Hydrate from storage; an unreadable stored identity is dropped and treated as absent.
    pub fn init(storage: S) -> Result<Self, StorageError> {
        let identity = match storage.get(IDENTITY_KEY)? {
            None => None,
            Some(raw) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    warn!(error = %err, "discarding malformed persisted identity");
                    storage.remove(IDENTITY_KEY)?;
                    None
                }
            },
        };
        Ok(Self { storage, identity })
    }

    pub fn login(&mut self, identity: Identity) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&identity)?;
        self.storage.set(IDENTITY_KEY, &raw)?;
        info!(user = %identity.name, role = ?identity.role, "session started");
        self.identity = Some(identity);
        Ok(())
    }

    /// Clear both the in-memory and the persisted identity.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.identity = None;
        self.storage.remove(IDENTITY_KEY)?;
        info!("session cleared");
        Ok(())
    }

    pub fn current(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn authorize(&self, required: Role) -> Result<&Identity, AccessDenied> {
        match self.identity.as_ref() {
            Some(identity) if can_access(required, Some(identity)) => Ok(identity),
            _ => Err(AccessDenied { required }),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
