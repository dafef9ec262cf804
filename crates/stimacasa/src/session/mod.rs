//! Authenticated identity, its durable mirror, and the role guard for back-office views.

pub mod auth;
pub mod gate;
pub mod identity;
pub mod storage;

pub use auth::{authenticate, AuthError};
pub use gate::{can_access, AccessDenied, SessionError, SessionGate, IDENTITY_KEY, LOGIN_ROUTE};
pub use identity::{Identity, Role};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
