//! `warden-auth` — authentication facade over pluggable backends.
//!
//! The facade validates input, delegates to an [`AuthProvider`] and a
//! [`RecordStore`], and tracks which user logged in by email. It never
//! inspects credentials.

pub mod config;
pub mod error;
pub mod facade;
pub mod memory;
pub mod permissions;
pub mod provider;
pub mod roles;
pub mod session;
pub mod storage;
pub mod user;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult, ProviderError, StorageError, ValidationError};
pub use facade::{AuthService, AuthServiceBuilder};
pub use permissions::Permission;
pub use provider::AuthProvider;
pub use roles::{Role, RoleGrant, RoleMap};
pub use session::Session;
pub use storage::{Record, RecordKind, RecordStore};
pub use user::{AuthedUser, NewUser};

pub use warden_core::{ConstructionError, UserId};
