//! `warden-core` — shared primitives for the authentication facade.
//!
//! This crate has no knowledge of providers or storage backends.

pub mod error;
pub mod id;

pub use error::{ConstructionError, ConstructionResult};
pub use id::UserId;
