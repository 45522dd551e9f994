//! In-memory backends for tests/dev.
//!
//! Not optimized for performance; state lives only as long as the value.

pub mod provider;
pub mod store;

pub use provider::InMemoryAuthProvider;
pub use store::{InMemoryRecord, InMemoryRecordStore};
