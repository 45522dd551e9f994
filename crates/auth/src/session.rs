//! Locally tracked session state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use warden_core::UserId;

use crate::Record;

/// The facade's notion of the current authenticated user.
///
/// Only established by a successful email login; cleared by logout.
#[derive(Debug, Clone)]
pub struct Session {
    user: Arc<dyn Record>,
    established_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: Arc<dyn Record>, established_at: DateTime<Utc>) -> Self {
        Self {
            user,
            established_at,
        }
    }

    pub fn user_id(&self) -> &UserId {
        self.user.id()
    }

    pub fn user_record(&self) -> &Arc<dyn Record> {
        &self.user
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }
}
