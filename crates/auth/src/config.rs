//! Facade configuration.

use serde::Deserialize;

/// Environment variable toggling [`AuthConfig::require_roles`].
pub const REQUIRE_ROLES_ENV: &str = "WARDEN_REQUIRE_ROLES";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Reject `create_user` requests that carry no roles list.
    pub require_roles: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { require_roles: true }
    }
}

impl AuthConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(REQUIRE_ROLES_ENV) {
            match parse_flag(&raw) {
                Some(flag) => config.require_roles = flag,
                None => tracing::warn!(
                    "{REQUIRE_ROLES_ENV}={raw:?} is not a boolean; keeping require_roles={}",
                    config.require_roles
                ),
            }
        }
        config
    }

    pub fn with_require_roles(mut self, require_roles: bool) -> Self {
        self.require_roles = require_roles;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
