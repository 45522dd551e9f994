//! User-facing request/response shapes exchanged with the provider.

use serde::{Deserialize, Serialize};

use warden_core::UserId;

use crate::{Permission, Role};

/// Registration request forwarded to [`AuthProvider::create_user`](crate::AuthProvider::create_user).
///
/// Only `email`, `password` and (when roles are required) `roles` are checked by
/// the facade; everything else is passed through untouched.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    /// Never serialized; reads back as empty.
    #[serde(default, skip_serializing)]
    pub password: String,
    /// `None` means "not supplied"; an empty list is a valid (empty) role set.
    pub roles: Option<Vec<Role>>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    pub avatar_image_id: Option<String>,
    pub permission_id: Option<Permission>,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_role_ids<I, S>(mut self, role_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_ids = role_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_avatar_image_id(mut self, avatar_image_id: impl Into<String>) -> Self {
        self.avatar_image_id = Some(avatar_image_id.into());
        self
    }

    pub fn with_permission_id(mut self, permission_id: Permission) -> Self {
        self.permission_id = Some(permission_id);
        self
    }
}

// Hand-written so the password never reaches logs.
impl core::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .field("role_ids", &self.role_ids)
            .field("avatar_image_id", &self.avatar_image_id)
            .field("permission_id", &self.permission_id)
            .finish()
    }
}

/// The currently authenticated user, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthedUser {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_optional_fields() {
        let user = NewUser::new("a@b.com", "pw")
            .with_roles(["owner", "admin"])
            .with_role_ids(["r1"])
            .with_avatar_image_id("img-7")
            .with_permission_id(Permission::new("billing.read"));

        assert_eq!(user.roles, Some(vec![Role::new("owner"), Role::new("admin")]));
        assert_eq!(user.role_ids, vec!["r1".to_string()]);
        assert_eq!(user.avatar_image_id.as_deref(), Some("img-7"));
        assert_eq!(user.permission_id.as_ref().map(|p| p.as_str()), Some("billing.read"));
    }

    #[test]
    fn roles_default_to_absent() {
        assert!(NewUser::new("a@b.com", "pw").roles.is_none());
    }

    #[test]
    fn serialized_form_omits_password_and_reads_back() {
        let user = NewUser::new("a@b.com", "hunter2").with_roles(["owner"]);
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password").is_none());

        let restored: NewUser = serde_json::from_value(value).unwrap();
        assert_eq!(restored.email, "a@b.com");
        assert_eq!(restored.roles, Some(vec![Role::new("owner")]));
        assert!(restored.password.is_empty());
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", NewUser::new("a@b.com", "hunter2"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("a@b.com"));
    }
}
