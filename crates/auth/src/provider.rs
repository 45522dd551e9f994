//! Authentication provider contract.

use std::sync::Arc;

use async_trait::async_trait;

use warden_core::UserId;

use crate::{AuthedUser, NewUser, ProviderError, Role, RoleMap};

/// Backend that owns credential verification and authentication state.
///
/// The facade never inspects credentials; it forwards them here and interprets
/// the outcome. Implementations decide how sessions are kept (remote tokens,
/// cookies, in-process state).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a user and return the identifier the provider assigned.
    async fn create_user(&self, user: &NewUser) -> Result<UserId, ProviderError>;

    async fn login_with_email(&self, email: &str, password: &str) -> Result<UserId, ProviderError>;

    async fn login_with_token(&self, token: &str) -> Result<(), ProviderError>;

    fn is_authenticated(&self) -> bool;

    /// End the provider session. Returns whether a session was actually ended;
    /// calling this while logged out must succeed with `false`.
    async fn logout(&self) -> Result<bool, ProviderError>;

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError>;

    async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError>;

    async fn authed_user(&self) -> Result<AuthedUser, ProviderError>;

    /// Resolves when the authenticated user holds `role`.
    ///
    /// "Not authenticated" and "role not held" must be reported the same way.
    async fn authed_user_has_role(&self, role: &Role) -> Result<(), ProviderError>;

    async fn authed_user_roles(&self) -> Result<RoleMap, ProviderError>;
}

#[async_trait]
impl<P> AuthProvider for Arc<P>
where
    P: AuthProvider + ?Sized,
{
    async fn create_user(&self, user: &NewUser) -> Result<UserId, ProviderError> {
        (**self).create_user(user).await
    }

    async fn login_with_email(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        (**self).login_with_email(email, password).await
    }

    async fn login_with_token(&self, token: &str) -> Result<(), ProviderError> {
        (**self).login_with_token(token).await
    }

    fn is_authenticated(&self) -> bool {
        (**self).is_authenticated()
    }

    async fn logout(&self) -> Result<bool, ProviderError> {
        (**self).logout().await
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        (**self).request_password_reset(email).await
    }

    async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        (**self).reset_password(email, reset_token, new_password).await
    }

    async fn authed_user(&self) -> Result<AuthedUser, ProviderError> {
        (**self).authed_user().await
    }

    async fn authed_user_has_role(&self, role: &Role) -> Result<(), ProviderError> {
        (**self).authed_user_has_role(role).await
    }

    async fn authed_user_roles(&self) -> Result<RoleMap, ProviderError> {
        (**self).authed_user_roles().await
    }
}
