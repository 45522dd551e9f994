//! The authentication facade.
//!
//! [`AuthService`] validates arguments, forwards each call to the injected
//! [`AuthProvider`] and, where a record is involved, chains a single
//! [`RecordStore`] write. The only state it owns is the local [`Session`],
//! which is set by a successful email login and cleared by logout.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde_json::{Value as JsonValue, json};
use tracing::instrument;

use warden_core::{ConstructionError, ConstructionResult, UserId};

use crate::{
    AuthConfig, AuthError, AuthProvider, AuthResult, AuthedUser, NewUser, Record, RecordKind,
    RecordStore, Role, RoleMap, Session, ValidationError,
};

/// Facade over an authentication provider and a record store.
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    storage: Arc<dyn RecordStore>,
    config: AuthConfig,
    session: RwLock<Option<Session>>,
}

impl core::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .field("session", &*self.session_read())
            .finish_non_exhaustive()
    }
}

/// Collects the facade's collaborators; [`build`](Self::build) checks that
/// every required one was supplied.
#[derive(Default)]
pub struct AuthServiceBuilder {
    provider: Option<Arc<dyn AuthProvider>>,
    storage: Option<Arc<dyn RecordStore>>,
    config: Option<AuthConfig>,
}

impl AuthServiceBuilder {
    pub fn provider<P>(mut self, provider: P) -> Self
    where
        P: AuthProvider + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    pub fn shared_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn storage<S>(mut self, storage: S) -> Self
    where
        S: RecordStore + 'static,
    {
        self.storage = Some(Arc::new(storage));
        self
    }

    pub fn shared_storage(mut self, storage: Arc<dyn RecordStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn config(mut self, config: AuthConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> ConstructionResult<AuthService> {
        let provider = self.provider.ok_or(ConstructionError::MissingProvider)?;
        let storage = self.storage.ok_or(ConstructionError::MissingStorage)?;
        Ok(AuthService::from_parts(
            provider,
            storage,
            self.config.unwrap_or_default(),
        ))
    }
}

impl AuthService {
    pub fn builder() -> AuthServiceBuilder {
        AuthServiceBuilder::default()
    }

    /// Wire a facade with the default configuration.
    pub fn new<P, S>(provider: P, storage: S) -> Self
    where
        P: AuthProvider + 'static,
        S: RecordStore + 'static,
    {
        Self::from_parts(Arc::new(provider), Arc::new(storage), AuthConfig::default())
    }

    fn from_parts(
        provider: Arc<dyn AuthProvider>,
        storage: Arc<dyn RecordStore>,
        config: AuthConfig,
    ) -> Self {
        Self {
            provider,
            storage,
            config,
            session: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Register a user and persist an empty `"user"` record under the
    /// provider-assigned id. Does not log the user in.
    #[instrument(skip_all)]
    pub async fn create_user(&self, user: &NewUser) -> AuthResult<Arc<dyn Record>> {
        require(&user.email, ValidationError::EmailRequired)?;
        require(&user.password, ValidationError::PasswordRequired)?;
        if self.config.require_roles && user.roles.is_none() {
            return Err(rejected(ValidationError::RolesRequired));
        }

        let id = delegated("create_user", self.provider.create_user(user).await)?;
        let record = self.storage.create_record(RecordKind::User, &id);
        delegated("create_user", record.update(json!({})).await)?;

        tracing::info!(user_id = %id, "user created");
        Ok(record)
    }

    /// Authenticate with email and password; on success the returned user
    /// record becomes the local session.
    #[instrument(skip_all)]
    pub async fn login_with_email(&self, email: &str, password: &str) -> AuthResult<Arc<dyn Record>> {
        require(email, ValidationError::EmailRequired)?;
        require(password, ValidationError::PasswordRequired)?;

        let id = delegated(
            "login_with_email",
            self.provider.login_with_email(email, password).await,
        )?;
        let record = self.storage.create_record(RecordKind::User, &id);

        // Last completed login wins.
        *self.session_write() = Some(Session::new(Arc::clone(&record), Utc::now()));
        tracing::info!(user_id = %id, "session established");
        Ok(record)
    }

    /// Authenticate with a token. Session truth stays with the provider; the
    /// local session is left untouched.
    #[instrument(skip_all)]
    pub async fn login_with_token(&self, token: &str) -> AuthResult<()> {
        require(token, ValidationError::TokenRequired)?;
        delegated("login_with_token", self.provider.login_with_token(token).await)
    }

    pub fn is_authenticated(&self) -> bool {
        self.provider.is_authenticated()
    }

    /// Clear the local session and end the provider session.
    ///
    /// Safe to call repeatedly; returns the provider's report of whether a
    /// session was ended.
    #[instrument(skip_all)]
    pub async fn logout(&self) -> AuthResult<bool> {
        if let Some(session) = self.session_write().take() {
            tracing::info!(user_id = %session.user_id(), "session cleared");
        }
        delegated("logout", self.provider.logout().await)
    }

    #[instrument(skip_all)]
    pub async fn request_password_reset(&self, email: &str) -> AuthResult<()> {
        require(email, ValidationError::EmailRequired)?;
        delegated(
            "request_password_reset",
            self.provider.request_password_reset(email).await,
        )
    }

    /// Set a new password using a reset token. The caller must log in again
    /// afterwards; this does not touch any session.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        require(email, ValidationError::EmailRequired)?;
        require(reset_token, ValidationError::ResetTokenRequired)?;
        require(new_password, ValidationError::PasswordRequired)?;
        delegated(
            "reset_password",
            self.provider
                .reset_password(email, reset_token, new_password)
                .await,
        )
    }

    /// Identifier of the locally tracked user, if any. Never consults the provider.
    pub fn user_id(&self) -> Option<UserId> {
        self.session_read()
            .as_ref()
            .map(|session| session.user_id().clone())
    }

    /// Snapshot of the local session.
    pub fn session(&self) -> Option<Session> {
        self.session_read().clone()
    }

    /// Write a `"role"` record for the locally tracked user.
    #[instrument(skip_all, fields(role = %role))]
    pub async fn set_role(&self, role: &Role) -> AuthResult<()> {
        let user_id = self.user_id().ok_or_else(|| {
            tracing::debug!("set_role without a session");
            AuthError::requires_authentication("Cannot set role before logging in")
        })?;

        let record = self.storage.create_record(RecordKind::Role, &user_id);
        delegated("set_role", record.update(json!({ "role": role })).await)?;
        tracing::info!(user_id = %user_id, "role recorded");
        Ok(())
    }

    /// Load the payload of the locally tracked user's record.
    #[instrument(skip_all)]
    pub async fn load_user_record(&self) -> AuthResult<JsonValue> {
        let record = self
            .session_read()
            .as_ref()
            .map(|session| Arc::clone(session.user_record()))
            .ok_or_else(|| AuthError::requires_authentication("Cannot load user before logging in"))?;
        delegated("load_user_record", record.load().await)
    }

    #[instrument(skip_all)]
    pub async fn authed_user(&self) -> AuthResult<AuthedUser> {
        delegated("authed_user", self.provider.authed_user().await)
    }

    /// Resolves when the provider reports the authenticated user holds `role`.
    /// Rejects both when the role is missing and when nobody is authenticated.
    #[instrument(skip_all, fields(role = %role))]
    pub async fn authed_user_has_role(&self, role: &Role) -> AuthResult<()> {
        delegated(
            "authed_user_has_role",
            self.provider.authed_user_has_role(role).await,
        )
    }

    #[instrument(skip_all)]
    pub async fn authed_user_roles(&self) -> AuthResult<RoleMap> {
        delegated("authed_user_roles", self.provider.authed_user_roles().await)
    }

    // The session is plain data, so a poisoned lock is still usable.
    fn session_read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.session.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// Only empty text counts as missing; credentials are never inspected.
fn require(value: &str, missing: ValidationError) -> AuthResult<()> {
    if value.is_empty() {
        Err(rejected(missing))
    } else {
        Ok(())
    }
}

fn rejected(err: ValidationError) -> AuthError {
    tracing::debug!(error = %err, "rejected before delegation");
    err.into()
}

fn delegated<T, E>(operation: &'static str, result: Result<T, E>) -> AuthResult<T>
where
    E: Into<AuthError> + core::fmt::Display,
{
    result.map_err(|err| {
        tracing::warn!(operation, error = %err, "delegated call failed");
        err.into()
    })
}
