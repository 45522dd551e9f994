use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use warden_core::UserId;

use crate::{AuthProvider, AuthedUser, NewUser, ProviderError, Role, RoleGrant, RoleMap};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password: String,
    roles: RoleMap,
}

#[derive(Debug, Default)]
struct ProviderState {
    accounts: HashMap<UserId, Account>,
    by_email: HashMap<String, UserId>,
    tokens: HashMap<String, UserId>,
    reset_tokens: HashMap<String, String>,
    current: Option<UserId>,
}

impl ProviderState {
    fn current_account(&self) -> Option<&Account> {
        self.current.as_ref().and_then(|id| self.accounts.get(id))
    }

    /// The authenticated account; a session pointing at a vanished account is an error.
    fn authed_account(&self) -> Result<&Account, ProviderError> {
        let current = self.current.as_ref().ok_or(ProviderError::NotAuthenticated)?;
        self.accounts
            .get(current)
            .ok_or_else(|| ProviderError::UnknownUser(current.to_string()))
    }
}

/// In-process authentication provider.
///
/// Passwords are compared as plain text; this is a test double, not a
/// credential store. Emails are matched case-insensitively.
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    state: RwLock<ProviderState>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` for [`AuthProvider::login_with_token`], authenticating as `user_id`.
    /// Fails with [`ProviderError::UnknownUser`] when `user_id` has no account.
    pub fn register_token(&self, token: impl Into<String>, user_id: UserId) -> Result<(), ProviderError> {
        let mut state = self.write()?;
        if !state.accounts.contains_key(&user_id) {
            return Err(ProviderError::UnknownUser(user_id.to_string()));
        }
        state.tokens.insert(token.into(), user_id);
        Ok(())
    }

    /// Add a role to an existing account.
    pub fn grant_role(&self, user_id: &UserId, role: Role) -> Result<(), ProviderError> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(user_id)
            .ok_or_else(|| ProviderError::UnknownUser(user_id.to_string()))?;
        account
            .roles
            .insert(role.clone(), RoleGrant::new(role, Utc::now()));
        Ok(())
    }

    /// The outstanding reset token for `email`, as it would have been mailed out.
    pub fn issued_reset_token(&self, email: &str) -> Option<String> {
        let state = self.state.read().ok()?;
        state.reset_tokens.get(&normalize_email(email)).cloned()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ProviderState>, ProviderError> {
        self.state
            .read()
            .map_err(|_| ProviderError::Other(anyhow::anyhow!("lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ProviderState>, ProviderError> {
        self.state
            .write()
            .map_err(|_| ProviderError::Other(anyhow::anyhow!("lock poisoned")))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn create_user(&self, user: &NewUser) -> Result<UserId, ProviderError> {
        let email = normalize_email(&user.email);
        let mut state = self.write()?;
        if state.by_email.contains_key(&email) {
            return Err(ProviderError::EmailTaken(user.email.clone()));
        }

        let now = Utc::now();
        let roles = user
            .roles
            .iter()
            .flatten()
            .map(|role| (role.clone(), RoleGrant::new(role.clone(), now)))
            .collect();

        let id = UserId::generate();
        state.by_email.insert(email.clone(), id.clone());
        state.accounts.insert(
            id.clone(),
            Account {
                id: id.clone(),
                email,
                password: user.password.clone(),
                roles,
            },
        );
        Ok(id)
    }

    async fn login_with_email(&self, email: &str, password: &str) -> Result<UserId, ProviderError> {
        let mut state = self.write()?;
        let id = state
            .by_email
            .get(&normalize_email(email))
            .filter(|id| state.accounts.get(*id).is_some_and(|a| a.password == password))
            .cloned()
            .ok_or(ProviderError::InvalidCredentials)?;
        state.current = Some(id.clone());
        Ok(id)
    }

    async fn login_with_token(&self, token: &str) -> Result<(), ProviderError> {
        let mut state = self.write()?;
        let id = state
            .tokens
            .get(token)
            .cloned()
            .ok_or(ProviderError::InvalidToken)?;
        state.current = Some(id);
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .map(|state| state.current.is_some())
            .unwrap_or(false)
    }

    async fn logout(&self) -> Result<bool, ProviderError> {
        Ok(self.write()?.current.take().is_some())
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), ProviderError> {
        let email = normalize_email(email);
        let mut state = self.write()?;
        if !state.by_email.contains_key(&email) {
            return Err(ProviderError::UnknownUser(email));
        }
        let token = Uuid::now_v7().simple().to_string();
        state.reset_tokens.insert(email, token);
        Ok(())
    }

    async fn reset_password(
        &self,
        email: &str,
        reset_token: &str,
        new_password: &str,
    ) -> Result<(), ProviderError> {
        let email = normalize_email(email);
        let mut state = self.write()?;
        if state.reset_tokens.get(&email).map(String::as_str) != Some(reset_token) {
            return Err(ProviderError::InvalidResetToken);
        }
        let id = state
            .by_email
            .get(&email)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownUser(email.clone()))?;
        if let Some(account) = state.accounts.get_mut(&id) {
            account.password = new_password.to_string();
        }
        state.reset_tokens.remove(&email);
        Ok(())
    }

    async fn authed_user(&self) -> Result<AuthedUser, ProviderError> {
        let state = self.read()?;
        let account = state.authed_account()?;
        Ok(AuthedUser {
            id: account.id.clone(),
            email: account.email.clone(),
            roles: account.roles.keys().cloned().collect(),
        })
    }

    async fn authed_user_has_role(&self, role: &Role) -> Result<(), ProviderError> {
        let state = self.read()?;
        match state.current_account() {
            Some(account) if account.roles.contains_key(role) => Ok(()),
            _ => Err(ProviderError::RoleNotHeld(role.clone())),
        }
    }

    async fn authed_user_roles(&self) -> Result<RoleMap, ProviderError> {
        let state = self.read()?;
        Ok(state.authed_account()?.roles.clone())
    }
}
