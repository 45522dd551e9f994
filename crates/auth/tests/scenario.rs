//! End-to-end flow against the in-memory backends.

use std::sync::Arc;

use serde_json::json;
use warden_auth::memory::{InMemoryAuthProvider, InMemoryRecordStore};
use warden_auth::{AuthError, AuthService, NewUser, ProviderError, RecordKind, Role};

struct Harness {
    auth: AuthService,
    provider: Arc<InMemoryAuthProvider>,
    store: InMemoryRecordStore,
}

impl Harness {
    fn new() -> Self {
        warden_observability::init();

        let provider = Arc::new(InMemoryAuthProvider::new());
        let store = InMemoryRecordStore::new();
        let auth = AuthService::builder()
            .shared_provider(provider.clone())
            .storage(store.clone())
            .build()
            .expect("both collaborators supplied");

        Self {
            auth,
            provider,
            store,
        }
    }
}

#[tokio::test]
async fn user_lifecycle() {
    let Harness {
        auth,
        provider,
        store,
    } = Harness::new();
    let email = "test@user.com";
    let password = "first-password";
    let new_password = "newPassword1";

    let record = auth
        .create_user(&NewUser::new(email, password).with_roles(["owner"]))
        .await
        .unwrap();
    assert_eq!(store.get(RecordKind::User, record.id()), Some(json!({})));
    assert!(!auth.is_authenticated());

    auth.login_with_email(email, password).await.unwrap();
    assert!(auth.is_authenticated());
    assert_eq!(auth.user_id().as_ref(), Some(record.id()));
    auth.authed_user_has_role(&Role::new("owner")).await.unwrap();

    auth.set_role(&Role::new("owner")).await.unwrap();
    assert_eq!(
        store.get(RecordKind::Role, record.id()),
        Some(json!({"role": "owner"}))
    );

    auth.logout().await.unwrap();
    assert!(!auth.is_authenticated());
    assert!(auth.user_id().is_none());

    auth.request_password_reset(email).await.unwrap();
    let reset_token = provider.issued_reset_token(email).unwrap();
    auth.reset_password(email, &reset_token, new_password)
        .await
        .unwrap();
    assert!(!auth.is_authenticated(), "reset does not log in");

    let err = auth.login_with_email(email, password).await.unwrap_err();
    assert!(matches!(err, AuthError::Provider(ProviderError::InvalidCredentials)));
    auth.login_with_email(email, new_password).await.unwrap();
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn robots_log_in_with_tokens() {
    let Harness { auth, provider, .. } = Harness::new();

    let record = auth
        .create_user(&NewUser::new("robot@user.com", "unused").with_roles(["cat", "boat"]))
        .await
        .unwrap();
    provider
        .register_token("robot-secret", record.id().clone())
        .unwrap();

    auth.logout().await.unwrap();
    assert!(!auth.is_authenticated());

    auth.login_with_token("robot-secret").await.unwrap();
    assert!(auth.is_authenticated());
    assert!(auth.user_id().is_none(), "token sessions stay with the provider");

    let roles = auth.authed_user_roles().await.unwrap();
    assert!(roles.contains_key(&Role::new("cat")));
    assert!(roles.contains_key(&Role::new("boat")));
    assert!(roles.get(&Role::new("dog")).is_none());

    let user = auth.authed_user().await.unwrap();
    assert_eq!(&user.id, record.id());
    assert_eq!(user.email, "robot@user.com");

    let err = auth.set_role(&Role::new("cat")).await.unwrap_err();
    assert_eq!(err.to_string(), "Cannot set role before logging in");
}

#[tokio::test]
async fn role_checks_reject_when_logged_out() {
    let Harness { auth, .. } = Harness::new();
    auth.create_user(&NewUser::new("ada@user.com", "pw").with_roles(["x"]))
        .await
        .unwrap();

    assert!(auth.authed_user_has_role(&Role::new("x")).await.is_err());
    assert!(matches!(
        auth.authed_user_roles().await,
        Err(AuthError::Provider(ProviderError::NotAuthenticated))
    ));

    auth.login_with_email("ada@user.com", "pw").await.unwrap();
    auth.authed_user_has_role(&Role::new("x")).await.unwrap();
    assert!(auth.authed_user_has_role(&Role::new("y")).await.is_err());
}
