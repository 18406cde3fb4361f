//! Service-level tests for the auth use cases
//!
//! Runs the real use cases against an in-memory store that honors the
//! repository contracts (uniqueness, single-record writes) and can be
//! told to fail specific operations, which is how the registration
//! rollback paths are exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use platform::clock::{Clock, ManualClock};
use platform::password::HashedPassword;

use crate::application::{
    GetUserInfoUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::{credential::Credential, profile::Profile};
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{AccountId, Email, LoginName, Role};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenIssuer;
use crate::AuthConfig;

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    credentials: Mutex<HashMap<AccountId, Credential>>,
    profiles: Mutex<HashMap<AccountId, Profile>>,
    fail_profile_insert: AtomicBool,
    fail_credential_delete: AtomicBool,
}

impl MemoryStore {
    fn credential_by_email(&self, email: &str) -> Option<Credential> {
        self.credentials
            .lock()
            .unwrap()
            .values()
            .find(|c| c.email.as_str() == email)
            .cloned()
    }

    fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    /// Simulate store corruption of a persisted hash
    fn tamper_password_hash(&self, email: &str) {
        let mut credentials = self.credentials.lock().unwrap();
        let credential = credentials
            .values_mut()
            .find(|c| c.email.as_str() == email)
            .expect("credential exists");
        credential.password_hash = HashedPassword::from_phc_string("corrupt-row");
    }
}

impl CredentialRepository for MemoryStore {
    async fn insert(&self, credential: &Credential) -> AuthResult<()> {
        let mut credentials = self.credentials.lock().unwrap();
        if credentials
            .values()
            .any(|c| c.login_name.canonical() == credential.login_name.canonical())
        {
            return Err(AuthError::DuplicateIdentity {
                field: "login_name",
            });
        }
        if credentials
            .values()
            .any(|c| c.email.as_str() == credential.email.as_str())
        {
            return Err(AuthError::DuplicateIdentity { field: "email" });
        }
        credentials.insert(credential.account_id, credential.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>> {
        Ok(self.credential_by_email(email.as_str()))
    }

    async fn find_by_login_name(&self, login_name: &LoginName) -> AuthResult<Option<Credential>> {
        Ok(self
            .credentials
            .lock()
            .unwrap()
            .values()
            .find(|c| c.login_name.canonical() == login_name.canonical())
            .cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Credential>> {
        Ok(self.credentials.lock().unwrap().get(account_id).cloned())
    }

    async fn update_counters(
        &self,
        account_id: &AccountId,
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> AuthResult<()> {
        let mut credentials = self.credentials.lock().unwrap();
        let credential = credentials
            .get_mut(account_id)
            .ok_or(AuthError::UserNotFound)?;
        credential.failed_attempts = failed_attempts;
        credential.locked_until = locked_until;
        credential.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AuthResult<()> {
        if self.fail_credential_delete.load(Ordering::SeqCst) {
            return Err(AuthError::Internal("store unavailable".into()));
        }
        self.credentials.lock().unwrap().remove(account_id);
        Ok(())
    }
}

impl ProfileRepository for MemoryStore {
    async fn insert(&self, profile: &Profile) -> AuthResult<()> {
        if self.fail_profile_insert.load(Ordering::SeqCst) {
            return Err(AuthError::Internal("store unavailable".into()));
        }
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.account_id) {
            return Err(AuthError::DuplicateIdentity {
                field: "account_id",
            });
        }
        profiles.insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn find_by_account_id(&self, account_id: &AccountId) -> AuthResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(account_id).cloned())
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    store: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
    register: RegisterUseCase<MemoryStore, MemoryStore>,
    login: LoginUseCase<MemoryStore>,
    user_info: GetUserInfoUseCase<MemoryStore, MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let tokens = Arc::new(TokenIssuer::new(
            &AuthConfig::with_random_secrets(),
            dyn_clock.clone(),
        ));

        Self {
            register: RegisterUseCase::new(store.clone(), store.clone(), dyn_clock.clone()),
            login: LoginUseCase::new(store.clone(), tokens, dyn_clock),
            user_info: GetUserInfoUseCase::new(store.clone(), store.clone()),
            store,
            clock,
        }
    }

    async fn register_alice(&self) -> String {
        self.register
            .execute(RegisterInput {
                login_name: "alice".into(),
                email: "a@x.com".into(),
                password: "sunset-harbor-42".into(),
            })
            .await
            .expect("registration succeeds")
            .identity
    }

    async fn login_alice(&self, password: &str) -> AuthResult<crate::LoginOutput> {
        self.login
            .execute(LoginInput {
                email: "a@x.com".into(),
                password: password.into(),
            })
            .await
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn register_creates_both_records() {
    let h = Harness::new();
    let identity = h.register_alice().await;

    let account_id: AccountId = identity.parse().unwrap();
    let credential = h.store.find_by_id(&account_id).await.unwrap().unwrap();
    assert_eq!(credential.login_name.original(), "alice");
    assert_eq!(credential.email.as_str(), "a@x.com");
    assert_eq!(credential.role, Role::User);
    assert_eq!(credential.failed_attempts, 0);

    let profile = h
        .store
        .find_by_account_id(&account_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.display_name, "alice");
}

#[tokio::test]
async fn register_rejects_duplicate_login_name_before_any_write() {
    let h = Harness::new();
    h.register_alice().await;

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "alice".into(),
            email: "b@y.com".into(),
            password: "different-pass-77".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthError::DuplicateIdentity {
            field: "login_name"
        }
    ));
    // The second call must not have created any profile record
    assert_eq!(h.store.profile_count(), 1);
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let h = Harness::new();
    h.register_alice().await;

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "bob_2".into(),
            email: "A@X.com".into(), // case-normalized match
            password: "different-pass-77".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthError::DuplicateIdentity { field: "email" }
    ));
}

#[tokio::test]
async fn profile_failure_rolls_back_credential() {
    let h = Harness::new();
    h.store.fail_profile_insert.store(true, Ordering::SeqCst);

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "alice".into(),
            email: "a@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::ProfileCreationFailed));
    // Rollback verified: the credential no longer exists
    assert!(h.store.credential_by_email("a@x.com").is_none());
    assert_eq!(h.store.profile_count(), 0);
}

#[tokio::test]
async fn failed_rollback_is_escalated_not_swallowed() {
    let h = Harness::new();
    h.store.fail_profile_insert.store(true, Ordering::SeqCst);
    h.store.fail_credential_delete.store(true, Ordering::SeqCst);

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "alice".into(),
            email: "a@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap_err();

    let orphan = h.store.credential_by_email("a@x.com").expect("orphan left");
    match err {
        AuthError::RollbackFailed { identity } => {
            assert_eq!(identity, orphan.account_id.to_string());
        }
        other => panic!("expected RollbackFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn register_validates_input() {
    let h = Harness::new();

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "al".into(), // too short
            email: "a@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));

    let err = h
        .register
        .execute(RegisterInput {
            login_name: "alice".into(),
            email: "not-an-email".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

// ============================================================================
// Login and lockout
// ============================================================================

#[tokio::test]
async fn login_returns_identity_and_both_tokens() {
    let h = Harness::new();
    let identity = h.register_alice().await;

    let out = h.login_alice("sunset-harbor-42").await.unwrap();
    assert_eq!(out.identity, identity);
    assert_eq!(out.login_name, "alice");
    assert_eq!(out.email, "a@x.com");
    assert_eq!(out.role, Role::User);
    assert!(!out.access_token.is_empty());
    assert!(!out.refresh_token.is_empty());
    assert_ne!(out.access_token, out.refresh_token);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let h = Harness::new();
    h.register_alice().await;

    let unknown = h
        .login
        .execute(LoginInput {
            email: "nobody@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap_err();
    let wrong = h.login_alice("wrong-password-99").await.unwrap_err();

    assert!(matches!(unknown, AuthError::InvalidCredentials));
    assert!(matches!(wrong, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn wrong_password_increments_counter_by_one() {
    let h = Harness::new();
    h.register_alice().await;

    for expected in 1..=3u32 {
        let err = h.login_alice("wrong-password-99").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let credential = h.store.credential_by_email("a@x.com").unwrap();
        assert_eq!(credential.failed_attempts, expected);
        assert!(credential.locked_until.is_none());
    }
}

#[tokio::test]
async fn policy_invalid_password_still_consumes_lockout_budget() {
    let h = Harness::new();
    h.register_alice().await;

    // Too short to ever have been registered, but still a wrong guess
    let err = h.login_alice("nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    let credential = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(credential.failed_attempts, 1);

    // Five such guesses lock the account like any other failures
    for _ in 0..3 {
        let _ = h.login_alice("nope").await;
    }
    let err = h.login_alice("nope").await.unwrap_err();
    assert!(matches!(err, AuthError::AccountLocked { .. }));
}

#[tokio::test]
async fn fifth_failure_locks_for_thirty_minutes() {
    let h = Harness::new();
    h.register_alice().await;

    for _ in 0..4 {
        let err = h.login_alice("wrong-password-99").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    let err = h.login_alice("wrong-password-99").await.unwrap_err();
    match err {
        AuthError::AccountLocked { retry_after_secs } => {
            assert_eq!(retry_after_secs, 1800);
        }
        other => panic!("expected AccountLocked, got {other:?}"),
    }

    let credential = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(
        credential.locked_until,
        Some(h.clock.now() + Duration::minutes(30))
    );
}

#[tokio::test]
async fn locked_account_rejects_even_the_correct_password() {
    let h = Harness::new();
    h.register_alice().await;

    for _ in 0..5 {
        let _ = h.login_alice("wrong-password-99").await;
    }
    let before = h.store.credential_by_email("a@x.com").unwrap();

    h.clock.advance(Duration::minutes(10));
    let err = h.login_alice("sunset-harbor-42").await.unwrap_err();
    match err {
        AuthError::AccountLocked { retry_after_secs } => {
            // 20 minutes remain
            assert_eq!(retry_after_secs, 1200);
        }
        other => panic!("expected AccountLocked, got {other:?}"),
    }

    // The refused attempt must not touch the persisted state
    let after = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(after.failed_attempts, before.failed_attempts);
    assert_eq!(after.locked_until, before.locked_until);
}

#[tokio::test]
async fn lock_expires_lazily_and_success_resets_state() {
    let h = Harness::new();
    h.register_alice().await;

    for _ in 0..5 {
        let _ = h.login_alice("wrong-password-99").await;
    }

    // Past the lock window: no clearing write happened, expiry is lazy
    h.clock.advance(Duration::minutes(30) + Duration::seconds(1));
    let out = h.login_alice("sunset-harbor-42").await;
    assert!(out.is_ok());

    let credential = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(credential.failed_attempts, 0);
    assert!(credential.locked_until.is_none());
}

#[tokio::test]
async fn success_resets_partial_failure_count() {
    let h = Harness::new();
    h.register_alice().await;

    for _ in 0..3 {
        let _ = h.login_alice("wrong-password-99").await;
    }
    h.login_alice("sunset-harbor-42").await.unwrap();

    let credential = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(credential.failed_attempts, 0);
}

#[tokio::test]
async fn malformed_stored_hash_is_not_a_wrong_password() {
    let h = Harness::new();
    h.register_alice().await;
    h.store.tamper_password_hash("a@x.com");

    let err = h.login_alice("sunset-harbor-42").await.unwrap_err();
    assert!(matches!(err, AuthError::HashVerification));

    // Corruption must not count as a failed attempt
    let credential = h.store.credential_by_email("a@x.com").unwrap();
    assert_eq!(credential.failed_attempts, 0);
}

// ============================================================================
// Tokens through the login path
// ============================================================================

#[tokio::test]
async fn issued_tokens_verify_with_matching_class_only() {
    let store = Arc::new(MemoryStore::default());
    let clock: Arc<dyn Clock> = Arc::new(ManualClock::starting_at(Utc::now()));
    let tokens = Arc::new(TokenIssuer::new(
        &AuthConfig::with_random_secrets(),
        clock.clone(),
    ));
    let register = RegisterUseCase::new(store.clone(), store.clone(), clock.clone());
    let login = LoginUseCase::new(store.clone(), tokens.clone(), clock);

    register
        .execute(RegisterInput {
            login_name: "alice".into(),
            email: "a@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap();
    let out = login
        .execute(LoginInput {
            email: "a@x.com".into(),
            password: "sunset-harbor-42".into(),
        })
        .await
        .unwrap();

    let claims = tokens.verify_access(&out.access_token).unwrap();
    assert_eq!(claims.sub, out.identity);
    assert_eq!(claims.name, "alice");

    let claims = tokens.verify_refresh(&out.refresh_token).unwrap();
    assert_eq!(claims.sub, out.identity);

    // A refresh token is not an access token, and vice versa
    assert!(matches!(
        tokens.verify_access(&out.refresh_token),
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        tokens.verify_refresh(&out.access_token),
        Err(AuthError::InvalidToken)
    ));
}

// ============================================================================
// User info
// ============================================================================

#[tokio::test]
async fn user_info_returns_credential_summary_and_profile() {
    let h = Harness::new();
    let identity = h.register_alice().await;
    let account_id: AccountId = identity.parse().unwrap();

    let info = h.user_info.execute(&account_id).await.unwrap();
    assert_eq!(info.identity, identity);
    assert_eq!(info.login_name, "alice");
    assert_eq!(info.email, "a@x.com");
    assert_eq!(info.role, Role::User);
    assert_eq!(info.profile.unwrap().display_name, "alice");
}

#[tokio::test]
async fn user_info_for_unknown_identity_is_not_found() {
    let h = Harness::new();
    let err = h.user_info.execute(&AccountId::new()).await.unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}
