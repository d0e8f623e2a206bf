//! Integration tests for session-bound authentication with the real JWT
//! signer, session manager and in-memory store.

use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tollgate_auth::{
    AuthError, AuthErrorKind, Authenticator, BasicAuthenticator, SessionAuthenticator,
};
use tollgate_session::{
    MemoryStore, SessionConfig, SessionManager, SessionRecord, SessionStore,
};
use tollgate_token::{JwtSigner, SigningAlgorithm, Token, USER_ID_CLAIM, UserId};

// =========================================================================
// Helpers
// =========================================================================

type Auth = SessionAuthenticator<BasicAuthenticator<JwtSigner>, SessionManager<Arc<MemoryStore>>>;

fn basic() -> BasicAuthenticator<JwtSigner> {
    BasicAuthenticator::new(JwtSigner::from_secret(b"secret", SigningAlgorithm::HS256))
}

/// Builds the full stack over `store` with the given cap.
fn auth_over(store: Arc<MemoryStore>, max: Option<usize>) -> Auth {
    let config = SessionConfig {
        max_sessions_per_user: max.and_then(NonZeroUsize::new),
    };
    SessionAuthenticator::new(basic(), SessionManager::with_config(store, &config))
}

fn user() -> UserId {
    UserId::from("#01")
}

fn in_one_hour() -> DateTime<Utc> {
    // Whole seconds, matching what survives the JWT round trip.
    DateTime::from_timestamp((Utc::now() + Duration::hours(1)).timestamp(), 0).unwrap()
}

fn live_records(n: usize) -> Vec<SessionRecord> {
    (0..n)
        .map(|i| SessionRecord::new(format!("existing-{i}"), Utc::now() + Duration::days(1)))
        .collect()
}

// =========================================================================
// Issuing
// =========================================================================

#[tokio::test]
async fn test_first_issue_for_user_stores_one_record() {
    let store = Arc::new(MemoryStore::new());
    let auth = auth_over(Arc::clone(&store), Some(5));
    let expire = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let token = Token::new("token_id", expire).with_claim(USER_ID_CLAIM, "#01");

    let sign = auth.generate_sign(&token).await.expect("issue should succeed");

    assert!(!sign.is_empty());
    assert_eq!(
        store.get(&user()).await.unwrap(),
        vec![SessionRecord::new("token_id", expire)]
    );
}

#[tokio::test]
async fn test_sixth_issue_with_five_live_sessions_is_refused() {
    let existing = live_records(5);
    let store = Arc::new(MemoryStore::with_sessions([(user(), existing.clone())]));
    let auth = auth_over(Arc::clone(&store), Some(5));

    let result = auth.generate_sign(&Token::issue(&user(), Duration::hours(1))).await;

    let err = result.expect_err("sixth session must be refused");
    assert!(
        matches!(err, AuthError::MaxSessionsReached { live: 5, .. }),
        "got {err:?}"
    );
    assert!(err.to_string().contains('5'));
    assert_eq!(store.get(&user()).await.unwrap(), existing, "store must be untouched");
}

#[tokio::test]
async fn test_issue_without_user_id_is_internal_and_registers_nothing() {
    let store = Arc::new(MemoryStore::new());
    let auth = auth_over(Arc::clone(&store), None);
    let token = Token::new("token_id", in_one_hour());

    let err = auth.generate_sign(&token).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Internal);
    assert!(err.to_string().contains("user id missing"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_issue_prunes_expired_sessions() {
    let stale = vec![
        SessionRecord::new("old-1", Utc::now() - Duration::days(2)),
        SessionRecord::new("old-2", Utc::now() - Duration::days(1)),
    ];
    let store = Arc::new(MemoryStore::with_sessions([(user(), stale)]));
    let auth = auth_over(Arc::clone(&store), Some(1));
    let token = Token::issue(&user(), Duration::hours(1));

    auth.generate_sign(&token).await.unwrap();

    let ids: Vec<_> = store
        .get(&user())
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.token_id)
        .collect();
    assert_eq!(ids, [token.id]);
}

#[tokio::test]
async fn test_concurrent_issues_respect_cap() {
    let store = Arc::new(MemoryStore::new());
    let auth = auth_over(Arc::clone(&store), Some(3));

    let tokens: Vec<_> = (0..12).map(|_| Token::issue(&user(), Duration::hours(1))).collect();
    let results =
        futures_util::future::join_all(tokens.iter().map(|t| auth.generate_sign(t))).await;

    let issued = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == AuthErrorKind::MaxSessionsReached))
        .count();
    assert_eq!(issued, 3);
    assert_eq!(refused, 9);
    assert_eq!(store.get(&user()).await.unwrap().len(), 3);
}

// =========================================================================
// Validating
// =========================================================================

#[tokio::test]
async fn test_issue_then_validate_returns_token() {
    let auth = auth_over(Arc::new(MemoryStore::new()), None);
    let token = Token::new("abc", in_one_hour())
        .with_claim(USER_ID_CLAIM, "#01")
        .with_claim("role", "admin");

    let sign = auth.generate_sign(&token).await.unwrap();
    let decoded = auth.validate_sign(&sign).await.unwrap();

    assert_eq!(decoded, token);
}

#[tokio::test]
async fn test_validate_without_user_id_is_unauthorized() {
    let auth = auth_over(Arc::new(MemoryStore::new()), None);
    // Signed by the stateless authenticator, so no session and no user id.
    let sign = basic()
        .generate_sign(&Token::new("anon", in_one_hour()))
        .await
        .unwrap();

    let err = auth.validate_sign(&sign).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Unauthorized);
    assert!(err.to_string().contains("user id missing"), "got: {err}");
}

#[tokio::test]
async fn test_validate_validly_signed_but_unregistered_is_unauthorized() {
    let auth = auth_over(Arc::new(MemoryStore::new()), None);
    let token = Token::issue(&user(), Duration::hours(1));
    let sign = basic().generate_sign(&token).await.unwrap();

    let err = auth.validate_sign(&sign).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_validate_expired_sign_is_expired() {
    let store = Arc::new(MemoryStore::new());
    let auth = auth_over(Arc::clone(&store), None);
    let token = Token::new("old", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
        .with_claim(USER_ID_CLAIM, "#01");
    let sign = auth.generate_sign(&token).await.unwrap();

    let err = auth.validate_sign(&sign).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Expired);
}

#[tokio::test]
async fn test_validate_garbage_is_unauthorized() {
    let auth = auth_over(Arc::new(MemoryStore::new()), None);

    let err = auth.validate_sign("definitely.not.ajwt").await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_validate_sign_from_other_secret_is_internal() {
    let auth = auth_over(Arc::new(MemoryStore::new()), None);
    let foreign = BasicAuthenticator::new(JwtSigner::from_secret(b"other", SigningAlgorithm::HS256));
    let sign = foreign
        .generate_sign(&Token::issue(&user(), Duration::hours(1)))
        .await
        .unwrap();

    let err = auth.validate_sign(&sign).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Internal);
}

#[tokio::test]
async fn test_validate_after_session_dropped_is_unauthorized() {
    let store = Arc::new(MemoryStore::new());
    let auth = auth_over(Arc::clone(&store), None);
    let sign = auth
        .generate_sign(&Token::issue(&user(), Duration::hours(1)))
        .await
        .unwrap();

    // Session gone from the store (revoked out of band): the signature is
    // still fine but the token must no longer be honored.
    store.set(&user(), Vec::new()).await.unwrap();
    let err = auth.validate_sign(&sign).await.unwrap_err();

    assert_eq!(err.kind(), AuthErrorKind::Unauthorized);
}
