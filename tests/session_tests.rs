mod common;
use common::{CountingConsent, SharedStore, temp_state_db};
use rsheetcrud::auth::session::{AuthSession, SessionState};
use rsheetcrud::auth::store::{MemoryTokenStore, SqliteTokenStore, TokenStore};
use rsheetcrud::auth::token::AccessToken;
use rsheetcrud::errors::AppError;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;

#[test]
fn test_persisted_token_skips_consent() {
    let (consent, calls) = CountingConsent::granting("unused");
    let store = MemoryTokenStore::with_token(AccessToken::new("stored"));
    let session = AuthSession::restore(store, consent).unwrap();

    assert_eq!(session.state(), SessionState::Authenticated);
    let token = session.authorize().unwrap();
    assert_eq!(token.secret(), "stored");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_consent_runs_once_and_token_is_persisted() {
    let store = SharedStore::default();
    let (consent, calls) = CountingConsent::granting("granted");
    let session = AuthSession::restore(store.clone(), consent).unwrap();
    assert!(!session.is_authenticated());

    assert_eq!(session.authorize().unwrap().secret(), "granted");
    assert_eq!(session.authorize().unwrap().secret(), "granted");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.load().unwrap(), Some(AccessToken::new("granted")));
}

#[test]
fn test_concurrent_authorize_prompts_once() {
    let (consent, calls) = CountingConsent::granting("shared");
    let session = Arc::new(AuthSession::restore(MemoryTokenStore::default(), consent).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let s = session.clone();
            thread::spawn(move || s.authorize().unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap().secret(), "shared");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_denied_consent_leaves_session_unauthenticated() {
    let store = SharedStore::default();
    let (consent, calls) = CountingConsent::denying();
    let session = AuthSession::restore(store.clone(), consent).unwrap();

    let err = session.authorize().unwrap_err();
    assert!(matches!(err, AppError::ConsentDenied(_)));
    assert_eq!(session.state(), SessionState::Unauthenticated);
    assert_eq!(store.load().unwrap(), None);

    // a later attempt asks again
    assert!(session.authorize().is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_logout_clears_memory_and_store() {
    let store = SharedStore(Arc::new(MemoryTokenStore::with_token(AccessToken::new(
        "t",
    ))));
    let (consent, _) = CountingConsent::granting("next");
    let session = AuthSession::restore(store.clone(), consent).unwrap();
    assert!(session.is_authenticated());

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert_eq!(session.current_token(), None);
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_invalidate_token_keeps_newer_token() {
    let (consent, _) = CountingConsent::granting("new");
    let session = AuthSession::restore(
        MemoryTokenStore::with_token(AccessToken::new("current")),
        consent,
    )
    .unwrap();

    session.invalidate_token(&AccessToken::new("stale")).unwrap();
    assert_eq!(session.current_token(), Some(AccessToken::new("current")));

    session
        .invalidate_token(&AccessToken::new("current"))
        .unwrap();
    assert_eq!(session.state(), SessionState::Unauthenticated);
}

#[test]
fn test_sqlite_store_survives_reopen() {
    let path = temp_state_db("token_store");

    let store = SqliteTokenStore::open(&path).unwrap();
    assert_eq!(store.load().unwrap(), None);
    store.save(&AccessToken::new("first")).unwrap();
    store.save(&AccessToken::new("second")).unwrap();

    let reopened = SqliteTokenStore::open(&path).unwrap();
    assert_eq!(reopened.load().unwrap(), Some(AccessToken::new("second")));

    let (consent, calls) = CountingConsent::granting("unused");
    let session = AuthSession::restore(reopened, consent).unwrap();
    assert_eq!(session.authorize().unwrap().secret(), "second");
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    session.logout().unwrap();
    assert_eq!(SqliteTokenStore::open(&path).unwrap().load().unwrap(), None);
}

#[test]
fn test_token_debug_hides_secret() {
    let token = AccessToken::new("ya29.very-secret");
    assert!(!format!("{token:?}").contains("very-secret"));
}
