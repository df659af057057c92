//! OAuth session state shared by every protected operation.
//!
//! Unauthenticated -> Authenticated on a granted consent; Authenticated ->
//! Authenticated without any prompt when a token is already held;
//! Authenticated -> Unauthenticated on logout or when the server rejects
//! the token.

use crate::auth::consent::ConsentFlow;
use crate::auth::store::TokenStore;
use crate::auth::token::AccessToken;
use crate::errors::AppResult;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

pub struct AuthSession {
    token: Mutex<Option<AccessToken>>,
    store: Box<dyn TokenStore>,
    consent: Box<dyn ConsentFlow>,
}

impl AuthSession {
    /// Build a session, picking up a token persisted by an earlier run.
    pub fn restore(
        store: impl TokenStore + 'static,
        consent: impl ConsentFlow + 'static,
    ) -> AppResult<Self> {
        let token = store.load()?;
        Ok(Self {
            token: Mutex::new(token),
            store: Box::new(store),
            consent: Box::new(consent),
        })
    }

    fn slot(&self) -> MutexGuard<'_, Option<AccessToken>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        if self.slot().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    pub fn current_token(&self) -> Option<AccessToken> {
        self.slot().clone()
    }

    /// Return the held token, or run the consent flow and persist its result.
    ///
    /// The lock is held while consent runs, so concurrent callers wait for a
    /// single prompt instead of each opening their own.
    pub fn authorize(&self) -> AppResult<AccessToken> {
        let mut slot = self.slot();
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        let token = self.consent.request_token()?;
        self.store.save(&token)?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Drop the token from memory and from the store.
    pub fn invalidate(&self) -> AppResult<()> {
        let mut slot = self.slot();
        *slot = None;
        self.store.clear()
    }

    /// Invalidate only if `rejected` is still the held token. A token
    /// obtained by another caller in the meantime is left alone.
    pub fn invalidate_token(&self, rejected: &AccessToken) -> AppResult<()> {
        let mut slot = self.slot();
        if slot.as_ref() == Some(rejected) {
            *slot = None;
            self.store.clear()?;
        }
        Ok(())
    }

    pub fn logout(&self) -> AppResult<()> {
        self.invalidate()
    }
}
