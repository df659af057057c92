//! Persistence of the OAuth token across runs.

use crate::auth::token::AccessToken;
use crate::db::pool::DbPool;
use crate::db::queries::{kv_delete, kv_get, kv_set};
use crate::errors::AppResult;
use std::sync::{Mutex, PoisonError};

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "google_access_token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> AppResult<Option<AccessToken>>;
    fn save(&self, token: &AccessToken) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// Token kept in the `kv` table of the state database.
pub struct SqliteTokenStore {
    path: String,
}

impl SqliteTokenStore {
    /// Opens (and if needed initializes) the state database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        DbPool::open_initialized(path)?;
        Ok(Self {
            path: path.to_string(),
        })
    }

    fn pool(&self) -> AppResult<DbPool> {
        Ok(DbPool::new(&self.path)?)
    }
}

impl TokenStore for SqliteTokenStore {
    fn load(&self) -> AppResult<Option<AccessToken>> {
        let pool = self.pool()?;
        Ok(kv_get(&pool.conn, TOKEN_KEY)?
            .filter(|v| !v.is_empty())
            .map(AccessToken::new))
    }

    fn save(&self, token: &AccessToken) -> AppResult<()> {
        let pool = self.pool()?;
        kv_set(&pool.conn, TOKEN_KEY, token.secret())
    }

    fn clear(&self) -> AppResult<()> {
        let pool = self.pool()?;
        kv_delete(&pool.conn, TOKEN_KEY)
    }
}

/// Process-local store; nothing survives the process. Used by library callers
/// that manage persistence themselves, and by tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> AppResult<Option<AccessToken>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &AccessToken) -> AppResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
