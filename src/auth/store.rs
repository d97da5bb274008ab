// Credential storage
// Durable access/refresh token persistence shared by the whole pipeline

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

/// Storage contract for the credential pair.
///
/// Implementations must be safe to call from multiple concurrent
/// contexts. Readers may observe a pair that is about to be superseded;
/// the interceptor handles that race, the store does not prevent it.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current access token, if any
    async fn access_token(&self) -> Option<String>;

    /// Current refresh token, if any
    async fn refresh_token(&self) -> Option<String>;

    /// Replace the stored pair (used after login and reissue)
    async fn update_tokens(&self, access_token: &str, refresh_token: &str);

    /// Drop all stored credentials (used on logout)
    async fn clear_tokens(&self);
}

#[derive(Default)]
struct TokenState {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// In-process token store for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryTokenStore {
    state: RwLock<TokenState>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a credential pair
    pub fn with_tokens(access_token: &str, refresh_token: &str) -> Self {
        Self {
            state: RwLock::new(TokenState {
                access_token: Some(access_token.to_string()),
                refresh_token: Some(refresh_token.to_string()),
            }),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    async fn update_tokens(&self, access_token: &str, refresh_token: &str) {
        let mut state = self.state.write().await;
        state.access_token = Some(access_token.to_string());
        state.refresh_token = Some(refresh_token.to_string());
    }

    async fn clear_tokens(&self) {
        let mut state = self.state.write().await;
        state.access_token = None;
        state.refresh_token = None;
    }
}

const INIT_SQL: &str = "CREATE TABLE IF NOT EXISTS auth_tokens (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    access_token TEXT,
    refresh_token TEXT,
    updated_at TEXT NOT NULL
)";

/// SQLite-backed token store, durable across process restarts.
///
/// Read failures are logged and reported as "no token": the pipeline then
/// proceeds unauthenticated, which the server rejects like any other
/// logged-out request.
pub struct SqliteTokenStore {
    conn: Mutex<rusqlite::Connection>,
}

impl SqliteTokenStore {
    /// Open (or create) the token database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = rusqlite::Connection::open(path)
            .with_context(|| format!("Failed to open token database: {}", path.display()))?;
        conn.execute(INIT_SQL, [])
            .context("Failed to initialize token table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the token database at the platform data directory
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("No platform data directory available")?
            .join("keepsake");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;
        Self::open(&dir.join("auth.db"))
    }

    /// Create an in-memory store (no file backing)
    /// Available in test builds and integration tests
    #[cfg(any(test, feature = "test-utils"))]
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            rusqlite::Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute(INIT_SQL, [])
            .context("Failed to initialize token table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn load(&self) -> Result<(Option<String>, Option<String>)> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("token store mutex poisoned"))?;
        let row = conn.query_row(
            "SELECT access_token, refresh_token FROM auth_tokens WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        );
        match row {
            Ok(pair) => Ok(pair),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok((None, None)),
            Err(e) => Err(e).context("Failed to read stored tokens"),
        }
    }

    fn save(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("token store mutex poisoned"))?;
        conn.execute(
            "INSERT INTO auth_tokens (id, access_token, refresh_token, updated_at)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                 access_token = excluded.access_token,
                 refresh_token = excluded.refresh_token,
                 updated_at = excluded.updated_at",
            rusqlite::params![access_token, refresh_token, Utc::now().to_rfc3339()],
        )
        .context("Failed to persist tokens")?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("token store mutex poisoned"))?;
        conn.execute("DELETE FROM auth_tokens WHERE id = 1", [])
            .context("Failed to clear tokens")?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn access_token(&self) -> Option<String> {
        match self.load() {
            Ok((access, _)) => access,
            Err(e) => {
                tracing::error!("Token read failed: {:#}", e);
                None
            }
        }
    }

    async fn refresh_token(&self) -> Option<String> {
        match self.load() {
            Ok((_, refresh)) => refresh,
            Err(e) => {
                tracing::error!("Token read failed: {:#}", e);
                None
            }
        }
    }

    async fn update_tokens(&self, access_token: &str, refresh_token: &str) {
        if let Err(e) = self.save(access_token, refresh_token) {
            tracing::error!("Token persist failed: {:#}", e);
        }
    }

    async fn clear_tokens(&self) {
        if let Err(e) = self.delete() {
            tracing::error!("Token clear failed: {:#}", e);
        }
    }
}
