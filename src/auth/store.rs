//! Persistence for the single session token.
//!
//! The token lives in one file under a fixed name, the client-side analog
//! of a fixed browser-storage key. At most one token exists at a time: a
//! new login overwrites, logout and invalidation remove.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Fixed storage key for the session token
const TOKEN_FILE: &str = "crm_token";

#[derive(Debug, Clone)]
pub struct TokenStore {
    storage_dir: PathBuf,
}

impl TokenStore {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self { storage_dir }
    }

    /// Read the persisted token, if any.
    pub fn load(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let token = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    /// Persist a token, replacing any previous one.
    pub fn save(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir)
            .context("Failed to create token storage directory")?;
        std::fs::write(self.token_path(), token).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the persisted token. Idempotent.
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    pub fn exists(&self) -> bool {
        self.token_path().exists()
    }

    fn token_path(&self) -> PathBuf {
        self.storage_dir.join(TOKEN_FILE)
    }
}
