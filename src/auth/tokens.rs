use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Token file name in the config directory
const TOKENS_FILE: &str = "tokens.json";

/// The JWT pair returned by the token endpoint.
///
/// The serde field names are the storage keys: the pair persists under
/// exactly `access` and `refresh`, holding the raw token strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Durable store for the token pair.
///
/// A save writes both tokens in one operation, so the stored pair is only
/// ever replaced as a unit. There is no TTL, no expiry checking, and no
/// refresh protocol - a pair lives until overwritten by a later login or
/// cleared.
pub struct TokenStore {
    dir: PathBuf,
    tokens: Option<TokenPair>,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, tokens: None }
    }

    /// Load the stored pair from disk. Returns whether a pair was found.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.tokens_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read token file")?;
            let tokens: TokenPair =
                serde_json::from_str(&contents).context("Failed to parse token file")?;
            self.tokens = Some(tokens);
            return Ok(true);
        }
        Ok(false)
    }

    /// Persist a new pair, replacing any previous one. The in-memory pair
    /// is only updated once the write has succeeded.
    pub fn save(&mut self, tokens: TokenPair) -> Result<()> {
        let path = self.tokens_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&tokens)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        self.tokens = Some(tokens);
        Ok(())
    }

    /// Remove the stored pair
    pub fn clear(&mut self) -> Result<()> {
        self.tokens = None;
        let path = self.tokens_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// The access token, if a pair is stored
    pub fn access(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access.as_str())
    }

    pub fn has_tokens(&self) -> bool {
        self.tokens.is_some()
    }

    fn tokens_path(&self) -> PathBuf {
        self.dir.join(TOKENS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = TokenStore::new(dir.path().to_path_buf());
        store
            .save(TokenPair {
                access: "x".to_string(),
                refresh: "y".to_string(),
            })
            .expect("Failed to save tokens");

        let mut reloaded = TokenStore::new(dir.path().to_path_buf());
        assert!(reloaded.load().expect("Failed to load tokens"));
        assert_eq!(reloaded.access(), Some("x"));
        assert_eq!(reloaded.tokens.as_ref().unwrap().refresh, "y");
    }

    #[test]
    fn test_stored_keys_are_access_and_refresh() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = TokenStore::new(dir.path().to_path_buf());
        store
            .save(TokenPair {
                access: "a-token".to_string(),
                refresh: "r-token".to_string(),
            })
            .expect("Failed to save tokens");

        let raw = std::fs::read_to_string(dir.path().join("tokens.json"))
            .expect("Failed to read token file");
        let json: serde_json::Value = serde_json::from_str(&raw).expect("Invalid JSON on disk");
        assert_eq!(json["access"], "a-token");
        assert_eq!(json["refresh"], "r-token");
    }

    #[test]
    fn test_save_replaces_pair_wholesale() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = TokenStore::new(dir.path().to_path_buf());
        store
            .save(TokenPair {
                access: "old-a".to_string(),
                refresh: "old-r".to_string(),
            })
            .expect("Failed to save first pair");
        store
            .save(TokenPair {
                access: "new-a".to_string(),
                refresh: "new-r".to_string(),
            })
            .expect("Failed to save second pair");

        let mut reloaded = TokenStore::new(dir.path().to_path_buf());
        reloaded.load().expect("Failed to load tokens");
        let pair = reloaded.tokens.unwrap();
        assert_eq!(pair.access, "new-a");
        assert_eq!(pair.refresh, "new-r");
    }

    #[test]
    fn test_load_without_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = TokenStore::new(dir.path().to_path_buf());
        assert!(!store.load().expect("Load should succeed with no file"));
        assert!(!store.has_tokens());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut store = TokenStore::new(dir.path().to_path_buf());
        store
            .save(TokenPair {
                access: "x".to_string(),
                refresh: "y".to_string(),
            })
            .expect("Failed to save tokens");
        store.clear().expect("Failed to clear tokens");

        assert!(!store.has_tokens());
        assert!(!dir.path().join("tokens.json").exists());
    }
}
