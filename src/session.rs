//! Bearer-token session storage
//!
//! The web client kept its token in localStorage; the CLI keeps it in a
//! plain file under the daisy config directory. A 401 from the backend
//! clears this file so the next command points the user at `daisy login`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Name of the token file inside the daisy config directory.
pub const TOKEN_FILE: &str = "session";

/// Session token store backed by a single file.
#[derive(Debug, Clone)]
pub struct Session {
    path: PathBuf,
}

impl Session {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Session store in the default daisy config directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(crate::config::config_dir()?.join(TOKEN_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored token, if any. An empty or whitespace-only file counts as
    /// logged out.
    pub fn token(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// The stored token, or `NotLoggedIn`.
    pub fn require_token(&self) -> Result<String> {
        self.token().ok_or(Error::NotLoggedIn)
    }

    pub fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())?;
        Ok(())
    }

    /// Remove the stored token. Missing file is fine; the outcome is the
    /// same logged-out state.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
