//! INI file credential store.
//!
//! Stores a `[credentials]` section with `user_id` and `api_key`.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::credential_port::{CredentialPort, Credentials};
use configparser::ini::Ini;
use std::path::PathBuf;

const SECTION: &str = "credentials";
const DEFAULT_PATH: &str = "credentials.ini";

pub struct FileCredentialAdapter {
    path: PathBuf,
}

impl FileCredentialAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store location from `[credentials] path`, defaulting to
    /// `credentials.ini` in the working directory.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let path = config
            .get_string(SECTION, "path")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());
        Self::new(PathBuf::from(path))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

fn store_error(reason: impl std::fmt::Display) -> ScreenerError {
    ScreenerError::Credentials {
        reason: reason.to_string(),
    }
}

impl CredentialPort for FileCredentialAdapter {
    fn save(&self, credentials: &Credentials) -> Result<(), ScreenerError> {
        if credentials.user_id.trim().is_empty() || credentials.api_key.trim().is_empty() {
            return Err(store_error("user id and api key must not be empty"));
        }

        let mut ini = Ini::new();
        ini.set(SECTION, "user_id", Some(credentials.user_id.clone()));
        ini.set(SECTION, "api_key", Some(credentials.api_key.clone()));
        ini.write(&self.path)
            .map_err(|e| store_error(format!("failed to write {}: {}", self.path.display(), e)))
    }

    fn load(&self) -> Result<Option<Credentials>, ScreenerError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut ini = Ini::new();
        ini.load(&self.path)
            .map_err(|e| store_error(format!("failed to read {}: {}", self.path.display(), e)))?;

        match (ini.get(SECTION, "user_id"), ini.get(SECTION, "api_key")) {
            (Some(user_id), Some(api_key)) => Ok(Some(Credentials { user_id, api_key })),
            _ => Err(store_error(format!(
                "{} is missing user_id or api_key",
                self.path.display()
            ))),
        }
    }
}
