//! Credential storage port.

use crate::domain::error::ScreenerError;

/// Broker credentials. Both values are opaque to the screener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user_id: String,
    pub api_key: String,
}

pub trait CredentialPort {
    fn save(&self, credentials: &Credentials) -> Result<(), ScreenerError>;

    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Credentials>, ScreenerError>;
}
