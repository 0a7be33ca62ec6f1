//! Domain error types.

/// Top-level error type for trendscan.
///
/// Per-instrument variants (`UnknownInstrument`, `DataUnavailable`,
/// `InvalidSeries`) are caught by the fan-out runner and never abort a batch.
/// `ProviderUnavailable` is batch-fatal and is raised before any fan-out.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data provider unavailable: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("unknown instrument {token} on {exchange}")]
    UnknownInstrument { exchange: String, token: String },

    #[error("no data for {token}: {reason}")]
    DataUnavailable { token: String, reason: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("unknown stock list: {name}")]
    UnknownList { name: String },

    #[error("credential store error: {reason}")]
    Credentials { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::ProviderUnavailable { .. }
            | ScreenerError::UnknownInstrument { .. }
            | ScreenerError::DataUnavailable { .. }
            | ScreenerError::InvalidSeries { .. } => 3,
            ScreenerError::UnknownStrategy { .. } | ScreenerError::UnknownList { .. } => 4,
            ScreenerError::Credentials { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
