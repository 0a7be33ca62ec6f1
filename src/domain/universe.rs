//! Named instrument universes.
//!
//! Universes come from the `[lists]` config section: each key is a list name
//! and each value a comma-separated list of instrument tokens.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

pub const LISTS_SECTION: &str = "lists";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub name: String,
    pub exchange: String,
    pub tokens: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.tokens.len()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in token list")]
    EmptyToken,

    #[error("duplicate token: {0}")]
    DuplicateToken(String),
}

pub fn parse_tokens(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let token = trimmed.to_uppercase();
        if !seen.insert(token.clone()) {
            return Err(UniverseError::DuplicateToken(token));
        }
        tokens.push(token);
    }

    Ok(tokens)
}

/// Every universe defined in `[lists]`, sorted by name.
pub fn load_universes(
    config: &dyn ConfigPort,
    exchange: &str,
) -> Result<Vec<Universe>, ScreenerError> {
    config
        .keys(LISTS_SECTION)
        .into_iter()
        .map(|name| {
            let raw = config.get_string(LISTS_SECTION, &name).unwrap_or_default();
            let tokens = parse_tokens(&raw).map_err(|e| ScreenerError::ConfigInvalid {
                section: LISTS_SECTION.to_string(),
                key: name.clone(),
                reason: e.to_string(),
            })?;
            Ok(Universe {
                name,
                exchange: exchange.to_string(),
                tokens,
            })
        })
        .collect()
}

/// Look up a universe by name, ignoring case and surrounding whitespace.
pub fn find_universe(
    config: &dyn ConfigPort,
    exchange: &str,
    name: &str,
) -> Result<Universe, ScreenerError> {
    let wanted = name.trim();
    load_universes(config, exchange)?
        .into_iter()
        .find(|u| u.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ScreenerError::UnknownList {
            name: wanted.to_string(),
        })
}
