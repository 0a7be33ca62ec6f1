//! Configuration validation.
//!
//! Validates every screening setting before a run starts.

use crate::domain::error::ScreenerError;
use crate::domain::strategy::ScreenConfig;
use crate::domain::universe::{LISTS_SECTION, load_universes};
use crate::ports::config_port::ConfigPort;

/// Longest history window a screen may request, in calendar days.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

pub fn validate_screen_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_provider(config)?;
    validate_exchange(config)?;
    validate_positive_int(config, "screen", "max_concurrency", 10)?;
    validate_positive_int(config, "screen", "top_n", 10)?;
    validate_lookback(config, "percent_lookback_days", 5)?;
    validate_lookback(config, "trend_lookback_days", 730)?;
    validate_percent_band(config)?;
    validate_trend_support(config)?;
    validate_lists(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> ScreenerError {
    ScreenerError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_provider(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let kind = config
        .get_string("provider", "kind")
        .unwrap_or_else(|| "csv".to_string());
    match kind.trim().to_lowercase().as_str() {
        "csv" => match config.get_string("csv", "path") {
            Some(p) if !p.trim().is_empty() => Ok(()),
            _ => Err(ScreenerError::ConfigMissing {
                section: "csv".to_string(),
                key: "path".to_string(),
            }),
        },
        "sqlite" => match config.get_string("sqlite", "path") {
            Some(p) if !p.trim().is_empty() => Ok(()),
            _ => Err(ScreenerError::ConfigMissing {
                section: "sqlite".to_string(),
                key: "path".to_string(),
            }),
        },
        _ => Err(invalid("provider", "kind", "kind must be csv or sqlite")),
    }
}

fn validate_exchange(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("screen", "exchange") {
        Some(s) if s.trim().is_empty() => {
            Err(invalid("screen", "exchange", "exchange must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<(), ScreenerError> {
    if config.get_int(section, key, default) <= 0 {
        return Err(invalid(section, key, &format!("{key} must be positive")));
    }
    Ok(())
}

fn validate_lookback(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), ScreenerError> {
    validate_positive_int(config, "screen", key, default)?;
    if config.get_int("screen", key, default) > MAX_LOOKBACK_DAYS {
        return Err(invalid(
            "screen",
            key,
            &format!("{key} must be at most {MAX_LOOKBACK_DAYS}"),
        ));
    }
    Ok(())
}

fn validate_percent_band(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let min = config.get_double("percent_move", "min_pct", 3.0);
    let max = config.get_double("percent_move", "max_pct", 5.0);
    if min < 0.0 {
        return Err(invalid("percent_move", "min_pct", "min_pct must be non-negative"));
    }
    if min > max {
        return Err(invalid(
            "percent_move",
            "max_pct",
            "max_pct must not be below min_pct",
        ));
    }
    Ok(())
}

fn validate_trend_support(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let section = "trend_support";

    if config.get_int(section, "min_bars", 100) < 2 {
        return Err(invalid(section, "min_bars", "min_bars must be at least 2"));
    }
    for (key, default) in [
        ("fast_ema", 50),
        ("slow_ema", 200),
        ("rsi_window", 14),
        ("support_lookback", 126),
    ] {
        validate_positive_int(config, section, key, default)?;
    }

    let fast = config.get_int(section, "fast_ema", 50);
    let slow = config.get_int(section, "slow_ema", 200);
    if fast >= slow {
        return Err(invalid(section, "fast_ema", "fast_ema must be below slow_ema"));
    }

    let rsi_max = config.get_double(section, "rsi_max", 65.0);
    if !(0.0..=100.0).contains(&rsi_max) {
        return Err(invalid(section, "rsi_max", "rsi_max must be between 0 and 100"));
    }

    let min_ratio = config.get_double(section, "min_support_ratio", 1.05);
    let max_ratio = config.get_double(section, "max_support_ratio", 1.20);
    if min_ratio < 1.0 {
        return Err(invalid(
            section,
            "min_support_ratio",
            "min_support_ratio must be at least 1",
        ));
    }
    if min_ratio > max_ratio {
        return Err(invalid(
            section,
            "max_support_ratio",
            "max_support_ratio must not be below min_support_ratio",
        ));
    }

    if config.get_double(section, "volume_factor", 0.8) < 0.0 {
        return Err(invalid(
            section,
            "volume_factor",
            "volume_factor must be non-negative",
        ));
    }
    if config.get_double(section, "tolerance_factor", 0.3) < 0.0 {
        return Err(invalid(
            section,
            "tolerance_factor",
            "tolerance_factor must be non-negative",
        ));
    }
    Ok(())
}

fn validate_lists(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let exchange = ScreenConfig::exchange_from(config);
    let universes = load_universes(config, &exchange)?;
    if universes.is_empty() {
        return Err(ScreenerError::ConfigMissing {
            section: LISTS_SECTION.to_string(),
            key: "<list name>".to_string(),
        });
    }
    Ok(())
}
