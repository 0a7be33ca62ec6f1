//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_credential_adapter::FileCredentialAdapter;
use crate::adapters::table_report;
use crate::domain::config_validation::{MAX_LOOKBACK_DAYS, validate_screen_config};
use crate::domain::error::ScreenerError;
use crate::domain::evaluator::TrendSupportParams;
use crate::domain::screen::screen;
use crate::domain::signal::filter_by_name;
use crate::domain::strategy::{ScreenConfig, Strategy};
use crate::domain::support::SupportParams;
use crate::domain::universe::{find_universe, load_universes};
use crate::ports::config_port::ConfigPort;
use crate::ports::credential_port::{CredentialPort, Credentials};
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "trendscan", about = "Equity signal screener")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen a stock list with one strategy
    Screen {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        list: String,
        /// gainers, losers or trend-support
        #[arg(short, long)]
        strategy: String,
        /// Keep only results whose name contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        top: Option<u64>,
        /// Screening date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Also write results as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show configured stock lists
    Lists {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a screener configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Store broker credentials
    Login {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        api_key: String,
    },
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Screen {
            config,
            list,
            strategy,
            search,
            top,
            as_of,
            output,
        } => run_screen(
            &config,
            &list,
            &strategy,
            search.as_deref(),
            top,
            as_of,
            output.as_deref(),
        ),
        Command::Lists { config } => run_lists(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Login {
            config,
            user_id,
            api_key,
        } => run_login(&config, user_id, api_key),
    }
}

fn fail(err: ScreenerError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        fail(ScreenerError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    })
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<usize, ScreenerError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(ScreenerError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{key} must be positive"),
        });
    }
    Ok(value as usize)
}

fn lookback(config: &dyn ConfigPort, key: &str, default: i64) -> Result<i64, ScreenerError> {
    let days = positive(config, "screen", key, default)? as i64;
    if days > MAX_LOOKBACK_DAYS {
        return Err(ScreenerError::ConfigInvalid {
            section: "screen".into(),
            key: key.into(),
            reason: format!("{key} must be at most {MAX_LOOKBACK_DAYS}"),
        });
    }
    Ok(days)
}

pub fn build_screen_config(config: &dyn ConfigPort) -> Result<ScreenConfig, ScreenerError> {
    let defaults = ScreenConfig::default();
    let trend_defaults = TrendSupportParams::default();
    let support_defaults = SupportParams::default();

    let exchange = ScreenConfig::exchange_from(config);

    let ts = "trend_support";
    let support = SupportParams {
        lookback_bars: positive(config, ts, "support_lookback", support_defaults.lookback_bars as i64)?,
        min_ratio: config.get_double(ts, "min_support_ratio", support_defaults.min_ratio),
        max_ratio: config.get_double(ts, "max_support_ratio", support_defaults.max_ratio),
        volume_factor: config.get_double(ts, "volume_factor", support_defaults.volume_factor),
        tolerance_factor: config.get_double(ts, "tolerance_factor", support_defaults.tolerance_factor),
    };

    let trend = TrendSupportParams {
        min_bars: positive(config, ts, "min_bars", trend_defaults.min_bars as i64)?,
        fast_ema: positive(config, ts, "fast_ema", trend_defaults.fast_ema as i64)?,
        slow_ema: positive(config, ts, "slow_ema", trend_defaults.slow_ema as i64)?,
        rsi_window: positive(config, ts, "rsi_window", trend_defaults.rsi_window as i64)?,
        rsi_max: config.get_double(ts, "rsi_max", trend_defaults.rsi_max),
        lookback_days: lookback(config, "trend_lookback_days", trend_defaults.lookback_days)?,
        support,
    };

    Ok(ScreenConfig {
        exchange,
        max_concurrency: positive(config, "screen", "max_concurrency", defaults.max_concurrency as i64)?,
        top_n: positive(config, "screen", "top_n", defaults.top_n as i64)?,
        percent_lookback_days: lookback(config, "percent_lookback_days", defaults.percent_lookback_days)?,
        percent_min: config.get_double("percent_move", "min_pct", defaults.percent_min),
        percent_max: config.get_double("percent_move", "max_pct", defaults.percent_max),
        trend,
    })
}

/// Market-data provider selected by `[provider] kind`.
pub fn build_provider(config: &dyn ConfigPort) -> Result<Box<dyn MarketDataPort>, ScreenerError> {
    let kind = config
        .get_string("provider", "kind")
        .unwrap_or_else(|| "csv".to_string());

    match kind.trim().to_lowercase().as_str() {
        "csv" => Ok(Box::new(CsvAdapter::from_config(config)?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            use crate::adapters::sqlite_adapter::SqliteAdapter;
            Ok(Box::new(SqliteAdapter::from_config(config)?))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(ScreenerError::ConfigInvalid {
            section: "provider".into(),
            key: "kind".into(),
            reason: "sqlite feature is not enabled".into(),
        }),
        other => Err(ScreenerError::ConfigInvalid {
            section: "provider".into(),
            key: "kind".into(),
            reason: format!("unknown provider {other}"),
        }),
    }
}

fn run_screen(
    config_path: &Path,
    list: &str,
    strategy: &str,
    search: Option<&str>,
    top: Option<u64>,
    as_of: Option<NaiveDate>,
    output_path: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_screen_config(&adapter) {
        return fail(e);
    }

    let mut screen_config = match build_screen_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    if let Some(n) = top {
        screen_config.top_n = n as usize;
    }

    let strategy: Strategy = match strategy.parse() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let universe = match find_universe(&adapter, &screen_config.exchange, list) {
        Ok(u) => u,
        Err(e) => return fail(e),
    };
    if universe.tokens.is_empty() {
        eprintln!("Stock list {} is empty, nothing to screen", universe.name);
        return ExitCode::SUCCESS;
    }

    let provider = match build_provider(&adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };

    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    eprintln!(
        "Screening {} instruments from {} with {} as of {}...",
        universe.count(),
        universe.name,
        strategy,
        as_of
    );

    let signals = match screen(provider.as_ref(), strategy, &universe, &screen_config, as_of) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let signals = match search {
        Some(q) => filter_by_name(signals, q),
        None => signals,
    };

    if signals.is_empty() {
        println!("No stocks found for {strategy}");
    } else {
        print!(
            "{}",
            table_report::render_table(&signals, &screen_config.exchange)
        );
        eprintln!("{} matches", signals.len());
    }

    if let Some(path) = output_path {
        if let Err(e) = table_report::write_csv_file(&signals, &screen_config.exchange, path) {
            return fail(e);
        }
        eprintln!("Results written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_lists(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let exchange = ScreenConfig::exchange_from(&config);
    let universes = match load_universes(&config, &exchange) {
        Ok(u) => u,
        Err(e) => return fail(e),
    };

    if universes.is_empty() {
        eprintln!("No stock lists configured");
    } else {
        for universe in &universes {
            println!("{}: {} instruments", universe.name, universe.count());
        }
        eprintln!("{} lists found", universes.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_screen_config(&config) {
        return fail(e);
    }
    let screen_config = match build_screen_config(&config) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    eprintln!(
        "  provider:        {}",
        config
            .get_string("provider", "kind")
            .unwrap_or_else(|| "csv".to_string())
    );
    eprintln!("  exchange:        {}", screen_config.exchange);
    eprintln!("  max concurrency: {}", screen_config.max_concurrency);
    eprintln!("  top n:           {}", screen_config.top_n);
    eprintln!("  stock lists:     {}", config.keys("lists").join(", "));

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_login(config_path: &Path, user_id: String, api_key: String) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let store = FileCredentialAdapter::from_config(&config);
    match store.load() {
        Ok(Some(existing)) => {
            eprintln!("Replacing stored credentials for {}", existing.user_id)
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable credential store"),
    }

    let credentials = Credentials { user_id, api_key };
    if let Err(e) = store.save(&credentials) {
        return fail(e);
    }
    eprintln!("Credentials saved to {}", store.path().display());
    ExitCode::SUCCESS
}
