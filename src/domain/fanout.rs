//! Bounded fan-out of one evaluator across many instruments.
//!
//! Each token is one task on a dedicated rayon pool sized to
//! `max_concurrency`, so at most that many fetches are in flight. Results are
//! sent back over a channel and therefore collected in completion order. The
//! pool scope joins every task before returning. A panicking task is caught
//! and reported as that token's error.

use crate::domain::error::ScreenerError;
use crate::domain::evaluator::{Evaluator, evaluate_token};
use crate::domain::signal::Signal;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use tracing::{info, warn};

pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Result of evaluating a single token.
#[derive(Debug)]
pub struct TokenOutcome {
    pub token: String,
    pub result: Result<Option<Signal>, ScreenerError>,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Evaluate every token and return each outcome in arrival order.
pub fn dispatch(
    port: &dyn MarketDataPort,
    evaluator: &dyn Evaluator,
    exchange: &str,
    tokens: &[String],
    as_of: NaiveDate,
    max_concurrency: usize,
) -> Result<Vec<TokenOutcome>, ScreenerError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .thread_name(|i| format!("screen-worker-{i}"))
        .build()
        .map_err(|e| ScreenerError::Io(std::io::Error::other(e)))?;

    let (tx, rx) = mpsc::channel();

    pool.scope(|scope| {
        for token in tokens {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    evaluate_token(port, evaluator, exchange, token, as_of)
                }))
                .unwrap_or_else(|payload| {
                    Err(ScreenerError::DataUnavailable {
                        token: token.clone(),
                        reason: format!("evaluation panicked: {}", panic_message(&*payload)),
                    })
                });
                // The receiver outlives the scope, so a send cannot fail here.
                let _ = tx.send(TokenOutcome {
                    token: token.clone(),
                    result,
                });
            });
        }
    });
    drop(tx);

    Ok(rx.into_iter().collect())
}

/// Run `evaluator` over `tokens`, keeping only matches.
///
/// A failing token is logged and skipped; it never aborts the batch.
pub fn run(
    port: &dyn MarketDataPort,
    evaluator: &dyn Evaluator,
    exchange: &str,
    tokens: &[String],
    as_of: NaiveDate,
    max_concurrency: usize,
) -> Result<Vec<Signal>, ScreenerError> {
    let outcomes = dispatch(port, evaluator, exchange, tokens, as_of, max_concurrency)?;

    let mut signals = Vec::new();
    let mut failed = 0usize;
    for outcome in outcomes {
        match outcome.result {
            Ok(Some(signal)) => signals.push(signal),
            Ok(None) => {}
            Err(e) => {
                failed += 1;
                warn!(token = %outcome.token, error = %e, "skipping instrument");
            }
        }
    }

    info!(
        instruments = tokens.len(),
        matched = signals.len(),
        failed,
        "screen batch complete"
    );
    Ok(signals)
}
