//! One screening run: availability check, fan-out, ranking.

use crate::domain::error::ScreenerError;
use crate::domain::fanout;
use crate::domain::ranker::top_n;
use crate::domain::signal::Signal;
use crate::domain::strategy::{ScreenConfig, Strategy};
use crate::domain::universe::Universe;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use tracing::info;

/// Screen `universe` with `strategy`.
///
/// The provider is checked once up front; if it is unreachable the whole run
/// fails before any instrument is fetched. Percent-move results are returned
/// in arrival order. Trend-support results are ranked and cut to
/// `config.top_n`.
pub fn screen(
    port: &dyn MarketDataPort,
    strategy: Strategy,
    universe: &Universe,
    config: &ScreenConfig,
    as_of: NaiveDate,
) -> Result<Vec<Signal>, ScreenerError> {
    port.check_available()?;

    info!(
        strategy = %strategy,
        list = %universe.name,
        instruments = universe.count(),
        %as_of,
        "starting screen"
    );

    let evaluator = strategy.evaluator(config);
    let signals = fanout::run(
        port,
        evaluator.as_ref(),
        &universe.exchange,
        &universe.tokens,
        as_of,
        config.max_concurrency,
    )?;

    match strategy {
        Strategy::Gainers | Strategy::Losers => Ok(signals),
        Strategy::TrendSupport => {
            let trend: Vec<_> = signals
                .into_iter()
                .filter_map(Signal::into_trend_support)
                .collect();
            Ok(top_n(trend, config.top_n)
                .into_iter()
                .map(Signal::TrendSupport)
                .collect())
        }
    }
}
