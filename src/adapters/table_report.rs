//! Console table and CSV output for screen results.

use crate::domain::error::ScreenerError;
use crate::domain::signal::{PercentMoveSignal, Signal, TrendSupportSignal};
use std::fmt::Write as _;
use std::io;
use std::path::Path;

/// TradingView chart link for an instrument.
pub fn chart_url(exchange: &str, name: &str) -> String {
    format!(
        "https://in.tradingview.com/chart?symbol={}%3A{}",
        encode_query(&exchange.trim().to_uppercase()),
        encode_query(name.trim())
    )
}

/// Percent-encode everything outside the URI unreserved set.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

pub fn render_percent_table(signals: &[PercentMoveSignal], exchange: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>12} {:>10}  Chart",
        "Name", "Token", "Close", "Change %"
    );
    let _ = writeln!(out, "{}", "-".repeat(60));
    for s in signals {
        let _ = writeln!(
            out,
            "{:<20} {:>8} {:>12.2} {:>+10.2}  {}",
            s.name,
            s.token,
            s.close_price,
            s.percent_change,
            chart_url(exchange, &s.name)
        );
    }
    out
}

pub fn render_trend_table(signals: &[TrendSupportSignal], exchange: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<20} {:>8} {:>10} {:>10} {:>8} {:>10} {:>6} {:>8}  Chart",
        "Name", "Token", "Price", "Support", "Strength", "Distance %", "RSI", "Trend"
    );
    let _ = writeln!(out, "{}", "-".repeat(92));
    for s in signals {
        let _ = writeln!(
            out,
            "{:<20} {:>8} {:>10.2} {:>10.2} {:>8} {:>10.2} {:>6.1} {:>8}  {}",
            s.name,
            s.token,
            s.price,
            s.support_price,
            s.strength,
            s.distance_pct,
            s.rsi,
            s.trend_label.to_string(),
            chart_url(exchange, &s.name)
        );
    }
    out
}

/// Render signals as one table per signal kind, percent moves first.
pub fn render_table(signals: &[Signal], exchange: &str) -> String {
    let mut moves = Vec::new();
    let mut trends = Vec::new();
    for signal in signals {
        match signal {
            Signal::PercentMove(s) => moves.push(s.clone()),
            Signal::TrendSupport(s) => trends.push(s.clone()),
        }
    }

    let mut out = String::new();
    if !moves.is_empty() {
        out.push_str(&render_percent_table(&moves, exchange));
    }
    if !trends.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_trend_table(&trends, exchange));
    }
    out
}

const CSV_HEADER: [&str; 10] = [
    "name",
    "token",
    "price",
    "change_pct",
    "support_price",
    "strength",
    "distance_pct",
    "rsi",
    "trend",
    "chart_url",
];

/// Write signals as CSV. Columns that do not apply to a signal kind are left
/// empty.
pub fn write_csv<W: io::Write>(
    signals: &[Signal],
    exchange: &str,
    writer: W,
) -> Result<(), ScreenerError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER).map_err(io::Error::from)?;

    for signal in signals {
        let url = chart_url(exchange, signal.name());
        let record: [String; 10] = match signal {
            Signal::PercentMove(s) => [
                s.name.clone(),
                s.token.clone(),
                format!("{:.2}", s.close_price),
                format!("{:.2}", s.percent_change),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                url,
            ],
            Signal::TrendSupport(s) => [
                s.name.clone(),
                s.token.clone(),
                format!("{:.2}", s.price),
                String::new(),
                format!("{:.2}", s.support_price),
                s.strength.to_string(),
                format!("{:.2}", s.distance_pct),
                format!("{:.2}", s.rsi),
                s.trend_label.to_string(),
                url,
            ],
        };
        wtr.write_record(&record).map_err(io::Error::from)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(signals: &[Signal], exchange: &str, path: &Path) -> Result<(), ScreenerError> {
    let file = std::fs::File::create(path)?;
    write_csv(signals, exchange, file)
}
