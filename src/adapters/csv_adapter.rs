//! CSV file market-data adapter.
//!
//! Layout under `base_path`:
//! - `instruments.csv` with columns `exchange,token,name`
//! - one `{name}_{exchange}.csv` per instrument with columns
//!   `date,open,high,low,close,volume`

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{Bar, Instrument, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const INSTRUMENTS_FILE: &str = "instruments.csv";

pub struct CsvAdapter {
    base_path: PathBuf,
    instruments: HashMap<(String, String), Instrument>,
}

impl CsvAdapter {
    /// Load the instrument master. A missing directory or instrument file
    /// means the provider is unavailable.
    pub fn new(base_path: PathBuf) -> Result<Self, ScreenerError> {
        if !base_path.is_dir() {
            return Err(ScreenerError::ProviderUnavailable {
                reason: format!("data directory {} not found", base_path.display()),
            });
        }
        let instruments = load_instruments(&base_path.join(INSTRUMENTS_FILE))?;
        Ok(Self {
            base_path,
            instruments,
        })
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        let path = config
            .get_string("csv", "path")
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ScreenerError::ConfigMissing {
                section: "csv".into(),
                key: "path".into(),
            })?;
        Self::new(PathBuf::from(path.trim()))
    }

    fn csv_path(&self, name: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", name, exchange))
    }
}

fn load_instruments(path: &Path) -> Result<HashMap<(String, String), Instrument>, ScreenerError> {
    let unavailable = |reason: String| ScreenerError::ProviderUnavailable { reason };

    let content = fs::read_to_string(path)
        .map_err(|e| unavailable(format!("failed to read {}: {}", path.display(), e)))?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut instruments = HashMap::new();

    for result in rdr.records() {
        let record = result.map_err(|e| unavailable(format!("instrument CSV parse error: {}", e)))?;
        let field = |i: usize, name: &str| {
            record
                .get(i)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| unavailable(format!("missing {} column", name)))
        };

        let instrument = Instrument {
            exchange: field(0, "exchange")?.to_uppercase(),
            token: field(1, "token")?.to_uppercase(),
            name: field(2, "name")?,
        };
        instruments.insert(
            (instrument.exchange.clone(), instrument.token.clone()),
            instrument,
        );
    }

    Ok(instruments)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    token: &str,
) -> Result<T, ScreenerError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| ScreenerError::DataUnavailable {
            token: token.to_string(),
            reason: format!("missing {} column", column),
        })?
        .trim()
        .parse()
        .map_err(|e: T::Err| ScreenerError::DataUnavailable {
            token: token.to_string(),
            reason: format!("invalid {} value: {}", column, e),
        })
}

impl MarketDataPort for CsvAdapter {
    fn resolve_instrument(
        &self,
        exchange: &str,
        token: &str,
    ) -> Result<Instrument, ScreenerError> {
        self.instruments
            .get(&(exchange.to_uppercase(), token.to_uppercase()))
            .cloned()
            .ok_or_else(|| ScreenerError::UnknownInstrument {
                exchange: exchange.to_string(),
                token: token.to_string(),
            })
    }

    fn fetch_bars(
        &self,
        instrument: &Instrument,
        from_date: NaiveDate,
        to_date: NaiveDate,
        interval: Interval,
    ) -> Result<Vec<Bar>, ScreenerError> {
        let token = instrument.token.as_str();
        if interval != Interval::Daily {
            return Err(ScreenerError::DataUnavailable {
                token: token.to_string(),
                reason: format!("interval {} not supported by CSV data", interval),
            });
        }

        let path = self.csv_path(&instrument.name, &instrument.exchange);
        let content = fs::read_to_string(&path).map_err(|e| ScreenerError::DataUnavailable {
            token: token.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScreenerError::DataUnavailable {
                token: token.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str: String = parse_field(&record, 0, "date", token)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                ScreenerError::DataUnavailable {
                    token: token.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < from_date || date > to_date {
                continue;
            }

            bars.push(Bar {
                date,
                open: parse_field(&record, 1, "open", token)?,
                high: parse_field(&record, 2, "high", token)?,
                low: parse_field(&record, 3, "low", token)?,
                close: parse_field(&record, 4, "close", token)?,
                volume: parse_field(&record, 5, "volume", token)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn check_available(&self) -> Result<(), ScreenerError> {
        if self.base_path.is_dir() {
            Ok(())
        } else {
            Err(ScreenerError::ProviderUnavailable {
                reason: format!("data directory {} not found", self.base_path.display()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        fs::write(
            path.join(INSTRUMENTS_FILE),
            "exchange,token,name\nNSE,2885,RELIANCE\nNSE,1594,INFY\nNSE,11536,TCS\n",
        )
        .unwrap();

        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-17,110.0,120.0,105.0,115.0,55000\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n";
        fs::write(path.join("RELIANCE_NSE.csv"), csv_content).unwrap();
        fs::write(
            path.join("INFY_NSE.csv"),
            "date,open,high,low,close,volume\n2024-01-15,1.0,1.0,1.0,abc,10\n",
        )
        .unwrap();

        (dir, path)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn resolve_instrument_by_token() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();

        let instrument = adapter.resolve_instrument("nse", "2885").unwrap();
        assert_eq!(instrument.name, "RELIANCE");
        assert_eq!(instrument.exchange, "NSE");
    }

    #[test]
    fn resolve_unknown_token_is_recoverable() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();

        let err = adapter.resolve_instrument("NSE", "99999").unwrap_err();
        assert!(matches!(err, ScreenerError::UnknownInstrument { token, .. } if token == "99999"));
    }

    #[test]
    fn fetch_bars_sorted_and_filtered() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();
        let instrument = adapter.resolve_instrument("NSE", "2885").unwrap();

        let bars = adapter
            .fetch_bars(&instrument, date(15), date(17), Interval::Daily)
            .unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[2].volume, 55000);

        let bars = adapter
            .fetch_bars(&instrument, date(16), date(16), Interval::Daily)
            .unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, date(16));
    }

    #[test]
    fn fetch_bars_missing_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();
        let instrument = adapter.resolve_instrument("NSE", "11536").unwrap();

        let result = adapter.fetch_bars(&instrument, date(1), date(31), Interval::Daily);
        assert!(matches!(result, Err(ScreenerError::DataUnavailable { .. })));
    }

    #[test]
    fn fetch_bars_bad_value() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();
        let instrument = adapter.resolve_instrument("NSE", "1594").unwrap();

        let err = adapter
            .fetch_bars(&instrument, date(1), date(31), Interval::Daily)
            .unwrap_err();
        assert!(err.to_string().contains("invalid close value"));
    }

    #[test]
    fn minute_interval_unsupported() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvAdapter::new(path).unwrap();
        let instrument = adapter.resolve_instrument("NSE", "2885").unwrap();

        let result = adapter.fetch_bars(&instrument, date(1), date(31), Interval::Minute);
        assert!(matches!(result, Err(ScreenerError::DataUnavailable { .. })));
    }

    #[test]
    fn missing_directory_is_provider_unavailable() {
        let result = CsvAdapter::new(PathBuf::from("/nonexistent/trendscan/data"));
        assert!(matches!(result, Err(ScreenerError::ProviderUnavailable { .. })));
    }

    #[test]
    fn from_config_uses_csv_path() {
        let (_dir, path) = setup_test_data();
        let config = crate::adapters::file_config_adapter::FileConfigAdapter::from_string(
            &format!("[csv]\npath = {}\n", path.display()),
        )
        .unwrap();
        let adapter = CsvAdapter::from_config(&config).unwrap();
        adapter.check_available().unwrap();

        let empty = crate::adapters::file_config_adapter::FileConfigAdapter::from_string("[csv]\n")
            .unwrap();
        assert!(matches!(
            CsvAdapter::from_config(&empty),
            Err(ScreenerError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn missing_instrument_file_is_provider_unavailable() {
        let dir = TempDir::new().unwrap();
        let result = CsvAdapter::new(dir.path().to_path_buf());
        assert!(matches!(result, Err(ScreenerError::ProviderUnavailable { .. })));
    }
}
