//! SQLite market-data adapter.

use crate::domain::error::ScreenerError;
use crate::domain::ohlcv::{Bar, Instrument, Interval};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn unavailable(e: r2d2::Error) -> ScreenerError {
    ScreenerError::ProviderUnavailable {
        reason: e.to_string(),
    }
}

fn query_failed(token: &str, e: rusqlite::Error) -> ScreenerError {
    ScreenerError::DataUnavailable {
        token: token.to_string(),
        reason: e.to_string(),
    }
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, ScreenerError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| ScreenerError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4);
        let pool_size = u32::try_from(pool_size)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ScreenerError::ConfigInvalid {
                section: "sqlite".into(),
                key: "pool_size".into(),
                reason: format!("pool_size must be between 1 and {}, got {pool_size}", u32::MAX),
            })?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(unavailable)?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, ScreenerError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(unavailable)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, ScreenerError> {
        self.pool.get().map_err(unavailable)
    }

    pub fn initialize_schema(&self) -> Result<(), ScreenerError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS instruments (
                exchange TEXT NOT NULL,
                token TEXT NOT NULL,
                name TEXT NOT NULL,
                PRIMARY KEY (exchange, token)
            );
            CREATE TABLE IF NOT EXISTS ohlcv (
                exchange TEXT NOT NULL,
                token TEXT NOT NULL,
                date TEXT NOT NULL,
                open REAL NOT NULL,
                high REAL NOT NULL,
                low REAL NOT NULL,
                close REAL NOT NULL,
                volume INTEGER NOT NULL,
                PRIMARY KEY (exchange, token, date)
            );
            CREATE INDEX IF NOT EXISTS idx_ohlcv_date ON ohlcv(date);",
        )
        .map_err(|e| ScreenerError::ProviderUnavailable {
            reason: e.to_string(),
        })?;

        Ok(())
    }

    pub fn insert_instrument(&self, instrument: &Instrument) -> Result<(), ScreenerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO instruments (exchange, token, name) VALUES (?1, ?2, ?3)",
            params![instrument.exchange, instrument.token, instrument.name],
        )
        .map_err(|e| query_failed(&instrument.token, e))?;
        Ok(())
    }

    pub fn insert_bars(&self, instrument: &Instrument, bars: &[Bar]) -> Result<(), ScreenerError> {
        let token = instrument.token.as_str();
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(|e| query_failed(token, e))?;

        for bar in bars {
            tx.execute(
                "INSERT OR REPLACE INTO ohlcv (exchange, token, date, open, high, low, close, volume)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    instrument.exchange,
                    token,
                    bar.date.format(DATE_FORMAT).to_string(),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume
                ],
            )
            .map_err(|e| query_failed(token, e))?;
        }

        tx.commit().map_err(|e| query_failed(token, e))?;
        Ok(())
    }
}

impl MarketDataPort for SqliteAdapter {
    fn resolve_instrument(
        &self,
        exchange: &str,
        token: &str,
    ) -> Result<Instrument, ScreenerError> {
        let conn = self.conn()?;
        let found = conn
            .query_row(
                "SELECT exchange, token, name FROM instruments
                 WHERE exchange = ?1 COLLATE NOCASE AND token = ?2 COLLATE NOCASE",
                params![exchange, token],
                |row| {
                    Ok(Instrument {
                        exchange: row.get(0)?,
                        token: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(|e| query_failed(token, e))?;

        found.ok_or_else(|| ScreenerError::UnknownInstrument {
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
                reason: format!("interval {} not stored", interval),
            });
        }

        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT date, open, high, low, close, volume
                 FROM ohlcv
                 WHERE exchange = ?1 AND token = ?2 AND date >= ?3 AND date <= ?4
                 ORDER BY date ASC",
            )
            .map_err(|e| query_failed(token, e))?;

        let rows = stmt
            .query_map(
                params![
                    instrument.exchange,
                    token,
                    from_date.format(DATE_FORMAT).to_string(),
                    to_date.format(DATE_FORMAT).to_string()
                ],
                |row| {
                    let date_str: String = row.get(0)?;
                    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?;
                    Ok(Bar {
                        date,
                        open: row.get(1)?,
                        high: row.get(2)?,
                        low: row.get(3)?,
                        close: row.get(4)?,
                        volume: row.get(5)?,
                    })
                },
            )
            .map_err(|e| query_failed(token, e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| query_failed(token, e))
    }

    fn check_available(&self) -> Result<(), ScreenerError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM instruments", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| ScreenerError::ProviderUnavailable {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
