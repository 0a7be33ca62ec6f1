//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod file_credential_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod table_report;
