//! Core domain types and the signal-analysis engine.

pub mod config_validation;
pub mod error;
pub mod evaluator;
pub mod fanout;
pub mod indicator;
pub mod ohlcv;
pub mod ranker;
pub mod screen;
pub mod signal;
pub mod strategy;
pub mod support;
pub mod universe;
