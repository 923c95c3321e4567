//! Shared utilities for the UBI accrual engine.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat};
