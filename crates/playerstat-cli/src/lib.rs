//! playerstat CLI Library
//!
//! Configuration loading, the status cycle driver and the transports used by
//! the `playerstat` binary.

pub mod cli;
pub mod config;
pub mod cycle;
pub mod error;
pub mod transport;

pub use config::{AppConfig, Overrides};
pub use cycle::{run_cycle, run_until, CycleReport};
pub use error::{CliError, Result};
pub use transport::DryRunTransport;
