//! Core types and utilities for stockseer.

pub mod config;
pub mod error;
pub mod timeseries;
pub mod types;

pub use config::{AnalyticsConfig, RiskConfig, SignalConfig, SimulationLimits};
pub use error::{Result, SeerError};
pub use timeseries::{Aligned, TimeSeries};
pub use types::*;
