//! Evaluation intake, session gate and REST client for the brokerage web front end.

pub mod api;
pub mod config;
pub mod error;
pub mod intake;
pub mod session;
pub mod telemetry;
