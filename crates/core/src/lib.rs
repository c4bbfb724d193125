//! Core types and utilities for the blended price service
//!
//! This crate provides shared types used across all components:
//! - Asset and exchange identifiers
//! - Quote and aggregated price types
//! - Adapter and aggregation error taxonomy
//! - Service configuration

pub mod types;
pub mod quotes;
pub mod config;
pub mod errors;

pub use types::*;
pub use quotes::*;
pub use config::*;
pub use errors::*;
