//! Snapshot reporter for the blended price service
//!
//! Wires configuration, logging and the price engine together and renders the result.

pub mod logging;
pub mod report;

pub use logging::init_logging;
pub use report::{render_json, SnapshotView};
