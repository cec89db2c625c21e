//! Command-line front end for the wealthplan engine
//!
//! Loads YAML household files, runs projections and simulations through
//! `wealthplan_core`, and renders the results as plain-text tables.

pub mod commands;
pub mod data;
pub mod logging;
pub mod report;
pub mod util;

pub use logging::init_logging;
