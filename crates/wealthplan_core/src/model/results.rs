//! Monte Carlo output types

use serde::{Deserialize, Serialize};

use super::records::Currency;

/// Cross-path distribution of the simulated value at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub year: usize,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Percentile table for the liquid bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSummary {
    pub initial_value: f64,
    pub expected_return: f64,
    pub volatility: f64,
    pub paths: usize,
    pub seed: u64,
    /// One band per year, years 1..=horizon
    pub bands: Vec<PercentileBand>,
}

/// Simulation of one portfolio segment in its own currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentOutcome {
    pub currency: Currency,
    pub initial_value: f64,
    pub bands: Vec<PercentileBand>,
    /// Initial value compounded at the benchmark rate, one entry per band
    pub benchmark: Vec<f64>,
    pub benchmark_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSimulation {
    pub domestic: SegmentOutcome,
    pub international: SegmentOutcome,
}
