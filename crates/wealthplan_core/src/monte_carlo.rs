//! Monte Carlo percentile bands for the liquid bucket
//!
//! Paths are generated in fixed-size batches. Each batch owns an RNG seeded
//! from the run seed and the batch index, so results are reproducible and do
//! not depend on how batches are scheduled across threads.

use rand::SeedableRng;
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand_distr::Normal;
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::error::MonteCarloError;
use crate::model::{
    BenchmarkPremises, Currency, MonteCarloSummary, PercentileBand, PortfolioParameters,
    SegmentOutcome, SegmentSimulation,
};
use crate::rates::{DOMESTIC_WEIGHT, INTERNATIONAL_WEIGHT, ReturnDistribution};

const MAX_BATCH_SIZE: usize = 100;
const MONTHS_PER_YEAR: usize = 12;

pub const DEFAULT_PATHS: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepFrequency {
    /// One draw per year
    #[default]
    Annual,
    /// Twelve draws per year with `mean / 12` and `volatility / sqrt(12)`
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    pub paths: usize,
    pub years: usize,
    pub seed: u64,
    pub step: StepFrequency,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            paths: DEFAULT_PATHS,
            years: 20,
            seed: DEFAULT_SEED,
            step: StepFrequency::Annual,
        }
    }
}

impl MonteCarloConfig {
    pub fn validate(&self) -> Result<(), MonteCarloError> {
        if self.paths == 0 {
            return Err(MonteCarloError::ZeroPaths);
        }
        if self.years == 0 {
            return Err(MonteCarloError::ZeroHorizon);
        }
        Ok(())
    }
}

/// Per-step sampler for one return distribution
#[derive(Debug, Clone)]
struct PathSampler {
    normal: Normal<f64>,
    steps_per_year: usize,
}

impl PathSampler {
    fn new(dist: ReturnDistribution, step: StepFrequency) -> Result<Self, MonteCarloError> {
        let invalid = MonteCarloError::InvalidDistribution {
            mean: dist.mean,
            volatility: dist.volatility,
        };
        if !dist.mean.is_finite() {
            return Err(invalid);
        }

        let (mean, volatility, steps_per_year) = match step {
            StepFrequency::Annual => (dist.mean, dist.volatility, 1),
            StepFrequency::Monthly => (
                dist.mean / MONTHS_PER_YEAR as f64,
                dist.volatility / (MONTHS_PER_YEAR as f64).sqrt(),
                MONTHS_PER_YEAR,
            ),
        };
        let normal = Normal::new(mean, volatility).map_err(|_| invalid)?;

        Ok(Self {
            normal,
            steps_per_year,
        })
    }

    /// Values at the end of years 1..=years, floored at zero
    fn path<R: rand::Rng + ?Sized>(&self, rng: &mut R, initial: f64, years: usize) -> Vec<f64> {
        let mut value = initial;
        (0..years)
            .map(|_| {
                for _ in 0..self.steps_per_year {
                    let r = self.normal.sample(rng);
                    value = (value * (1.0 + r)).max(0.0);
                }
                value
            })
            .collect()
    }
}

fn batch_rng(seed: u64, batch: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (batch as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn run_batch(
    sampler: &PathSampler,
    initial: f64,
    config: &MonteCarloConfig,
    batch: usize,
    num_batches: usize,
) -> Vec<Vec<f64>> {
    let mut rng = batch_rng(config.seed, batch);
    let batch_size = if batch == num_batches - 1 {
        config.paths - batch * MAX_BATCH_SIZE
    } else {
        MAX_BATCH_SIZE
    };
    (0..batch_size)
        .map(|_| sampler.path(&mut rng, initial, config.years))
        .collect()
}

#[cfg(feature = "parallel")]
fn generate_paths(sampler: &PathSampler, initial: f64, config: &MonteCarloConfig) -> Vec<Vec<f64>> {
    let num_batches = config.paths.div_ceil(MAX_BATCH_SIZE);
    (0..num_batches)
        .into_par_iter()
        .flat_map(|batch| run_batch(sampler, initial, config, batch, num_batches))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn generate_paths(sampler: &PathSampler, initial: f64, config: &MonteCarloConfig) -> Vec<Vec<f64>> {
    let num_batches = config.paths.div_ceil(MAX_BATCH_SIZE);
    (0..num_batches)
        .flat_map(|batch| run_batch(sampler, initial, config, batch, num_batches))
        .collect()
}

/// Linear-interpolated percentile of an ascending slice, `p` in [0, 1]
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// P10/P50/P90 across paths for each simulated year
#[must_use]
pub fn percentile_bands(paths: &[Vec<f64>], years: usize) -> Vec<PercentileBand> {
    let mut column = Vec::with_capacity(paths.len());
    (0..years)
        .map(|y| {
            column.clear();
            column.extend(paths.iter().filter_map(|p| p.get(y).copied()));
            column.sort_by(f64::total_cmp);
            PercentileBand {
                year: y + 1,
                p10: percentile(&column, 0.10),
                p50: percentile(&column, 0.50),
                p90: percentile(&column, 0.90),
            }
        })
        .collect()
}

fn simulate_bands(
    initial: f64,
    dist: ReturnDistribution,
    config: &MonteCarloConfig,
) -> Result<Vec<PercentileBand>, MonteCarloError> {
    config.validate()?;
    let sampler = PathSampler::new(dist, config.step)?;
    let paths = generate_paths(&sampler, initial.max(0.0), config);
    Ok(percentile_bands(&paths, config.years))
}

/// Percentile bands of the liquid bucket compounded at the blended profile return
pub fn simulate_liquid(
    initial: f64,
    dist: ReturnDistribution,
    config: &MonteCarloConfig,
) -> Result<MonteCarloSummary, MonteCarloError> {
    let bands = simulate_bands(initial, dist, config)?;
    Ok(MonteCarloSummary {
        initial_value: initial.max(0.0),
        expected_return: dist.mean,
        volatility: dist.volatility,
        paths: config.paths,
        seed: config.seed,
        bands,
    })
}

fn benchmark_line(initial: f64, rate: f64, years: usize) -> Vec<f64> {
    (1..=years)
        .map(|y| initial * (1.0 + rate).powi(y as i32))
        .collect()
}

/// Simulate the domestic (BRL) and international (USD) segments separately.
///
/// The two segments use independent seeds derived from `config.seed`.
pub fn simulate_segments(
    liquid: f64,
    exchange_rate: f64,
    portfolio: &PortfolioParameters,
    benchmarks: &BenchmarkPremises,
    config: &MonteCarloConfig,
) -> Result<SegmentSimulation, MonteCarloError> {
    let liquid = liquid.max(0.0);
    let domestic_initial = liquid * DOMESTIC_WEIGHT;
    let international_initial = if exchange_rate > 0.0 {
        liquid * INTERNATIONAL_WEIGHT / exchange_rate
    } else {
        0.0
    };

    let domestic_dist = ReturnDistribution {
        mean: portfolio.domestic.expected_return,
        volatility: portfolio.domestic.volatility,
    };
    let international_dist = ReturnDistribution {
        mean: portfolio.international.expected_return,
        volatility: portfolio.international.volatility,
    };
    let international_config = MonteCarloConfig {
        seed: config.seed.wrapping_add(1),
        ..*config
    };

    Ok(SegmentSimulation {
        domestic: SegmentOutcome {
            currency: Currency::Brl,
            initial_value: domestic_initial,
            bands: simulate_bands(domestic_initial, domestic_dist, config)?,
            benchmark: benchmark_line(domestic_initial, benchmarks.domestic, config.years),
            benchmark_rate: benchmarks.domestic,
        },
        international: SegmentOutcome {
            currency: Currency::Usd,
            initial_value: international_initial,
            bands: simulate_bands(international_initial, international_dist, &international_config)?,
            benchmark: benchmark_line(international_initial, benchmarks.international, config.years),
            benchmark_rate: benchmarks.international,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PortfolioTable, RiskProfile};

    fn config(paths: usize, years: usize) -> MonteCarloConfig {
        MonteCarloConfig {
            paths,
            years,
            seed: 7,
            step: StepFrequency::Annual,
        }
    }

    const DIST: ReturnDistribution = ReturnDistribution {
        mean: 0.08,
        volatility: 0.15,
    };

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert!((percentile(&sorted, 0.1) - 1.4).abs() < 1e-12);
        assert!((percentile(&sorted, 0.9) - 4.6).abs() < 1e-12);
        assert_eq!(percentile(&[], 0.5), 0.0);
        assert_eq!(percentile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn test_zero_paths_and_horizon_rejected() {
        assert_eq!(
            simulate_liquid(100.0, DIST, &config(0, 5)).unwrap_err(),
            MonteCarloError::ZeroPaths
        );
        assert_eq!(
            simulate_liquid(100.0, DIST, &config(10, 0)).unwrap_err(),
            MonteCarloError::ZeroHorizon
        );
    }

    #[test]
    fn test_negative_volatility_rejected() {
        let dist = ReturnDistribution {
            mean: 0.05,
            volatility: -0.1,
        };
        assert!(matches!(
            simulate_liquid(100.0, dist, &config(10, 5)),
            Err(MonteCarloError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_bands() {
        let a = simulate_liquid(1_000.0, DIST, &config(250, 10)).unwrap();
        let b = simulate_liquid(1_000.0, DIST, &config(250, 10)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.bands.len(), 10);
        assert_eq!(a.bands[0].year, 1);
        assert_eq!(a.bands[9].year, 10);
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let dist = ReturnDistribution {
            mean: 0.10,
            volatility: 0.0,
        };
        let summary = simulate_liquid(1_000.0, dist, &config(20, 3)).unwrap();
        let expected = 1_000.0 * 1.1_f64.powi(3);
        let last = summary.bands[2];
        assert!((last.p10 - expected).abs() < 1e-9);
        assert!((last.p90 - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_steps_ordered() {
        let cfg = MonteCarloConfig {
            step: StepFrequency::Monthly,
            ..config(300, 5)
        };
        let summary = simulate_liquid(1_000.0, DIST, &cfg).unwrap();
        for band in &summary.bands {
            assert!(band.p10 <= band.p50 && band.p50 <= band.p90);
        }
    }

    #[test]
    fn test_segments_split_liquid() {
        let table = PortfolioTable::default();
        let sim = simulate_segments(
            1_000_000.0,
            5.0,
            table.for_profile(RiskProfile::Conservative),
            &BenchmarkPremises::default(),
            &config(200, 4),
        )
        .unwrap();
        assert!((sim.domestic.initial_value - 700_000.0).abs() < 1e-6);
        assert!((sim.international.initial_value - 60_000.0).abs() < 1e-6);
        assert_eq!(sim.domestic.currency, Currency::Brl);
        assert_eq!(sim.international.benchmark.len(), 4);
        assert!((sim.domestic.benchmark[0] - 700_000.0 * 1.15).abs() < 1e-6);
    }
}
