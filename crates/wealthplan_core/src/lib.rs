//! Household wealth projection and risk engine
//!
//! This crate turns a household's demographic, housing, lifestyle, income and
//! macroeconomic facts into:
//! - a risk score and profile from an adaptive questionnaire
//! - a deterministic year-by-year table of expenses, incomes and three wealth
//!   buckets (safety reserve, liquid portfolio, illiquid holdings)
//! - Monte Carlo percentile bands for the liquid portfolio
//!
//! Amounts are BRL unless a field says otherwise; USD categories are
//! converted at a projected exchange rate that drifts with the inflation
//! differential.
//!
//! ```ignore
//! use wealthplan_core::{model::HouseholdProfile, projection::{ProjectionInput, project}};
//!
//! let household = HouseholdProfile::try_from(form)?;
//! let outcome = wealthplan_core::risk::assess(&[true, false, true], &behavior)?;
//! let projection = project(&ProjectionInput {
//!     household,
//!     risk: outcome.score,
//!     salary: ResolvedSalary::user(480_000.0),
//!     scales: CategoryScales::default(),
//!     premises: Premises::default(),
//!     start_date: None,
//! })?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod allocation;
pub mod error;
pub mod expenses;
pub mod incomes;
pub mod monte_carlo;
pub mod projection;
pub mod rates;
pub mod risk;
pub mod validation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{MonteCarloError, ProjectionError, RiskError, ValidationError};
pub use monte_carlo::{MonteCarloConfig, StepFrequency, simulate_liquid, simulate_segments};
pub use projection::{Projection, ProjectionInput, Projector, project};
