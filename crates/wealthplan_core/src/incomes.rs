//! Salary and passive income
//!
//! The salary figure itself comes from outside: typed by the user, looked up
//! through a [`SalaryEstimator`], or a caller-supplied fallback.
//! [`resolve_salary`] picks one and records whether the household ended up
//! without any salary at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{HouseholdProfile, IncomeBreakdown};
use crate::rates::RateModel;

/// Salary inflated at the BRL rate while the client is below retirement age
#[must_use]
pub fn salary(household: &HouseholdProfile, rates: &RateModel, base: f64, year: usize) -> f64 {
    let age = household.client_age.saturating_add(year as u32);
    if age < household.retirement_age {
        (base * rates.brl_factor(year)).max(0.0)
    } else {
        0.0
    }
}

fn grow(amount: f64, rate: f64, year: usize) -> f64 {
    (amount * (1.0 + rate).powi(year as i32)).max(0.0)
}

#[must_use]
pub fn year_incomes(
    household: &HouseholdProfile,
    rates: &RateModel,
    base_salary: f64,
    year: usize,
) -> IncomeBreakdown {
    let fx = rates.exchange_rate(year);
    let rent = &household.rent;
    let dividends = &household.dividends;

    let mut incomes = IncomeBreakdown {
        salary: salary(household, rates, base_salary, year),
        rent_brl: grow(rent.brl * 12.0, rent.brl_growth, year),
        rent_usd: grow(rent.usd * 12.0, rent.usd_growth, year) * fx,
        dividends_brl: grow(dividends.brl, dividends.brl_growth, year),
        dividends_usd: grow(dividends.usd, dividends.usd_growth, year) * fx,
        total: 0.0,
    };
    incomes.total = incomes.salary
        + incomes.rent_brl
        + incomes.rent_usd
        + incomes.dividends_brl
        + incomes.dividends_usd;
    incomes
}

/// Parameters for an external salary lookup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalaryQuery {
    pub role: String,
    pub sector: String,
    pub company: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalaryLookupError {
    /// The service could not be reached or timed out
    Unavailable(String),
    /// The service answered without a usable figure
    NotFound,
}

impl fmt::Display for SalaryLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalaryLookupError::Unavailable(reason) => {
                write!(f, "salary service unavailable: {reason}")
            }
            SalaryLookupError::NotFound => write!(f, "no salary found for the given role"),
        }
    }
}

impl std::error::Error for SalaryLookupError {}

/// External annual-salary lookup
pub trait SalaryEstimator {
    fn estimate(&self, query: &SalaryQuery) -> Result<f64, SalaryLookupError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalarySource {
    User,
    Estimator,
    Fallback,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSalary {
    /// Annual salary at year 0
    pub amount: f64,
    pub source: SalarySource,
}

impl ResolvedSalary {
    #[must_use]
    pub fn user(amount: f64) -> Self {
        Self {
            amount,
            source: SalarySource::User,
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self {
            amount: 0.0,
            source: SalarySource::Missing,
        }
    }

    /// True when no source produced a salary
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.source == SalarySource::Missing
    }
}

fn usable(amount: f64) -> Option<f64> {
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

/// User input wins, then the estimator, then the fallback, else zero
pub fn resolve_salary(
    user: Option<f64>,
    estimator: Option<(&dyn SalaryEstimator, &SalaryQuery)>,
    fallback: Option<f64>,
) -> ResolvedSalary {
    if let Some(amount) = user.and_then(usable) {
        return ResolvedSalary::user(amount);
    }

    if let Some((estimator, query)) = estimator
        && let Ok(estimate) = estimator.estimate(query)
        && let Some(amount) = usable(estimate)
    {
        return ResolvedSalary {
            amount,
            source: SalarySource::Estimator,
        };
    }

    match fallback.and_then(usable) {
        Some(amount) => ResolvedSalary {
            amount,
            source: SalarySource::Fallback,
        },
        None => ResolvedSalary::missing(),
    }
}
