//! Inflation, exchange rate and return parameters
//!
//! Everything here is a pure function of the macro assumptions or of the
//! portfolio table; nothing carries state between years.

use serde::{Deserialize, Serialize};

use crate::model::{Currency, MacroAssumptions, PortfolioTable, RiskProfile};

/// Share of the liquid portfolio (and of the reserve) held in domestic assets
pub const DOMESTIC_WEIGHT: f64 = 0.7;

/// Share held in international assets
pub const INTERNATIONAL_WEIGHT: f64 = 1.0 - DOMESTIC_WEIGHT;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateModel {
    inflation_brl: f64,
    inflation_usd: f64,
    exchange_rate: f64,
}

impl RateModel {
    #[must_use]
    pub fn new(assumptions: &MacroAssumptions) -> Self {
        Self {
            inflation_brl: assumptions.inflation_brl,
            inflation_usd: assumptions.inflation_usd,
            exchange_rate: assumptions.exchange_rate,
        }
    }

    /// Year-0 exchange rate (BRL per USD)
    #[must_use]
    pub fn initial_exchange_rate(&self) -> f64 {
        self.exchange_rate
    }

    /// Cumulative BRL inflation `(1 + b)^year`
    #[must_use]
    pub fn brl_factor(&self, year: usize) -> f64 {
        compound(self.inflation_brl, year)
    }

    /// Cumulative USD inflation `(1 + u)^year`
    #[must_use]
    pub fn usd_factor(&self, year: usize) -> f64 {
        compound(self.inflation_usd, year)
    }

    #[must_use]
    pub fn inflation_factor(&self, currency: Currency, year: usize) -> f64 {
        match currency {
            Currency::Brl => self.brl_factor(year),
            Currency::Usd => self.usd_factor(year),
        }
    }

    /// `((1 + b) / (1 + u))^year`
    #[must_use]
    pub fn relative_factor(&self, year: usize) -> f64 {
        ((1.0 + self.inflation_brl) / (1.0 + self.inflation_usd)).powi(year as i32)
    }

    /// Projected exchange rate, drifting with the inflation differential
    #[must_use]
    pub fn exchange_rate(&self, year: usize) -> f64 {
        self.exchange_rate * self.relative_factor(year)
    }

    #[must_use]
    pub fn exchange_rate_series(&self, horizon: usize) -> Vec<f64> {
        (0..horizon).map(|year| self.exchange_rate(year)).collect()
    }

    /// Display adjustment for the liquid bucket's 30% USD exposure
    #[must_use]
    pub fn fx_mix_factor(&self, year: usize) -> f64 {
        DOMESTIC_WEIGHT + INTERNATIONAL_WEIGHT * self.relative_factor(year)
    }

    /// Divisor turning nominal BRL into year-0 BRL
    #[must_use]
    pub fn deflator(&self, year: usize) -> f64 {
        self.brl_factor(year)
    }

    #[must_use]
    pub fn to_brl(&self, amount: f64, currency: Currency, year: usize) -> f64 {
        match currency {
            Currency::Brl => amount,
            Currency::Usd => amount * self.exchange_rate(year),
        }
    }
}

fn compound(rate: f64, year: usize) -> f64 {
    (1.0 + rate).powi(year as i32)
}

/// Mean and standard deviation of an annual return
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnDistribution {
    pub mean: f64,
    pub volatility: f64,
}

/// Blended 70/30 return distribution for a risk profile
#[must_use]
pub fn profile_returns(table: &PortfolioTable, profile: RiskProfile) -> ReturnDistribution {
    let params = table.for_profile(profile);
    ReturnDistribution {
        mean: params.blended_return(),
        volatility: params.blended_volatility(),
    }
}

/// Domestic and international distributions for a risk profile
#[must_use]
pub fn segment_returns(
    table: &PortfolioTable,
    profile: RiskProfile,
) -> (ReturnDistribution, ReturnDistribution) {
    let params = table.for_profile(profile);
    (
        ReturnDistribution {
            mean: params.domestic.expected_return,
            volatility: params.domestic.volatility,
        },
        ReturnDistribution {
            mean: params.international.expected_return,
            volatility: params.international.volatility,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RateModel {
        RateModel::new(&MacroAssumptions {
            inflation_brl: 0.045,
            inflation_usd: 0.025,
            exchange_rate: 5.0,
        })
    }

    #[test]
    fn test_exchange_rate_drift() {
        let rates = model();
        assert_eq!(rates.exchange_rate(0), 5.0);
        let expected = 5.0 * (1.045_f64 / 1.025).powi(3);
        assert!((rates.exchange_rate(3) - expected).abs() < 1e-12);

        let series = rates.exchange_rate_series(4);
        assert_eq!(series.len(), 4);
        assert!(series.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_fx_mix_factor_starts_at_one() {
        let rates = model();
        assert!((rates.fx_mix_factor(0) - 1.0).abs() < 1e-12);
        let expected = 0.7 + 0.3 * (1.045_f64 / 1.025).powi(10);
        assert!((rates.fx_mix_factor(10) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_usd_conversion_uses_projected_rate() {
        let rates = model();
        assert_eq!(rates.to_brl(100.0, Currency::Brl, 5), 100.0);
        assert!((rates.to_brl(100.0, Currency::Usd, 2) - 100.0 * rates.exchange_rate(2)).abs() < 1e-9);
    }

    #[test]
    fn test_profile_returns_blend() {
        let table = PortfolioTable::default();
        let dist = profile_returns(&table, RiskProfile::Aggressive);
        assert!((dist.mean - (0.7 * 0.202 + 0.3 * 0.095)).abs() < 1e-12);
        let (dom, intl) = segment_returns(&table, RiskProfile::Aggressive);
        assert_eq!(dom.volatility, 0.068);
        assert_eq!(intl.mean, 0.095);
    }
}
