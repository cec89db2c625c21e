//! Safety reserve, liquid portfolio and illiquid holdings
//!
//! The reserve and the liquid portfolio move together as a [`BucketState`]:
//! each year the state is matured (reserve at the fixed blended rate, liquid
//! at the profile's expected return after absorbing the net cash flow) and
//! then rebalanced so that the reserve sits exactly at the next requirement.
//! Illiquid holdings do not interact with the other two buckets; their value
//! is a closed-form function of the year.

use serde::{Deserialize, Serialize};

use crate::model::{
    HouseholdProfile, PortfolioParameters, ReservePremises, ValuationPremises,
};
use crate::rates::{DOMESTIC_WEIGHT, INTERNATIONAL_WEIGHT};

/// Yearly rate earned by the safety reserve
#[must_use]
pub fn reserve_rate(premises: &ReservePremises) -> f64 {
    DOMESTIC_WEIGHT * premises.domestic_rate + INTERNATIONAL_WEIGHT * premises.international_rate
}

/// Reserve needed at the start of `year`.
///
/// Covers the expenses of `year` and the following years (up to
/// `coverage_years`, clipped to the horizon) net of the year's income. When
/// income already covers everything beyond the current year's expenses, the
/// reserve falls back to a fraction of investable wealth.
#[must_use]
pub fn reserve_requirement(
    expenses: &[f64],
    incomes: &[f64],
    year: usize,
    investable: f64,
    premises: &ReservePremises,
) -> f64 {
    let Some(&current) = expenses.get(year) else {
        return 0.0;
    };
    let income = incomes.get(year).copied().unwrap_or(0.0);
    let end = (year + premises.coverage_years).min(expenses.len());
    let shortfall = expenses[year..end].iter().sum::<f64>() - income;

    let requirement = if shortfall < current {
        premises.minimum_fraction * investable
    } else {
        shortfall
    };
    requirement.max(0.0)
}

/// Reserve and liquid values at the start of a year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketState {
    pub reserve: f64,
    pub liquid: f64,
}

/// Buckets after one year of returns, before rebalancing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaturedBuckets {
    pub reserve: f64,
    pub liquid: f64,
    pub reserve_return: f64,
    pub liquid_return: f64,
}

impl BucketState {
    /// Opening state: the reserve takes its requirement, the rest goes to liquid
    #[must_use]
    pub fn initial(initial_wealth: f64, requirement: f64) -> Self {
        Self {
            reserve: requirement.max(0.0),
            liquid: (initial_wealth - requirement).max(0.0),
        }
    }

    #[must_use]
    pub fn investable(&self) -> f64 {
        self.reserve + self.liquid
    }

    /// Apply one year of cash flow and returns
    #[must_use]
    pub fn mature(self, net_cash_flow: f64, liquid_rate: f64, reserve_rate: f64) -> MaturedBuckets {
        let reserve = (self.reserve * (1.0 + reserve_rate)).max(0.0);
        let base = (self.liquid + net_cash_flow).max(0.0);
        let liquid = (base * (1.0 + liquid_rate)).max(0.0);

        MaturedBuckets {
            reserve,
            liquid,
            reserve_return: reserve - self.reserve,
            liquid_return: liquid - base,
        }
    }
}

impl MaturedBuckets {
    #[must_use]
    pub fn investable(&self) -> f64 {
        self.reserve + self.liquid
    }

    /// Move money between liquid and reserve so the reserve equals `requirement`
    #[must_use]
    pub fn rebalance(self, requirement: f64) -> BucketState {
        let requirement = requirement.max(0.0);
        let transfer = requirement - self.reserve;
        BucketState {
            reserve: requirement,
            liquid: (self.liquid - transfer).max(0.0),
        }
    }
}

/// `flow / (required - growth)`, zero when the denominator is not positive
#[must_use]
pub fn growing_perpetuity(flow: f64, required_return: f64, growth: f64) -> f64 {
    let denominator = required_return - growth;
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (flow / denominator).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Component {
    value: f64,
    growth: f64,
}

impl Component {
    fn at(&self, year: usize) -> f64 {
        (self.value * (1.0 + self.growth).powi(year as i32)).max(0.0)
    }
}

/// Illiquid holdings in BRL, split by origin
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IlliquidBreakdown {
    pub rental: f64,
    pub equity: f64,
    pub declared: f64,
    pub total: f64,
}

/// Year-0 valuations of every illiquid component with their growth rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlliquidValuation {
    rental: [Component; 2],
    equity: [Component; 2],
    declared: Vec<Component>,
}

impl IlliquidValuation {
    /// Rent and dividends are capitalized as growing perpetuities; USD values
    /// are converted once at the initial exchange rate.
    #[must_use]
    pub fn new(household: &HouseholdProfile, premises: &ValuationPremises) -> Self {
        let fx = household.macro_assumptions.exchange_rate;
        let rent = &household.rent;
        let div = &household.dividends;

        let rental = [
            Component {
                value: growing_perpetuity(rent.brl * 12.0, premises.rental_brl_rate, rent.brl_growth),
                growth: rent.brl_growth,
            },
            Component {
                value: growing_perpetuity(rent.usd * 12.0, premises.rental_usd_rate, rent.usd_growth)
                    * fx,
                growth: rent.usd_growth,
            },
        ];
        let equity = [
            Component {
                value: growing_perpetuity(div.brl, premises.dividends_brl_rate, div.brl_growth),
                growth: div.brl_growth,
            },
            Component {
                value: growing_perpetuity(div.usd, premises.dividends_usd_rate, div.usd_growth) * fx,
                growth: div.usd_growth,
            },
        ];
        let declared = household
            .illiquid_assets
            .iter()
            .flat_map(|asset| {
                [
                    Component {
                        value: asset.value_brl,
                        growth: asset.growth_brl,
                    },
                    Component {
                        value: asset.value_usd * fx,
                        growth: asset.growth_usd,
                    },
                ]
            })
            .collect();

        Self {
            rental,
            equity,
            declared,
        }
    }

    #[must_use]
    pub fn breakdown(&self, year: usize) -> IlliquidBreakdown {
        let rental: f64 = self.rental.iter().map(|c| c.at(year)).sum();
        let equity: f64 = self.equity.iter().map(|c| c.at(year)).sum();
        let declared: f64 = self.declared.iter().map(|c| c.at(year)).sum();
        IlliquidBreakdown {
            rental,
            equity,
            declared,
            total: rental + equity + declared,
        }
    }

    #[must_use]
    pub fn value_at(&self, year: usize) -> f64 {
        self.breakdown(year).total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAllocation {
    pub name: String,
    pub weight_pct: f64,
    pub amount: f64,
}

/// Liquid bucket distributed over the profile's asset classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedAllocation {
    /// Domestic classes, in BRL
    pub domestic: Vec<ClassAllocation>,
    /// International classes, in USD
    pub international: Vec<ClassAllocation>,
    pub domestic_total_brl: f64,
    pub international_total_usd: f64,
}

#[must_use]
pub fn recommended_allocation(
    portfolio: &PortfolioParameters,
    liquid: f64,
    exchange_rate: f64,
) -> RecommendedAllocation {
    let liquid = liquid.max(0.0);
    let domestic_total_brl = liquid * DOMESTIC_WEIGHT;
    let international_total_usd = if exchange_rate > 0.0 {
        liquid * INTERNATIONAL_WEIGHT / exchange_rate
    } else {
        0.0
    };

    let split = |classes: &[crate::model::AssetClassWeight], total: f64| {
        classes
            .iter()
            .map(|c| ClassAllocation {
                name: c.name.clone(),
                weight_pct: c.weight_pct,
                amount: total * c.weight_pct / 100.0,
            })
            .collect::<Vec<_>>()
    };

    RecommendedAllocation {
        domestic: split(&portfolio.domestic.classes, domestic_total_brl),
        international: split(&portfolio.international.classes, international_total_usd),
        domestic_total_brl,
        international_total_usd,
    }
}
