//! Cost and return premises
//!
//! Every constant the expense, income and allocation formulas read lives here.
//! `Premises::default()` holds the reference values; a household file can
//! override any subset because every section is `#[serde(default)]`.

use serde::{Deserialize, Serialize};

use super::portfolio::PortfolioTable;

/// An amount that applies to an inclusive age range.
/// `max_age = None` means the band is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: u32,
    #[serde(default)]
    pub max_age: Option<u32>,
    pub amount: f64,
}

impl AgeBand {
    #[must_use]
    pub const fn new(min_age: u32, max_age: u32, amount: f64) -> Self {
        Self {
            min_age,
            max_age: Some(max_age),
            amount,
        }
    }

    #[must_use]
    pub const fn open(min_age: u32, amount: f64) -> Self {
        Self {
            min_age,
            max_age: None,
            amount,
        }
    }

    #[must_use]
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min_age && self.max_age.is_none_or(|max| age <= max)
    }
}

/// First band containing `age`, if any
#[must_use]
pub fn band_amount(bands: &[AgeBand], age: u32) -> Option<f64> {
    bands.iter().find(|b| b.contains(age)).map(|b| b.amount)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingPremises {
    /// Yearly maintenance as a fraction of the property value
    pub maintenance_rate: f64,
    /// Base staff per square meter (2 per 1000 m²)
    pub staff_per_m2: f64,
    pub staff_cost: f64,
    pub extra_staff_cost: f64,
    pub base_per_occupant: f64,
}

impl Default for HousingPremises {
    fn default() -> Self {
        Self {
            maintenance_rate: 0.02,
            staff_per_m2: 0.002,
            staff_cost: 60_000.0,
            extra_staff_cost: 48_000.0,
            base_per_occupant: 30_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationPremises {
    /// Yearly school fee by age, charged only while enrolled and at most `school_max_age`
    pub school_fees: Vec<AgeBand>,
    pub school_max_age: u32,
    pub college_min_age: u32,
    pub college_max_age: u32,
    /// Yearly domestic college cost (BRL)
    pub domestic_college: f64,
    /// Yearly foreign college cost (USD)
    pub foreign_college_usd: f64,
    /// Yearly allowance by age (BRL)
    pub allowances: Vec<AgeBand>,
}

impl Default for EducationPremises {
    fn default() -> Self {
        Self {
            school_fees: vec![
                AgeBand::new(2, 5, 50_000.0),
                AgeBand::new(6, 14, 80_000.0),
                AgeBand::new(15, 17, 100_000.0),
            ],
            school_max_age: 17,
            college_min_age: 18,
            college_max_age: 21,
            domestic_college: 60_000.0,
            foreign_college_usd: 50_000.0,
            allowances: vec![
                AgeBand::new(10, 13, 500.0 * 12.0),
                AgeBand::new(14, 17, 1_500.0 * 12.0),
                AgeBand::new(18, 21, 2_500.0 * 12.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthPremises {
    pub bands: Vec<AgeBand>,
    /// Flat yearly cost per household occupant
    pub base_per_occupant: f64,
    /// Children at or above this age are no longer covered
    pub dependent_age_limit: u32,
}

impl Default for HealthPremises {
    fn default() -> Self {
        Self {
            bands: vec![
                AgeBand::new(0, 18, 15_000.0),
                AgeBand::new(19, 35, 20_000.0),
                AgeBand::new(36, 50, 30_000.0),
                AgeBand::new(51, 65, 45_000.0),
                AgeBand::open(66, 60_000.0),
            ],
            base_per_occupant: 10_000.0,
            dependent_age_limit: 26,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehiclePremises {
    /// Yearly maintenance, insurance and fuel per car
    pub annual_cost: f64,
    /// One-time purchase when a child reaches `child_car_age`
    pub child_purchase_cost: f64,
    pub child_car_age: u32,
    /// Last age at which the child keeps the car
    pub child_car_until: u32,
}

impl Default for VehiclePremises {
    fn default() -> Self {
        Self {
            annual_cost: 50_000.0,
            child_purchase_cost: 200_000.0,
            child_car_age: 18,
            child_car_until: 25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierCost {
    pub couple: f64,
    pub per_child: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifestylePremises {
    pub essential: TierCost,
    pub comfortable: TierCost,
    pub premium: TierCost,
}

impl Default for LifestylePremises {
    fn default() -> Self {
        Self {
            essential: TierCost {
                couple: 20_000.0,
                per_child: 5_000.0,
            },
            comfortable: TierCost {
                couple: 50_000.0,
                per_child: 12_000.0,
            },
            premium: TierCost {
                couple: 100_000.0,
                per_child: 25_000.0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TravelPremises {
    /// Cost of one international trip for the couple (USD)
    pub couple_usd: f64,
    /// Per-child addon per trip by age (USD)
    pub child_addons_usd: Vec<AgeBand>,
}

impl Default for TravelPremises {
    fn default() -> Self {
        Self {
            couple_usd: 10_000.0,
            child_addons_usd: vec![
                AgeBand::new(0, 6, 2_000.0),
                AgeBand::new(7, 12, 3_000.0),
                AgeBand::open(13, 5_000.0),
            ],
        }
    }
}

/// Required returns used to value income streams as growing perpetuities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationPremises {
    pub rental_brl_rate: f64,
    pub rental_usd_rate: f64,
    pub dividends_brl_rate: f64,
    pub dividends_usd_rate: f64,
}

impl Default for ValuationPremises {
    fn default() -> Self {
        Self {
            rental_brl_rate: 0.15,
            rental_usd_rate: 0.07,
            dividends_brl_rate: 0.19,
            dividends_usd_rate: 0.11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservePremises {
    pub domestic_rate: f64,
    pub international_rate: f64,
    /// Number of years of expenses (starting at the current one) the reserve covers
    pub coverage_years: usize,
    /// Fraction of investable wealth held when near-term expenses are covered by income
    pub minimum_fraction: f64,
}

impl Default for ReservePremises {
    fn default() -> Self {
        Self {
            domestic_rate: 0.15,
            international_rate: 0.045,
            coverage_years: 4,
            minimum_fraction: 0.10,
        }
    }
}

/// Benchmark lines drawn next to the segment simulations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkPremises {
    pub domestic: f64,
    pub international: f64,
}

impl Default for BenchmarkPremises {
    fn default() -> Self {
        Self {
            domestic: 0.15,
            international: 0.04,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Premises {
    pub housing: HousingPremises,
    pub education: EducationPremises,
    pub health: HealthPremises,
    pub vehicles: VehiclePremises,
    pub lifestyle: LifestylePremises,
    pub travel: TravelPremises,
    pub valuation: ValuationPremises,
    pub reserve: ReservePremises,
    pub benchmarks: BenchmarkPremises,
    pub portfolios: PortfolioTable,
}
