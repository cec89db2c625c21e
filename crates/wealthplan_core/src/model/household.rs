//! Household facts collected before a projection run
//!
//! `HouseholdForm` is the flat record the intake form produces, with children
//! and illiquid assets given as parallel attribute lists. Converting it into a
//! `HouseholdProfile` validates every field and zips the lists into
//! per-person / per-asset records. All rates are fractions (0.045 = 4.5%).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation;

/// One child of the household at the start of the projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub age: u32,
    /// Enrolled in a fee-paying school while school-aged
    pub in_school: bool,
    /// Attends college abroad (USD-denominated) instead of at home
    pub studies_abroad: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Housing {
    /// Neighbourhood price per square meter (BRL)
    pub price_per_m2: f64,
    pub area_m2: f64,
    /// Cars owned by the couple
    pub cars: u32,
    /// Household staff on top of the area-based baseline
    pub extra_staff: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifestyleTier {
    Essential,
    #[default]
    Comfortable,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Discretionary {
    pub luxury_monthly: f64,
    pub second_residence_monthly: f64,
    pub philanthropy_annual: f64,
}

/// A passive income stream with a BRL and a USD leg, each growing at its own rate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeStream {
    pub brl: f64,
    pub brl_growth: f64,
    pub usd: f64,
    pub usd_growth: f64,
}

/// A declared illiquid holding (property, private stake, art, ...)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IlliquidAsset {
    pub value_brl: f64,
    pub growth_brl: f64,
    pub value_usd: f64,
    pub growth_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroAssumptions {
    pub inflation_brl: f64,
    pub inflation_usd: f64,
    /// BRL per USD at year 0
    pub exchange_rate: f64,
}

impl Default for MacroAssumptions {
    fn default() -> Self {
        Self {
            inflation_brl: 0.045,
            inflation_usd: 0.025,
            exchange_rate: 5.0,
        }
    }
}

/// Immutable snapshot of the household for one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdProfile {
    pub client_age: u32,
    pub spouse_age: Option<u32>,
    pub retirement_age: u32,
    pub children: Vec<Child>,
    pub housing: Housing,
    pub lifestyle: LifestyleTier,
    pub trips_per_year: u32,
    pub discretionary: Discretionary,
    /// Monthly rent received
    pub rent: IncomeStream,
    /// Annual dividends received
    pub dividends: IncomeStream,
    pub illiquid_assets: Vec<IlliquidAsset>,
    /// Investable wealth split between the reserve and the liquid portfolio
    pub initial_wealth: f64,
    pub horizon_years: usize,
    pub macro_assumptions: MacroAssumptions,
}

impl HouseholdProfile {
    #[must_use]
    pub fn has_spouse(&self) -> bool {
        self.spouse_age.is_some()
    }

    /// Client, spouse (if any) and every child
    #[must_use]
    pub fn occupants(&self) -> usize {
        1 + usize::from(self.has_spouse()) + self.children.len()
    }
}

/// Flat intake record as produced by the form collaborator
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdForm {
    pub client_age: u32,
    pub spouse_age: Option<u32>,
    pub retirement_age: u32,
    pub children_ages: Vec<u32>,
    pub children_in_school: Vec<bool>,
    pub children_abroad: Vec<bool>,
    pub price_per_m2: f64,
    pub area_m2: f64,
    pub cars: u32,
    pub extra_staff: u32,
    pub lifestyle: LifestyleTier,
    pub trips_per_year: u32,
    pub luxury_monthly: f64,
    pub second_residence_monthly: f64,
    pub philanthropy_annual: f64,
    pub rent_monthly: IncomeStream,
    pub dividends_annual: IncomeStream,
    pub illiquid_values_brl: Vec<f64>,
    pub illiquid_growth_brl: Vec<f64>,
    pub illiquid_values_usd: Vec<f64>,
    pub illiquid_growth_usd: Vec<f64>,
    pub initial_wealth: f64,
    pub horizon_years: usize,
    pub macro_assumptions: MacroAssumptions,
}

impl TryFrom<HouseholdForm> for HouseholdProfile {
    type Error = ValidationError;

    fn try_from(form: HouseholdForm) -> Result<Self, Self::Error> {
        let child_count = form.children_ages.len();
        validation::check_parallel_len("children_in_school", form.children_in_school.len(), child_count)?;
        validation::check_parallel_len("children_abroad", form.children_abroad.len(), child_count)?;

        let asset_count = form.illiquid_values_brl.len();
        validation::check_parallel_len("illiquid_growth_brl", form.illiquid_growth_brl.len(), asset_count)?;
        validation::check_parallel_len("illiquid_values_usd", form.illiquid_values_usd.len(), asset_count)?;
        validation::check_parallel_len("illiquid_growth_usd", form.illiquid_growth_usd.len(), asset_count)?;

        let children = form
            .children_ages
            .iter()
            .zip(&form.children_in_school)
            .zip(&form.children_abroad)
            .map(|((&age, &in_school), &studies_abroad)| Child {
                age,
                in_school,
                studies_abroad,
            })
            .collect();

        let illiquid_assets = form
            .illiquid_values_brl
            .iter()
            .zip(&form.illiquid_growth_brl)
            .zip(&form.illiquid_values_usd)
            .zip(&form.illiquid_growth_usd)
            .map(|(((&value_brl, &growth_brl), &value_usd), &growth_usd)| IlliquidAsset {
                value_brl,
                growth_brl,
                value_usd,
                growth_usd,
            })
            .collect();

        let profile = HouseholdProfile {
            client_age: form.client_age,
            spouse_age: form.spouse_age,
            retirement_age: form.retirement_age,
            children,
            housing: Housing {
                price_per_m2: form.price_per_m2,
                area_m2: form.area_m2,
                cars: form.cars,
                extra_staff: form.extra_staff,
            },
            lifestyle: form.lifestyle,
            trips_per_year: form.trips_per_year,
            discretionary: Discretionary {
                luxury_monthly: form.luxury_monthly,
                second_residence_monthly: form.second_residence_monthly,
                philanthropy_annual: form.philanthropy_annual,
            },
            rent: form.rent_monthly,
            dividends: form.dividends_annual,
            illiquid_assets,
            initial_wealth: form.initial_wealth,
            horizon_years: form.horizon_years,
            macro_assumptions: form.macro_assumptions,
        };

        validation::validate_household(&profile)?;
        Ok(profile)
    }
}
