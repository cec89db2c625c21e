//! Cross-module tests for the projection engine
//!
//! Tests are organized by topic:
//! - `scenario` - End-to-end household scenario with hand-checked figures
//! - `buckets` - Reserve, liquid and illiquid bucket behaviour across years
//! - `simulation` - Monte Carlo fed from a projection
//! - `properties` - Property tests over arbitrary valid inputs

mod properties;
mod scenario;

use crate::expenses::CategoryScales;
use crate::incomes::ResolvedSalary;
use crate::model::{
    Child, Discretionary, HouseholdProfile, Housing, LifestyleTier, MacroAssumptions, Premises,
    RiskScore,
};
use crate::projection::ProjectionInput;

/// Client aged 45, no spouse, one child aged 10 in a domestic school
pub(crate) fn single_parent() -> HouseholdProfile {
    HouseholdProfile {
        client_age: 45,
        spouse_age: None,
        retirement_age: 65,
        children: vec![Child {
            age: 10,
            in_school: true,
            studies_abroad: false,
        }],
        housing: Housing {
            price_per_m2: 12_000.0,
            area_m2: 200.0,
            cars: 1,
            extra_staff: 1,
        },
        lifestyle: LifestyleTier::Comfortable,
        trips_per_year: 1,
        discretionary: Discretionary {
            luxury_monthly: 2_000.0,
            second_residence_monthly: 0.0,
            philanthropy_annual: 10_000.0,
        },
        rent: Default::default(),
        dividends: Default::default(),
        illiquid_assets: vec![],
        initial_wealth: 1_000_000.0,
        horizon_years: 20,
        macro_assumptions: MacroAssumptions {
            inflation_brl: 0.045,
            inflation_usd: 0.025,
            exchange_rate: 5.0,
        },
    }
}

pub(crate) fn input_for(household: HouseholdProfile, salary: f64, score: i32) -> ProjectionInput {
    ProjectionInput {
        household,
        risk: RiskScore::clamped(score),
        salary: ResolvedSalary::user(salary),
        scales: CategoryScales::default(),
        premises: Premises::default(),
        start_date: None,
    }
}
