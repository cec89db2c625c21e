//! Per-year expense formulas
//!
//! Each [`ExpenseCategory`] maps to one base-amount function evaluated at
//! today's prices for the household composition of year `i` (every age is
//! `initial_age + i`). The shared pipeline then inflates the base amount in
//! the category's currency, applies the caller's scale factor, converts to BRL
//! at the year's exchange rate and floors the result at zero.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::{
    Child, ExpenseBreakdown, ExpenseCategory, ExpenseItem, HouseholdProfile, LifestyleTier,
    Premises, band_amount,
};
use crate::rates::RateModel;

pub const MIN_SCALE: f64 = 0.0;
pub const MAX_SCALE: f64 = 2.0;
pub const DEFAULT_SCALE: f64 = 1.0;

/// Everything a category formula may read for one year
#[derive(Debug, Clone, Copy)]
pub struct YearContext<'a> {
    pub household: &'a HouseholdProfile,
    pub premises: &'a Premises,
    pub rates: &'a RateModel,
    pub year: usize,
}

impl<'a> YearContext<'a> {
    #[must_use]
    pub fn new(
        household: &'a HouseholdProfile,
        premises: &'a Premises,
        rates: &'a RateModel,
        year: usize,
    ) -> Self {
        Self {
            household,
            premises,
            rates,
            year,
        }
    }

    #[must_use]
    pub fn age(&self, initial: u32) -> u32 {
        initial.saturating_add(self.year as u32)
    }

    #[must_use]
    pub fn client_age(&self) -> u32 {
        self.age(self.household.client_age)
    }

    #[must_use]
    pub fn spouse_age(&self) -> Option<u32> {
        self.household.spouse_age.map(|age| self.age(age))
    }

    /// Each child paired with their age this year
    pub fn children(&self) -> impl Iterator<Item = (&'a Child, u32)> + '_ {
        self.household
            .children
            .iter()
            .map(move |child| (child, self.age(child.age)))
    }
}

type Formula = fn(&YearContext<'_>) -> f64;

impl ExpenseCategory {
    /// Base amount at today's prices, in the category's native currency
    fn formula(self) -> Formula {
        match self {
            ExpenseCategory::Housing => housing,
            ExpenseCategory::EducationDomestic => education_domestic,
            ExpenseCategory::EducationAbroad => education_abroad,
            ExpenseCategory::Health => health,
            ExpenseCategory::Vehicles => vehicles,
            ExpenseCategory::Lifestyle => lifestyle,
            ExpenseCategory::Travel => travel,
            ExpenseCategory::SecondResidence => second_residence,
            ExpenseCategory::Luxury => luxury,
            ExpenseCategory::Philanthropy => philanthropy,
        }
    }

    /// Inflated amount in the native currency, before scaling
    #[must_use]
    pub fn raw_amount(self, ctx: &YearContext<'_>) -> f64 {
        let base = (self.formula())(ctx);
        (base * ctx.rates.inflation_factor(self.currency(), ctx.year)).max(0.0)
    }
}

/// Base staff is `ceil(area * staff_per_m2)` with no one-person floor, so a
/// zero-area home carries no base staff.
fn housing(ctx: &YearContext<'_>) -> f64 {
    let h = &ctx.household.housing;
    let p = &ctx.premises.housing;

    let maintenance = h.price_per_m2 * h.area_m2 * p.maintenance_rate;
    let base_staff = (h.area_m2 * p.staff_per_m2).ceil();
    let staff = base_staff * p.staff_cost + f64::from(h.extra_staff) * p.extra_staff_cost;
    let occupants = ctx.household.occupants() as f64 * p.base_per_occupant;

    maintenance + staff + occupants
}

fn education_domestic(ctx: &YearContext<'_>) -> f64 {
    let p = &ctx.premises.education;
    ctx.children()
        .map(|(child, age)| {
            let school = if child.in_school && age <= p.school_max_age {
                band_amount(&p.school_fees, age).unwrap_or(0.0)
            } else {
                0.0
            };
            let college = if !child.studies_abroad && in_college(ctx, age) {
                p.domestic_college
            } else {
                0.0
            };
            let allowance = band_amount(&p.allowances, age).unwrap_or(0.0);
            school + college + allowance
        })
        .sum()
}

fn education_abroad(ctx: &YearContext<'_>) -> f64 {
    let p = &ctx.premises.education;
    ctx.children()
        .filter(|(child, age)| child.studies_abroad && in_college(ctx, *age))
        .map(|_| p.foreign_college_usd)
        .sum()
}

fn in_college(ctx: &YearContext<'_>, age: u32) -> bool {
    let p = &ctx.premises.education;
    (p.college_min_age..=p.college_max_age).contains(&age)
}

fn health(ctx: &YearContext<'_>) -> f64 {
    let p = &ctx.premises.health;
    let cost = |age| band_amount(&p.bands, age).unwrap_or(0.0);

    let adults = cost(ctx.client_age()) + ctx.spouse_age().map_or(0.0, cost);
    let children: f64 = ctx
        .children()
        .filter(|(_, age)| *age < p.dependent_age_limit)
        .map(|(_, age)| cost(age))
        .sum();
    let base = ctx.household.occupants() as f64 * p.base_per_occupant;

    adults + children + base
}

fn vehicles(ctx: &YearContext<'_>) -> f64 {
    let p = &ctx.premises.vehicles;
    let couple = f64::from(ctx.household.housing.cars) * p.annual_cost;

    // Only children who turn `child_car_age` inside the horizon get a car
    let children: f64 = ctx
        .children()
        .filter(|(child, _)| child.age <= p.child_car_age)
        .map(|(_, age)| {
            let purchase = if age == p.child_car_age {
                p.child_purchase_cost
            } else {
                0.0
            };
            let upkeep = if (p.child_car_age..=p.child_car_until).contains(&age) {
                p.annual_cost
            } else {
                0.0
            };
            purchase + upkeep
        })
        .sum();

    couple + children
}

fn lifestyle(ctx: &YearContext<'_>) -> f64 {
    let tiers = &ctx.premises.lifestyle;
    let tier = match ctx.household.lifestyle {
        LifestyleTier::Essential => tiers.essential,
        LifestyleTier::Comfortable => tiers.comfortable,
        LifestyleTier::Premium => tiers.premium,
    };
    tier.couple + tier.per_child * ctx.household.children.len() as f64
}

fn travel(ctx: &YearContext<'_>) -> f64 {
    let p = &ctx.premises.travel;
    let addons: f64 = ctx
        .children()
        .map(|(_, age)| band_amount(&p.child_addons_usd, age).unwrap_or(0.0))
        .sum();
    f64::from(ctx.household.trips_per_year) * (p.couple_usd + addons)
}

fn second_residence(ctx: &YearContext<'_>) -> f64 {
    ctx.household.discretionary.second_residence_monthly * 12.0
}

fn luxury(ctx: &YearContext<'_>) -> f64 {
    ctx.household.discretionary.luxury_monthly * 12.0
}

fn philanthropy(ctx: &YearContext<'_>) -> f64 {
    ctx.household.discretionary.philanthropy_annual
}

/// Multiplicative adjustment per category, 1.0 when not set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryScales(FxHashMap<ExpenseCategory, f64>);

impl CategoryScales {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category: ExpenseCategory, factor: f64) -> Result<(), ValidationError> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&factor) {
            return Err(ValidationError::new(
                format!("scales.{}", category.label().to_lowercase()),
                format!("must be between {MIN_SCALE} and {MAX_SCALE}, got {factor}"),
            ));
        }
        self.0.insert(category, factor);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, category: ExpenseCategory) -> f64 {
        self.0.get(&category).copied().unwrap_or(DEFAULT_SCALE)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExpenseCategory, f64)> + '_ {
        self.0.iter().map(|(c, f)| (*c, *f))
    }
}

/// All category subtotals for one year
#[must_use]
pub fn year_expenses(ctx: &YearContext<'_>, scales: &CategoryScales) -> ExpenseBreakdown {
    let items = ExpenseCategory::ALL
        .iter()
        .map(|&category| {
            let native = (category.raw_amount(ctx) * scales.get(category)).max(0.0);
            ExpenseItem {
                category,
                native,
                brl: ctx.rates.to_brl(native, category.currency(), ctx.year),
            }
        })
        .collect();
    ExpenseBreakdown::from_items(items)
}

/// Year-0 native-currency amount of every category at scale 1.0
#[must_use]
pub fn baseline_costs(household: &HouseholdProfile, premises: &Premises) -> ExpenseBreakdown {
    let rates = RateModel::new(&household.macro_assumptions);
    let ctx = YearContext::new(household, premises, &rates, 0);
    year_expenses(&ctx, &CategoryScales::default())
}

/// Scale that turns `baseline` into `target`, clamped to the allowed range
#[must_use]
pub fn scale_for_target(baseline: f64, target: f64) -> f64 {
    if baseline <= 0.0 || !baseline.is_finite() || !target.is_finite() {
        return DEFAULT_SCALE;
    }
    (target / baseline).clamp(MIN_SCALE, MAX_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Discretionary, Housing, MacroAssumptions};

    fn household(children: Vec<Child>) -> HouseholdProfile {
        HouseholdProfile {
            client_age: 45,
            spouse_age: Some(43),
            retirement_age: 65,
            children,
            housing: Housing {
                price_per_m2: 10_000.0,
                area_m2: 300.0,
                cars: 2,
                extra_staff: 1,
            },
            lifestyle: LifestyleTier::Comfortable,
            trips_per_year: 2,
            discretionary: Discretionary {
                luxury_monthly: 1_000.0,
                second_residence_monthly: 2_000.0,
                philanthropy_annual: 5_000.0,
            },
            rent: Default::default(),
            dividends: Default::default(),
            illiquid_assets: vec![],
            initial_wealth: 1_000_000.0,
            horizon_years: 10,
            macro_assumptions: MacroAssumptions::default(),
        }
    }

    fn child(age: u32, in_school: bool, studies_abroad: bool) -> Child {
        Child {
            age,
            in_school,
            studies_abroad,
        }
    }

    fn amount(h: &HouseholdProfile, category: ExpenseCategory, year: usize) -> f64 {
        let premises = Premises::default();
        let rates = RateModel::new(&h.macro_assumptions);
        let ctx = YearContext::new(h, &premises, &rates, year);
        (category.formula())(&ctx)
    }

    #[test]
    fn test_housing_formula() {
        let h = household(vec![child(5, true, false)]);
        // 3M * 2% + ceil(0.6) * 60k + 48k + 3 occupants * 30k
        let expected = 60_000.0 + 60_000.0 + 48_000.0 + 90_000.0;
        assert!((amount(&h, ExpenseCategory::Housing, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_housing_zero_area_has_no_base_staff() {
        let mut h = household(vec![]);
        h.housing.area_m2 = 0.0;
        h.housing.extra_staff = 0;
        assert_eq!(amount(&h, ExpenseCategory::Housing, 0), 60_000.0);
    }

    #[test]
    fn test_school_fees_follow_age() {
        let h = household(vec![child(4, true, false)]);
        assert_eq!(amount(&h, ExpenseCategory::EducationDomestic, 0), 50_000.0);
        // age 6
        assert_eq!(amount(&h, ExpenseCategory::EducationDomestic, 2), 80_000.0);
        // age 10: school + allowance
        assert_eq!(amount(&h, ExpenseCategory::EducationDomestic, 6), 86_000.0);
    }

    #[test]
    fn test_not_enrolled_pays_only_allowance() {
        let h = household(vec![child(12, false, false)]);
        assert_eq!(amount(&h, ExpenseCategory::EducationDomestic, 0), 6_000.0);
    }

    #[test]
    fn test_college_domestic_vs_abroad() {
        let home = household(vec![child(18, false, false)]);
        assert_eq!(amount(&home, ExpenseCategory::EducationDomestic, 0), 90_000.0);
        assert_eq!(amount(&home, ExpenseCategory::EducationAbroad, 0), 0.0);

        let abroad = household(vec![child(18, false, true)]);
        assert_eq!(amount(&abroad, ExpenseCategory::EducationDomestic, 0), 30_000.0);
        assert_eq!(amount(&abroad, ExpenseCategory::EducationAbroad, 0), 50_000.0);
        // age 22: finished
        assert_eq!(amount(&abroad, ExpenseCategory::EducationAbroad, 4), 0.0);
    }

    #[test]
    fn test_health_covers_children_under_limit() {
        let h = household(vec![child(25, false, false)]);
        // client 45 -> 30k, spouse 43 -> 30k, child 25 -> 20k, 3 occupants * 10k
        assert_eq!(amount(&h, ExpenseCategory::Health, 0), 110_000.0);
        // one year later the child is 26 and no longer covered
        assert_eq!(amount(&h, ExpenseCategory::Health, 1), 30_000.0 + 30_000.0 + 30_000.0);
    }

    #[test]
    fn test_child_car_lifecycle() {
        let h = household(vec![child(17, true, false)]);
        let couple = 2.0 * 50_000.0;
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 0), couple);
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 1), couple + 200_000.0 + 50_000.0);
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 2), couple + 50_000.0);
        // age 25 still keeps it, age 26 does not
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 8), couple + 50_000.0);
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 9), couple);
    }

    #[test]
    fn test_older_child_never_gets_car() {
        let h = household(vec![child(20, false, false)]);
        assert_eq!(amount(&h, ExpenseCategory::Vehicles, 0), 100_000.0);
    }

    #[test]
    fn test_travel_addons() {
        let h = household(vec![child(6, true, false), child(13, true, false)]);
        // 2 trips * (10k + 2k + 5k)
        assert_eq!(amount(&h, ExpenseCategory::Travel, 0), 34_000.0);
        // next year the first child is 7
        assert_eq!(amount(&h, ExpenseCategory::Travel, 1), 36_000.0);
    }

    #[test]
    fn test_empty_children_contribute_nothing() {
        let h = household(vec![]);
        assert_eq!(amount(&h, ExpenseCategory::EducationDomestic, 3), 0.0);
        assert_eq!(amount(&h, ExpenseCategory::EducationAbroad, 3), 0.0);
        assert_eq!(amount(&h, ExpenseCategory::Lifestyle, 0), 50_000.0);
        assert_eq!(amount(&h, ExpenseCategory::Travel, 0), 20_000.0);
    }

    #[test]
    fn test_year_expenses_inflates_and_converts() {
        let h = household(vec![]);
        let premises = Premises::default();
        let rates = RateModel::new(&h.macro_assumptions);
        let ctx = YearContext::new(&h, &premises, &rates, 3);
        let breakdown = year_expenses(&ctx, &CategoryScales::default());

        let luxury = breakdown.category(ExpenseCategory::Luxury);
        assert!((luxury - 12_000.0 * rates.brl_factor(3)).abs() < 1e-6);

        let travel = breakdown.category(ExpenseCategory::Travel);
        let expected = 20_000.0 * rates.usd_factor(3) * rates.exchange_rate(3);
        assert!((travel - expected).abs() < 1e-6);
        assert!((breakdown.total_usd - 20_000.0 * rates.usd_factor(3)).abs() < 1e-6);
    }

    #[test]
    fn test_scales_apply_after_formula() {
        let h = household(vec![]);
        let mut scales = CategoryScales::new();
        scales.set(ExpenseCategory::Luxury, 0.5).unwrap();
        scales.set(ExpenseCategory::Philanthropy, 0.0).unwrap();

        let premises = Premises::default();
        let rates = RateModel::new(&h.macro_assumptions);
        let ctx = YearContext::new(&h, &premises, &rates, 0);
        let breakdown = year_expenses(&ctx, &scales);
        assert_eq!(breakdown.category(ExpenseCategory::Luxury), 6_000.0);
        assert_eq!(breakdown.category(ExpenseCategory::Philanthropy), 0.0);
        assert_eq!(breakdown.category(ExpenseCategory::SecondResidence), 24_000.0);
    }

    #[test]
    fn test_scale_out_of_range_rejected() {
        let mut scales = CategoryScales::new();
        assert!(scales.set(ExpenseCategory::Health, 2.5).is_err());
        assert!(scales.set(ExpenseCategory::Health, -0.1).is_err());
        assert_eq!(scales.get(ExpenseCategory::Health), 1.0);
    }

    #[test]
    fn test_scale_for_target() {
        assert_eq!(scale_for_target(100.0, 150.0), 1.5);
        assert_eq!(scale_for_target(100.0, 500.0), 2.0);
        assert_eq!(scale_for_target(0.0, 500.0), 1.0);
        assert_eq!(scale_for_target(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_baseline_costs_is_year_zero() {
        let h = household(vec![child(10, true, false)]);
        let baseline = baseline_costs(&h, &Premises::default());
        assert_eq!(baseline.items.len(), ExpenseCategory::ALL.len());
        let travel = baseline
            .items
            .iter()
            .find(|i| i.category == ExpenseCategory::Travel)
            .unwrap();
        // native USD: 2 trips * (10k + 3k)
        assert_eq!(travel.native, 26_000.0);
    }
}
