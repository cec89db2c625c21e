//! Property tests over arbitrary valid inputs
//!
//! These tests verify that:
//! - Scenario percentages stay in range and grow with the score
//! - The adaptive bounds never cross and the final score is always in 1..=99
//! - No expense, income or bucket value is ever negative
//! - Bucket totals are exact sums and projections are deterministic
//! - Monte Carlo bands are ordered for any seed

use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};
use proptest::collection::vec;

use super::input_for;
use crate::model::{
    Child, Discretionary, HouseholdProfile, Housing, IlliquidAsset, IncomeStream, LifestyleTier,
    MacroAssumptions,
};
use crate::monte_carlo::{MonteCarloConfig, StepFrequency, simulate_liquid};
use crate::projection::project;
use crate::rates::ReturnDistribution;
use crate::risk::{
    BehavioralAnswers, InvestmentHorizon, InvestmentObjective, LossReaction, RiskAssessment,
    Scenario,
};

fn rate(bp: i32) -> f64 {
    f64::from(bp) / 10_000.0
}

fn tier(n: u8) -> LifestyleTier {
    match n % 3 {
        0 => LifestyleTier::Essential,
        1 => LifestyleTier::Comfortable,
        _ => LifestyleTier::Premium,
    }
}

fn behavior(n: u8) -> BehavioralAnswers {
    let loss = [
        LossReaction::SellAll,
        LossReaction::SellPart,
        LossReaction::Hold,
        LossReaction::BuyMore,
    ];
    let horizon = [
        InvestmentHorizon::UpToOneYear,
        InvestmentHorizon::OneToThreeYears,
        InvestmentHorizon::ThreeToFiveYears,
        InvestmentHorizon::OverFiveYears,
    ];
    let objective = [
        InvestmentObjective::PreserveCapital,
        InvestmentObjective::BeatInflation,
        InvestmentObjective::Balanced,
        InvestmentObjective::MaximizeGrowth,
    ];
    BehavioralAnswers {
        loss_reaction: loss[usize::from(n % 4)],
        horizon: horizon[usize::from((n / 4) % 4)],
        objective: objective[usize::from((n / 16) % 4)],
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_scenario_in_range_and_monotone(score in 1i32..99) {
        let s = Scenario::for_score(score);
        let next = Scenario::for_score(score + 1);
        prop_assert!((2.0..=30.0).contains(&s.loss_pct));
        prop_assert!((4.0..=40.0).contains(&s.gain_pct));
        prop_assert!(next.loss_pct >= s.loss_pct);
        prop_assert!(next.gain_pct >= s.gain_pct);
        let top = Scenario::for_score(99);
        prop_assert!((2.0..=30.0).contains(&top.loss_pct));
        prop_assert!((4.0..=40.0).contains(&top.gain_pct));
        prop_assert!(top.loss_pct >= next.loss_pct && top.gain_pct >= next.gain_pct);
    }

    #[test]
    fn prop_adaptive_bounds_hold(answers in vec(any::<bool>(), 3), style in any::<u8>()) {
        let mut state = RiskAssessment::new();
        for &a in &answers {
            state = state.answer(a).unwrap();
            prop_assert!(state.low() <= state.current());
            prop_assert!(state.current() <= state.high());
            prop_assert!(state.low() >= 1 && state.high() <= 99);
        }
        let outcome = state.finalize(&behavior(style)).unwrap();
        prop_assert!((1..=99).contains(&outcome.score.value()));
        let raw = outcome.adaptive_score + outcome.adjustments.iter().sum::<i32>();
        prop_assert_eq!(i32::from(outcome.score.value()), raw.clamp(1, 99));
    }
}

#[allow(clippy::too_many_arguments)]
fn household(
    client_age: u32,
    spouse: Option<u32>,
    children: Vec<(u32, bool, bool)>,
    area: u32,
    price: u32,
    style: u8,
    growth_bp: (i32, i32, i32, i32),
    inflation_bp: (i32, i32),
    wealth: u32,
    horizon: usize,
    assets: Vec<(u32, i32)>,
) -> HouseholdProfile {
    let (g1, g2, g3, g4) = growth_bp;
    HouseholdProfile {
        client_age,
        spouse_age: spouse,
        retirement_age: 65,
        children: children
            .into_iter()
            .map(|(age, in_school, studies_abroad)| Child {
                age,
                in_school,
                studies_abroad,
            })
            .collect(),
        housing: Housing {
            price_per_m2: f64::from(price),
            area_m2: f64::from(area),
            cars: u32::from(style % 4),
            extra_staff: u32::from(style % 3),
        },
        lifestyle: tier(style),
        trips_per_year: u32::from(style % 5),
        discretionary: Discretionary {
            luxury_monthly: f64::from(price) / 2.0,
            second_residence_monthly: f64::from(area) * 10.0,
            philanthropy_annual: f64::from(wealth) / 100.0,
        },
        rent: IncomeStream {
            brl: f64::from(price),
            brl_growth: rate(g1),
            usd: f64::from(area),
            usd_growth: rate(g2),
        },
        dividends: IncomeStream {
            brl: f64::from(wealth) / 50.0,
            brl_growth: rate(g3),
            usd: f64::from(price) / 10.0,
            usd_growth: rate(g4),
        },
        illiquid_assets: assets
            .into_iter()
            .map(|(value, growth)| IlliquidAsset {
                value_brl: f64::from(value),
                growth_brl: rate(growth),
                value_usd: f64::from(value) / 10.0,
                growth_usd: rate(-growth),
            })
            .collect(),
        initial_wealth: f64::from(wealth),
        horizon_years: horizon,
        macro_assumptions: MacroAssumptions {
            inflation_brl: rate(inflation_bp.0),
            inflation_usd: rate(inflation_bp.1),
            exchange_rate: 5.0,
        },
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(48))]

    #[test]
    fn prop_projection_values_non_negative(
        client_age in 20u32..80,
        spouse in proptest::option::of(20u32..80),
        children in vec((0u32..30, any::<bool>(), any::<bool>()), 0..4),
        area in 0u32..3_000,
        price in 0u32..60_000,
        style in any::<u8>(),
        g1 in -5_000i32..5_000,
        g2 in -5_000i32..5_000,
        g3 in -5_000i32..5_000,
        g4 in -5_000i32..5_000,
        infl_brl in -500i32..3_000,
        infl_usd in -500i32..1_500,
        wealth in 0u32..100_000_000,
        horizon in 1usize..40,
        assets in vec((0u32..10_000_000, -3_000i32..3_000), 0..3),
        salary in 0u32..5_000_000,
        score in 1i32..=99,
    ) {
        let h = household(
            client_age, spouse, children, area, price, style,
            (g1, g2, g3, g4), (infl_brl, infl_usd), wealth, horizon, assets,
        );
        let input = input_for(h, f64::from(salary), score);
        let projection = project(&input).unwrap();
        prop_assert_eq!(projection.records.len(), horizon);

        for r in &projection.records {
            for item in &r.expenses.items {
                prop_assert!(item.native >= 0.0 && item.brl >= 0.0, "{:?}", item);
            }
            let inc = r.incomes;
            prop_assert!(inc.salary >= 0.0 && inc.rent_brl >= 0.0 && inc.rent_usd >= 0.0);
            prop_assert!(inc.dividends_brl >= 0.0 && inc.dividends_usd >= 0.0);
            for b in [r.nominal, r.real] {
                prop_assert!(b.reserve >= 0.0 && b.liquid >= 0.0 && b.illiquid >= 0.0, "{:?}", b);
                prop_assert_eq!(b.total, b.reserve + b.liquid + b.illiquid);
            }
        }

        let again = project(&input).unwrap();
        prop_assert_eq!(&projection.records, &again.records);
    }

    #[test]
    fn prop_monte_carlo_bands_ordered(
        seed in any::<u64>(),
        paths in 2usize..250,
        years in 1usize..12,
        mean_bp in -1_000i32..2_500,
        vol_bp in 0i32..4_000,
        monthly in any::<bool>(),
    ) {
        let dist = ReturnDistribution { mean: rate(mean_bp), volatility: rate(vol_bp) };
        let config = MonteCarloConfig {
            paths,
            years,
            seed,
            step: if monthly { StepFrequency::Monthly } else { StepFrequency::Annual },
        };
        let summary = simulate_liquid(250_000.0, dist, &config).unwrap();
        prop_assert_eq!(summary.bands.len(), years);
        for band in &summary.bands {
            prop_assert!(band.p10 >= 0.0);
            prop_assert!(band.p10 <= band.p50 && band.p50 <= band.p90, "{:?}", band);
        }
    }
}
