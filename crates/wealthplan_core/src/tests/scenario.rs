//! End-to-end scenario: one client aged 45, one child aged 10, 20 years
//!
//! These tests verify that:
//! - Year-0 housing matches the hand-computed formula
//! - The year-0 reserve follows whichever requirement rule applies
//! - Liquid wealth at year 0 is what remains after the reserve
//! - Repeated runs are bit-identical

use super::{input_for, single_parent};
use crate::model::{ExpenseCategory, ProjectionWarning, RiskProfile};
use crate::projection::project;

fn year0_requirement(records: &[crate::model::YearRecord], initial_wealth: f64) -> f64 {
    let window: f64 = records[..4].iter().map(|r| r.expenses.total_brl).sum();
    let shortfall = window - records[0].incomes.total;
    if shortfall < records[0].expenses.total_brl {
        0.10 * initial_wealth
    } else {
        shortfall
    }
}

#[test]
fn test_year0_housing_cost() {
    let household = single_parent();
    let projection = project(&input_for(household.clone(), 600_000.0, 50)).unwrap();

    let price = household.housing.price_per_m2;
    let expected = price * 200.0 * 0.02 + ((200.0_f64 * 0.002).ceil() * 60_000.0 + 48_000.0) + 2.0 * 30_000.0;
    let housing = projection.records[0]
        .expenses
        .category(ExpenseCategory::Housing);
    assert!((housing - expected).abs() < 1e-6, "housing {housing} != {expected}");
}

#[test]
fn test_year0_category_figures() {
    let projection = project(&input_for(single_parent(), 600_000.0, 50)).unwrap();
    let year0 = &projection.records[0].expenses;

    // school 80k + allowance 6k
    assert_eq!(year0.category(ExpenseCategory::EducationDomestic), 86_000.0);
    assert_eq!(year0.category(ExpenseCategory::EducationAbroad), 0.0);
    // client 45 (30k) + child 10 (15k) + 2 occupants * 10k
    assert_eq!(year0.category(ExpenseCategory::Health), 65_000.0);
    // one trip: 10k + 3k USD at 5.0
    assert_eq!(year0.category(ExpenseCategory::Travel), 65_000.0);
    assert_eq!(year0.total_usd, 13_000.0);
    assert_eq!(year0.category(ExpenseCategory::Luxury), 24_000.0);
}

#[test]
fn test_year0_reserve_shortfall_rule() {
    let household = single_parent();
    let projection = project(&input_for(household.clone(), 600_000.0, 50)).unwrap();
    let records = &projection.records;

    let expected = year0_requirement(records, household.initial_wealth);
    assert!(expected > 0.10 * household.initial_wealth);
    assert!((records[0].nominal.reserve - expected).abs() < 1e-6);
    assert_eq!(
        records[0].liquid_unadjusted,
        (household.initial_wealth - records[0].nominal.reserve).max(0.0)
    );
    assert!(
        projection
            .warnings
            .contains(&ProjectionWarning::ReserveExceedsWealth { year: 0 })
    );
}

#[test]
fn test_year0_reserve_minimum_rule() {
    let household = single_parent();
    let projection = project(&input_for(household.clone(), 5_000_000.0, 50)).unwrap();
    let records = &projection.records;

    assert_eq!(
        year0_requirement(records, household.initial_wealth),
        100_000.0
    );
    assert_eq!(records[0].nominal.reserve, 100_000.0);
    assert_eq!(records[0].liquid_unadjusted, 900_000.0);
    assert!(projection.warnings.is_empty());
}

#[test]
fn test_education_ends_after_college() {
    let projection = project(&input_for(single_parent(), 600_000.0, 50)).unwrap();
    // child turns 22 in year 12
    let edu = |i: usize| {
        projection.records[i]
            .expenses
            .category(ExpenseCategory::EducationDomestic)
    };
    assert!(edu(11) > 0.0);
    assert_eq!(edu(12), 0.0);
}

#[test]
fn test_no_children_no_child_costs() {
    let mut household = single_parent();
    household.children.clear();
    let projection = project(&input_for(household, 600_000.0, 50)).unwrap();

    for r in &projection.records {
        assert_eq!(r.expenses.category(ExpenseCategory::EducationDomestic), 0.0);
        assert_eq!(r.expenses.category(ExpenseCategory::EducationAbroad), 0.0);
        assert_eq!(r.illiquid_appreciation, 0.0);
        assert_eq!(r.nominal.illiquid, 0.0);
    }
}

#[test]
fn test_repeat_runs_are_identical() {
    let input = input_for(single_parent(), 600_000.0, 72);
    let first = project(&input).unwrap();
    let second = project(&input).unwrap();
    assert_eq!(first.records, second.records);
    assert_eq!(first.profile, RiskProfile::Aggressive);
}
