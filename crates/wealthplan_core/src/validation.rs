//! Input checks run before any calculation

use crate::error::ValidationError;
use crate::expenses::{CategoryScales, MAX_SCALE, MIN_SCALE};
use crate::model::{HouseholdProfile, IncomeStream};

pub(crate) fn check_parallel_len(
    field: &str,
    len: usize,
    expected: usize,
) -> Result<(), ValidationError> {
    if len != expected {
        return Err(ValidationError::new(
            field,
            format!("has {len} entries but {expected} were expected"),
        ));
    }
    Ok(())
}

/// Monetary amounts and counts must be finite and non-negative
pub fn check_amount(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(
            field,
            format!("must be non-negative, got {value}"),
        ));
    }
    Ok(())
}

/// Growth and inflation rates may be negative but never at or below -100%
pub fn check_rate(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if value <= -1.0 {
        return Err(ValidationError::new(
            field,
            format!("must be greater than -100%, got {:.2}%", value * 100.0),
        ));
    }
    Ok(())
}

fn check_stream(prefix: &str, stream: &IncomeStream) -> Result<(), ValidationError> {
    check_amount(&format!("{prefix}.brl"), stream.brl)?;
    check_rate(&format!("{prefix}.brl_growth"), stream.brl_growth)?;
    check_amount(&format!("{prefix}.usd"), stream.usd)?;
    check_rate(&format!("{prefix}.usd_growth"), stream.usd_growth)?;
    Ok(())
}

pub fn validate_household(profile: &HouseholdProfile) -> Result<(), ValidationError> {
    if profile.horizon_years == 0 {
        return Err(ValidationError::new(
            "horizon_years",
            "must be at least 1 year",
        ));
    }

    check_amount("housing.price_per_m2", profile.housing.price_per_m2)?;
    check_amount("housing.area_m2", profile.housing.area_m2)?;
    check_amount(
        "discretionary.luxury_monthly",
        profile.discretionary.luxury_monthly,
    )?;
    check_amount(
        "discretionary.second_residence_monthly",
        profile.discretionary.second_residence_monthly,
    )?;
    check_amount(
        "discretionary.philanthropy_annual",
        profile.discretionary.philanthropy_annual,
    )?;
    check_stream("rent", &profile.rent)?;
    check_stream("dividends", &profile.dividends)?;
    check_amount("initial_wealth", profile.initial_wealth)?;

    for (idx, asset) in profile.illiquid_assets.iter().enumerate() {
        check_amount(&format!("illiquid_assets[{idx}].value_brl"), asset.value_brl)?;
        check_rate(&format!("illiquid_assets[{idx}].growth_brl"), asset.growth_brl)?;
        check_amount(&format!("illiquid_assets[{idx}].value_usd"), asset.value_usd)?;
        check_rate(&format!("illiquid_assets[{idx}].growth_usd"), asset.growth_usd)?;
    }

    let m = &profile.macro_assumptions;
    check_rate("macro_assumptions.inflation_brl", m.inflation_brl)?;
    check_rate("macro_assumptions.inflation_usd", m.inflation_usd)?;
    check_amount("macro_assumptions.exchange_rate", m.exchange_rate)?;
    if m.exchange_rate == 0.0 {
        return Err(ValidationError::new(
            "macro_assumptions.exchange_rate",
            "must be positive",
        ));
    }

    Ok(())
}

pub fn validate_scales(scales: &CategoryScales) -> Result<(), ValidationError> {
    for (category, factor) in scales.iter() {
        if !(MIN_SCALE..=MAX_SCALE).contains(&factor) {
            return Err(ValidationError::new(
                format!("scales.{}", category.label().to_lowercase()),
                format!("must be between {MIN_SCALE} and {MAX_SCALE}, got {factor}"),
            ));
        }
    }
    Ok(())
}

pub fn validate_salary(amount: f64) -> Result<(), ValidationError> {
    check_amount("salary", amount)
}
