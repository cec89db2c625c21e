//! Deterministic year-by-year projection
//!
//! Expenses and incomes of every year are independent of the bucket values,
//! so they are evaluated up front (in parallel with the `parallel` feature).
//! The buckets then follow a strict forward recurrence: [`Projector::step`]
//! emits the record for year `i` and carries the state into year `i + 1`,
//! rebalanced to the requirement of the window starting at `i`. [`project`] folds the projector over the whole horizon.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::allocation::{
    BucketState, IlliquidValuation, RecommendedAllocation, recommended_allocation,
    reserve_requirement, reserve_rate,
};
use crate::error::ProjectionError;
use crate::expenses::{CategoryScales, YearContext, year_expenses};
use crate::incomes::{ResolvedSalary, year_incomes};
use crate::model::{
    BucketReturns, BucketValues, ExpenseBreakdown, HouseholdProfile, IncomeBreakdown,
    PortfolioParameters, Premises, ProjectionWarning, RiskProfile, RiskScore, YearRecord,
};
use crate::rates::RateModel;
use crate::validation;

/// Everything one projection run reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub household: HouseholdProfile,
    pub risk: RiskScore,
    pub salary: ResolvedSalary,
    #[serde(default)]
    pub scales: CategoryScales,
    #[serde(default)]
    pub premises: Premises,
    /// Labels year 0 with a calendar year when set
    #[serde(default)]
    pub start_date: Option<jiff::civil::Date>,
}

impl ProjectionInput {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        validation::validate_household(&self.household)?;
        validation::validate_scales(&self.scales)?;
        validation::validate_salary(self.salary.amount)?;
        Ok(())
    }
}

/// Expenses and incomes of one year
#[derive(Debug, Clone, PartialEq)]
struct YearFlows {
    expenses: ExpenseBreakdown,
    incomes: IncomeBreakdown,
}

impl YearFlows {
    fn net(&self) -> f64 {
        self.incomes.total - self.expenses.total_brl
    }
}

fn year_flows(input: &ProjectionInput, rates: &RateModel, year: usize) -> YearFlows {
    let ctx = YearContext::new(&input.household, &input.premises, rates, year);
    YearFlows {
        expenses: year_expenses(&ctx, &input.scales),
        incomes: year_incomes(&input.household, rates, input.salary.amount, year),
    }
}

#[cfg(feature = "parallel")]
fn all_flows(input: &ProjectionInput, rates: &RateModel) -> Vec<YearFlows> {
    (0..input.household.horizon_years)
        .into_par_iter()
        .map(|year| year_flows(input, rates, year))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn all_flows(input: &ProjectionInput, rates: &RateModel) -> Vec<YearFlows> {
    (0..input.household.horizon_years)
        .map(|year| year_flows(input, rates, year))
        .collect()
}

/// Completed projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub records: Vec<YearRecord>,
    pub risk: RiskScore,
    pub profile: RiskProfile,
    pub portfolio: PortfolioParameters,
    /// Year-0 liquid bucket distributed over the profile's asset classes
    pub allocation: RecommendedAllocation,
    pub warnings: Vec<ProjectionWarning>,
}

impl Projection {
    #[must_use]
    pub fn initial_liquid(&self) -> f64 {
        self.records.first().map_or(0.0, |r| r.liquid_unadjusted)
    }

    #[must_use]
    pub fn final_record(&self) -> Option<&YearRecord> {
        self.records.last()
    }
}

/// Resumable projection state
#[derive(Debug, Clone)]
pub struct Projector<'a> {
    input: &'a ProjectionInput,
    rates: RateModel,
    portfolio: &'a PortfolioParameters,
    liquid_rate: f64,
    reserve_rate: f64,
    flows: Vec<YearFlows>,
    expenses: Vec<f64>,
    incomes: Vec<f64>,
    illiquid: IlliquidValuation,
    state: BucketState,
    next_year: usize,
    records: Vec<YearRecord>,
    warnings: Vec<ProjectionWarning>,
    depleted: bool,
}

impl<'a> Projector<'a> {
    /// Validate the input, evaluate every year's flows and size the year-0 reserve
    pub fn new(input: &'a ProjectionInput) -> Result<Self, ProjectionError> {
        input.validate()?;

        let household = &input.household;
        let rates = RateModel::new(&household.macro_assumptions);
        let portfolio = input.premises.portfolios.for_profile(input.risk.profile());

        let flows = all_flows(input, &rates);
        let expenses: Vec<f64> = flows.iter().map(|f| f.expenses.total_brl).collect();
        let incomes: Vec<f64> = flows.iter().map(|f| f.incomes.total).collect();

        let requirement = reserve_requirement(
            &expenses,
            &incomes,
            0,
            household.initial_wealth,
            &input.premises.reserve,
        );

        let mut warnings = Vec::new();
        if input.salary.is_missing() && household.client_age < household.retirement_age {
            warnings.push(ProjectionWarning::SalaryMissing);
        }
        if requirement > household.initial_wealth {
            warnings.push(ProjectionWarning::ReserveExceedsWealth { year: 0 });
        }

        Ok(Self {
            input,
            rates,
            portfolio,
            liquid_rate: portfolio.blended_return(),
            reserve_rate: reserve_rate(&input.premises.reserve),
            flows,
            expenses,
            incomes,
            illiquid: IlliquidValuation::new(household, &input.premises.valuation),
            state: BucketState::initial(household.initial_wealth, requirement),
            next_year: 0,
            records: Vec::with_capacity(household.horizon_years),
            warnings,
            depleted: false,
        })
    }

    #[must_use]
    pub fn horizon(&self) -> usize {
        self.input.household.horizon_years
    }

    /// Index of the next year `step` accepts
    #[must_use]
    pub fn next_year(&self) -> usize {
        self.next_year
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_year >= self.horizon()
    }

    /// Opening reserve and liquid values of the next year
    #[must_use]
    pub fn state(&self) -> BucketState {
        self.state
    }

    #[must_use]
    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    /// Project `year`, which must be exactly the next unprojected year
    pub fn step(&mut self, year: usize) -> Result<&YearRecord, ProjectionError> {
        if self.is_complete() {
            return Err(ProjectionError::HorizonExhausted {
                horizon: self.horizon(),
            });
        }
        if year != self.next_year {
            return Err(ProjectionError::SequenceOrderViolation {
                expected: self.next_year,
                requested: year,
            });
        }

        let flows = &self.flows[year];
        let net_cash_flow = flows.net();
        let opening = self.state;

        if opening.liquid <= 0.0 && !self.depleted && self.input.household.initial_wealth > 0.0 {
            self.depleted = true;
            self.warnings.push(ProjectionWarning::LiquidDepleted { year });
        }

        let matured = opening.mature(net_cash_flow, self.liquid_rate, self.reserve_rate);
        let illiquid = self.illiquid.value_at(year);
        let illiquid_appreciation = self.illiquid.value_at(year + 1) - illiquid;
        let financial_return = matured.reserve_return + matured.liquid_return;

        let liquid_display = opening.liquid * self.rates.fx_mix_factor(year);
        let deflator = self.rates.deflator(year);
        let nominal = BucketValues::new(opening.reserve, liquid_display, illiquid);
        let real = BucketValues::new(
            nominal.reserve / deflator,
            nominal.liquid / deflator,
            nominal.illiquid / deflator,
        );

        let record = YearRecord {
            year,
            calendar_year: self
                .input
                .start_date
                .map(|d| d.year().saturating_add(year as i16)),
            client_age: self.input.household.client_age.saturating_add(year as u32),
            exchange_rate: self.rates.exchange_rate(year),
            expenses: flows.expenses.clone(),
            incomes: flows.incomes,
            net_cash_flow,
            nominal,
            real,
            liquid_unadjusted: opening.liquid,
            returns: BucketReturns {
                reserve: matured.reserve_return,
                liquid: matured.liquid_return,
                illiquid: illiquid_appreciation,
            },
            financial_return,
            illiquid_appreciation,
            total_growth: net_cash_flow + financial_return + illiquid_appreciation,
        };

        let next = year + 1;
        if next < self.horizon() {
            // sized on the window starting at the year just closed
            let requirement = reserve_requirement(
                &self.expenses,
                &self.incomes,
                year,
                matured.investable(),
                &self.input.premises.reserve,
            );
            if requirement > matured.investable() {
                self.warnings
                    .push(ProjectionWarning::ReserveExceedsWealth { year: next });
            }
            self.state = matured.rebalance(requirement);
        }

        self.next_year = next;
        self.records.push(record);
        Ok(&self.records[year])
    }

    /// Project the next year in sequence
    pub fn advance(&mut self) -> Result<&YearRecord, ProjectionError> {
        let year = self.next_year;
        self.step(year)
    }

    /// Project every remaining year and assemble the result
    pub fn run(mut self) -> Result<Projection, ProjectionError> {
        while !self.is_complete() {
            self.advance()?;
        }
        Ok(self.finish())
    }

    /// Assemble the result from the years projected so far
    #[must_use]
    pub fn finish(self) -> Projection {
        let initial_liquid = self.records.first().map_or(0.0, |r| r.liquid_unadjusted);
        Projection {
            allocation: recommended_allocation(
                self.portfolio,
                initial_liquid,
                self.rates.initial_exchange_rate(),
            ),
            records: self.records,
            risk: self.input.risk,
            profile: self.input.risk.profile(),
            portfolio: self.portfolio.clone(),
            warnings: self.warnings,
        }
    }
}

/// Run the full horizon as a fold over the year indices
pub fn project(input: &ProjectionInput) -> Result<Projection, ProjectionError> {
    let horizon = input.household.horizon_years;
    let projector = (0..horizon).try_fold(Projector::new(input)?, |mut projector, year| {
        projector.step(year)?;
        Ok::<_, ProjectionError>(projector)
    })?;
    Ok(projector.finish())
}
