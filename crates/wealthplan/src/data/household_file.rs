//! YAML household files
//!
//! A household file carries the intake form plus everything else one run
//! needs. Only `household` is required:
//!
//! ```yaml
//! household:
//!   client_age: 45
//!   retirement_age: 65
//!   children_ages: [10]
//!   children_in_school: [true]
//!   children_abroad: [false]
//!   initial_wealth: 1000000
//!   horizon_years: 20
//! salary:
//!   annual: 600000
//! risk:
//!   answers: [true, false, false]
//!   behavior: { loss_reaction: hold, horizon: over_five_years, objective: balanced }
//! targets:
//!   luxury: 36000
//! simulation:
//!   paths: 5000
//!   step: monthly
//! start_date: 2025-01-01
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wealthplan_core::expenses::{CategoryScales, baseline_costs, scale_for_target};
use wealthplan_core::incomes::{
    ResolvedSalary, SalaryEstimator, SalaryLookupError, SalaryQuery, resolve_salary,
};
use wealthplan_core::model::{
    ExpenseCategory, HouseholdForm, HouseholdProfile, Premises, RiskScore,
};
use wealthplan_core::risk::{BehavioralAnswers, RiskOutcome, assess};
use wealthplan_core::{
    MonteCarloConfig, ProjectionError, ProjectionInput, RiskError, ValidationError,
};

use crate::util::io::atomic_write;

/// Error types for household file operations
#[derive(Debug)]
pub enum DataError {
    Io(String),
    Parse(String),
    Serialize(String),
    Invalid(ValidationError),
    Risk(RiskError),
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(msg) => write!(f, "IO error: {msg}"),
            DataError::Parse(msg) => write!(f, "Parse error: {msg}"),
            DataError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            DataError::Invalid(e) => write!(f, "Invalid household: {e}"),
            DataError::Risk(e) => write!(f, "Risk questionnaire: {e}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Invalid(e) => Some(e),
            DataError::Risk(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for DataError {
    fn from(e: ValidationError) -> Self {
        DataError::Invalid(e)
    }
}

impl From<RiskError> for DataError {
    fn from(e: RiskError) -> Self {
        DataError::Risk(e)
    }
}

/// One row of the local salary market table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSalary {
    pub role: String,
    /// Empty matches any sector
    #[serde(default)]
    pub sector: String,
    pub annual: f64,
}

/// Salary estimator backed by the market table of a household file
#[derive(Debug, Clone, Copy)]
pub struct MarketTable<'a> {
    rows: &'a [MarketSalary],
}

impl<'a> MarketTable<'a> {
    pub fn new(rows: &'a [MarketSalary]) -> Self {
        Self { rows }
    }
}

impl SalaryEstimator for MarketTable<'_> {
    fn estimate(&self, query: &SalaryQuery) -> Result<f64, SalaryLookupError> {
        if self.rows.is_empty() {
            return Err(SalaryLookupError::Unavailable(
                "no salary market table loaded".to_string(),
            ));
        }
        let role_matches = |row: &&MarketSalary| row.role.eq_ignore_ascii_case(&query.role);
        // exact sector first, then a sector-agnostic row
        self.rows
            .iter()
            .filter(role_matches)
            .find(|row| row.sector.eq_ignore_ascii_case(&query.sector))
            .or_else(|| {
                self.rows
                    .iter()
                    .filter(role_matches)
                    .find(|row| row.sector.is_empty())
            })
            .map(|row| row.annual)
            .ok_or(SalaryLookupError::NotFound)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalarySection {
    /// Annual salary typed in by the client
    pub annual: Option<f64>,
    /// Used when neither the client nor the market table gives a figure
    pub fallback: Option<f64>,
    pub query: Option<SalaryQuery>,
    pub market: Vec<MarketSalary>,
}

impl SalarySection {
    pub fn resolve(&self) -> ResolvedSalary {
        let table = MarketTable::new(&self.market);
        let estimator = self
            .query
            .as_ref()
            .map(|query| (&table as &dyn SalaryEstimator, query));
        resolve_salary(self.annual, estimator, self.fallback)
    }
}

/// Either a known score or the questionnaire answers that produce one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSection {
    pub score: Option<i32>,
    pub answers: Vec<bool>,
    pub behavior: Option<BehavioralAnswers>,
}

impl RiskSection {
    /// The score to project with, and the questionnaire outcome when one ran
    pub fn resolve(&self) -> Result<(RiskScore, Option<RiskOutcome>), DataError> {
        if let Some(score) = self.score {
            return Ok((RiskScore::new(score)?, None));
        }
        let behavior = self.behavior.as_ref().ok_or_else(|| {
            ValidationError::new("risk", "either a score or answers with behavior is required")
        })?;
        let outcome = assess(&self.answers, behavior)?;
        Ok((outcome.score, Some(outcome)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdFile {
    pub household: HouseholdForm,
    pub salary: SalarySection,
    pub risk: RiskSection,
    /// Explicit scale factors per category
    pub scales: CategoryScales,
    /// Year-0 target amounts in each category's own currency, converted to
    /// scales against the baseline
    pub targets: BTreeMap<ExpenseCategory, f64>,
    pub premises: Premises,
    pub simulation: MonteCarloConfig,
    pub start_date: Option<jiff::civil::Date>,
}

/// A validated run built from a household file
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub input: ProjectionInput,
    pub risk: Option<RiskOutcome>,
    pub simulation: MonteCarloConfig,
}

impl HouseholdFile {
    pub fn from_yaml(content: &str) -> Result<Self, DataError> {
        serde_saphyr::from_str(content).map_err(|e| DataError::Parse(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String, DataError> {
        serde_saphyr::to_string(self).map_err(|e| DataError::Serialize(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)
            .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;
        let file = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "household file loaded");
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<(), DataError> {
        let content = self.to_yaml()?;
        atomic_write(path, &content).map_err(|e| DataError::Io(format!("{}: {e}", path.display())))
    }

    /// Validated household profile from the form section
    pub fn profile(&self) -> Result<HouseholdProfile, DataError> {
        Ok(HouseholdProfile::try_from(self.household.clone())?)
    }

    /// Explicit scales with every target folded in. A target wins over an
    /// explicit factor for the same category.
    pub fn resolved_scales(&self, profile: &HouseholdProfile) -> Result<CategoryScales, DataError> {
        let mut scales = self.scales.clone();
        if self.targets.is_empty() {
            return Ok(scales);
        }
        let baseline = baseline_costs(profile, &self.premises);
        for (&category, &target) in &self.targets {
            let base = baseline
                .items
                .iter()
                .find(|item| item.category == category)
                .map_or(0.0, |item| item.native);
            scales.set(category, scale_for_target(base, target))?;
        }
        Ok(scales)
    }

    pub fn prepare(&self) -> Result<PreparedRun, DataError> {
        let household = self.profile()?;
        let scales = self.resolved_scales(&household)?;
        let (risk, outcome) = self.risk.resolve()?;
        let salary = self.salary.resolve();

        let input = ProjectionInput {
            household,
            risk,
            salary,
            scales,
            premises: self.premises.clone(),
            start_date: self.start_date,
        };
        input.validate().map_err(|e| match e {
            ProjectionError::InvalidInput(v) => DataError::Invalid(v),
            other => DataError::Invalid(ValidationError::new("input", other.to_string())),
        })?;

        Ok(PreparedRun {
            input,
            risk: outcome,
            simulation: self.simulation,
        })
    }
}
