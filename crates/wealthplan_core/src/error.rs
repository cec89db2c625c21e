use std::fmt;

/// A malformed household profile or configuration value.
///
/// Rejected before any calculation runs; nothing is partially computed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by the adaptive risk questionnaire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// All adaptive rounds were already answered
    AssessmentComplete,
    /// `finalize` was called before the adaptive rounds finished
    AssessmentIncomplete { answered: usize },
    /// A score outside 1..=99
    ScoreOutOfRange(i32),
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskError::AssessmentComplete => {
                write!(f, "all adaptive risk questions have already been answered")
            }
            RiskError::AssessmentIncomplete { answered } => write!(
                f,
                "risk assessment cannot be finalized after {answered} of {} adaptive answers",
                crate::risk::ADAPTIVE_ROUNDS
            ),
            RiskError::ScoreOutOfRange(score) => {
                write!(f, "risk score {score} is outside the range 1..=99")
            }
        }
    }
}

impl std::error::Error for RiskError {}

/// Errors returned by the deterministic projection
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    InvalidInput(ValidationError),
    /// A year was requested before its predecessor was finalized
    SequenceOrderViolation { expected: usize, requested: usize },
    /// Every year of the horizon has already been projected
    HorizonExhausted { horizon: usize },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::InvalidInput(e) => write!(f, "{e}"),
            ProjectionError::SequenceOrderViolation {
                expected,
                requested,
            } => write!(
                f,
                "year {requested} requested but year {expected} is the next year to project"
            ),
            ProjectionError::HorizonExhausted { horizon } => {
                write!(f, "all {horizon} years have already been projected")
            }
        }
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::InvalidInput(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ProjectionError {
    fn from(err: ValidationError) -> Self {
        ProjectionError::InvalidInput(err)
    }
}

/// Errors related to Monte Carlo configuration
#[derive(Debug, Clone, PartialEq)]
pub enum MonteCarloError {
    ZeroPaths,
    ZeroHorizon,
    InvalidDistribution { mean: f64, volatility: f64 },
}

impl fmt::Display for MonteCarloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonteCarloError::ZeroPaths => write!(f, "at least one simulation path is required"),
            MonteCarloError::ZeroHorizon => write!(f, "simulation horizon must be at least 1 year"),
            MonteCarloError::InvalidDistribution { mean, volatility } => write!(
                f,
                "invalid return distribution (mean={mean}, volatility={volatility}): volatility must be non-negative and finite"
            ),
        }
    }
}

impl std::error::Error for MonteCarloError {}
