//! Adaptive risk questionnaire
//!
//! The client is shown a loss/gain scenario derived from the current score
//! estimate and answers whether they would be comfortable with it. Each answer
//! halves the `[low, high]` interval. After [`ADAPTIVE_ROUNDS`] answers three
//! behavioral questions shift the score by a fixed amount and the result is
//! clamped into 1..=99.
//!
//! The state is a plain value: `answer` consumes it and returns the next state.

use serde::{Deserialize, Serialize};

use crate::error::RiskError;
use crate::model::{RiskProfile, RiskScore};

pub const ADAPTIVE_ROUNDS: usize = 3;

const START_LOW: i32 = 1;
const START_HIGH: i32 = 99;
const START_CURRENT: i32 = 50;

/// Worst-case loss and best-case gain shown to the client, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub loss_pct: f64,
    pub gain_pct: f64,
}

impl Scenario {
    /// Linear interpolation from (2%, 4%) at score 1 to (30%, 40%) at score 99
    #[must_use]
    pub fn for_score(current: i32) -> Self {
        let step = f64::from(current - 1);
        Self {
            loss_pct: 2.0 + step * 28.0 / 98.0,
            gain_pct: 4.0 + step * 36.0 / 98.0,
        }
    }

    /// Rounded to one decimal for display
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            loss_pct: (self.loss_pct * 10.0).round() / 10.0,
            gain_pct: (self.gain_pct * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    low: i32,
    high: i32,
    current: i32,
    answers: Vec<bool>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskAssessment {
    #[must_use]
    pub fn new() -> Self {
        Self {
            low: START_LOW,
            high: START_HIGH,
            current: START_CURRENT,
            answers: Vec::with_capacity(ADAPTIVE_ROUNDS),
        }
    }

    #[must_use]
    pub fn low(&self) -> i32 {
        self.low
    }

    #[must_use]
    pub fn high(&self) -> i32 {
        self.high
    }

    #[must_use]
    pub fn current(&self) -> i32 {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &[bool] {
        &self.answers
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() >= ADAPTIVE_ROUNDS
    }

    /// Scenario to present for the current estimate
    #[must_use]
    pub fn next_scenario(&self) -> Scenario {
        Scenario::for_score(self.current)
    }

    /// Record one answer. `comfortable` moves the estimate up, otherwise down.
    pub fn answer(mut self, comfortable: bool) -> Result<Self, RiskError> {
        if self.is_complete() {
            return Err(RiskError::AssessmentComplete);
        }

        if comfortable {
            self.low = self.current;
            self.current = (self.low + self.high + 1) / 2;
        } else {
            self.high = self.current;
            self.current = (self.low + self.high) / 2;
        }
        self.answers.push(comfortable);
        Ok(self)
    }

    /// Apply the behavioral adjustments and produce the final score
    pub fn finalize(&self, behavior: &BehavioralAnswers) -> Result<RiskOutcome, RiskError> {
        if !self.is_complete() {
            return Err(RiskError::AssessmentIncomplete {
                answered: self.answers.len(),
            });
        }

        let adjustments = behavior.adjustments();
        let raw = self.current + adjustments.iter().sum::<i32>();
        let score = RiskScore::clamped(raw);

        Ok(RiskOutcome {
            adaptive_score: self.current,
            adjustments,
            score,
            profile: score.profile(),
        })
    }
}

/// What the client would do after a sharp portfolio drop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReaction {
    SellAll,
    SellPart,
    Hold,
    BuyMore,
}

impl LossReaction {
    #[must_use]
    pub fn adjustment(self) -> i32 {
        match self {
            LossReaction::SellAll => -3,
            LossReaction::SellPart => -1,
            LossReaction::Hold => 1,
            LossReaction::BuyMore => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentHorizon {
    UpToOneYear,
    OneToThreeYears,
    ThreeToFiveYears,
    OverFiveYears,
}

impl InvestmentHorizon {
    #[must_use]
    pub fn adjustment(self) -> i32 {
        match self {
            InvestmentHorizon::UpToOneYear => -3,
            InvestmentHorizon::OneToThreeYears => -1,
            InvestmentHorizon::ThreeToFiveYears => 1,
            InvestmentHorizon::OverFiveYears => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentObjective {
    PreserveCapital,
    BeatInflation,
    Balanced,
    MaximizeGrowth,
}

impl InvestmentObjective {
    #[must_use]
    pub fn adjustment(self) -> i32 {
        match self {
            InvestmentObjective::PreserveCapital => -3,
            InvestmentObjective::BeatInflation => -1,
            InvestmentObjective::Balanced => 1,
            InvestmentObjective::MaximizeGrowth => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralAnswers {
    pub loss_reaction: LossReaction,
    pub horizon: InvestmentHorizon,
    pub objective: InvestmentObjective,
}

impl BehavioralAnswers {
    /// Loss reaction, horizon and objective adjustments, in that order
    #[must_use]
    pub fn adjustments(&self) -> [i32; 3] {
        [
            self.loss_reaction.adjustment(),
            self.horizon.adjustment(),
            self.objective.adjustment(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskOutcome {
    /// Estimate after the adaptive rounds, before adjustments
    pub adaptive_score: i32,
    pub adjustments: [i32; 3],
    pub score: RiskScore,
    pub profile: RiskProfile,
}

/// Run the questionnaire from a fixed list of answers
pub fn assess(
    adaptive: &[bool],
    behavior: &BehavioralAnswers,
) -> Result<RiskOutcome, RiskError> {
    let state = adaptive
        .iter()
        .try_fold(RiskAssessment::new(), |state, &comfortable| {
            state.answer(comfortable)
        })?;
    state.finalize(behavior)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral() -> BehavioralAnswers {
        BehavioralAnswers {
            loss_reaction: LossReaction::Hold,
            horizon: InvestmentHorizon::OneToThreeYears,
            objective: InvestmentObjective::BeatInflation,
        }
    }

    #[test]
    fn test_scenario_endpoints() {
        let low = Scenario::for_score(1);
        assert_eq!(low.loss_pct, 2.0);
        assert_eq!(low.gain_pct, 4.0);
        let high = Scenario::for_score(99);
        assert!((high.loss_pct - 30.0).abs() < 1e-12);
        assert!((high.gain_pct - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_scenario_rounding() {
        let s = Scenario::for_score(50).rounded();
        assert_eq!(s.loss_pct, 16.0);
        assert_eq!(s.gain_pct, 22.0);
    }

    #[test]
    fn test_three_yes_answers() {
        let state = [true, true, true]
            .iter()
            .try_fold(RiskAssessment::new(), |s, &a| s.answer(a))
            .unwrap();
        assert_eq!((state.low(), state.high(), state.current()), (87, 99, 93));
    }

    #[test]
    fn test_three_no_answers() {
        let state = [false, false, false]
            .iter()
            .try_fold(RiskAssessment::new(), |s, &a| s.answer(a))
            .unwrap();
        assert_eq!((state.low(), state.high(), state.current()), (1, 13, 7));
    }

    #[test]
    fn test_mixed_answers() {
        let state = RiskAssessment::new().answer(true).unwrap();
        assert_eq!(state.current(), 75);
        let state = state.answer(false).unwrap();
        assert_eq!((state.low(), state.high(), state.current()), (50, 75, 62));
    }

    #[test]
    fn test_fourth_answer_rejected() {
        let state = assess_state(&[true, false, true]);
        assert_eq!(state.answer(true), Err(RiskError::AssessmentComplete));
    }

    #[test]
    fn test_finalize_requires_three_rounds() {
        let state = assess_state(&[true, true]);
        assert_eq!(
            state.finalize(&neutral()),
            Err(RiskError::AssessmentIncomplete { answered: 2 })
        );
    }

    #[test]
    fn test_final_score_clamped() {
        let bold = BehavioralAnswers {
            loss_reaction: LossReaction::BuyMore,
            horizon: InvestmentHorizon::OverFiveYears,
            objective: InvestmentObjective::MaximizeGrowth,
        };
        let outcome = assess(&[true, true, true], &bold).unwrap();
        assert_eq!(outcome.adaptive_score, 93);
        assert_eq!(outcome.score.value(), 99);
        assert_eq!(outcome.profile, RiskProfile::Aggressive);

        let timid = BehavioralAnswers {
            loss_reaction: LossReaction::SellAll,
            horizon: InvestmentHorizon::UpToOneYear,
            objective: InvestmentObjective::PreserveCapital,
        };
        let outcome = assess(&[false, false, false], &timid).unwrap();
        assert_eq!(outcome.score.value(), 1);
        assert_eq!(outcome.profile, RiskProfile::Conservative);
    }

    #[test]
    fn test_neutral_adjustments() {
        let outcome = assess(&[true, false, false], &neutral()).unwrap();
        // 50 -> 75 -> 62 -> 56, then +1 -1 -1
        assert_eq!(outcome.adaptive_score, 56);
        assert_eq!(outcome.score.value(), 55);
        assert_eq!(outcome.profile, RiskProfile::Moderate);
    }

    fn assess_state(answers: &[bool]) -> RiskAssessment {
        answers
            .iter()
            .try_fold(RiskAssessment::new(), |s, &a| s.answer(a))
            .unwrap()
    }
}
