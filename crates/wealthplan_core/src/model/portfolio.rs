//! Risk profiles and the strategic portfolios attached to them

use serde::{Deserialize, Serialize};

use crate::error::RiskError;

/// Final risk tolerance, an integer in 1..=99
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "u8")]
pub struct RiskScore(u8);

impl RiskScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 99;

    pub fn new(value: i32) -> Result<Self, RiskError> {
        if (i32::from(Self::MIN)..=i32::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RiskError::ScoreOutOfRange(value))
        }
    }

    /// Clamp any raw value into 1..=99
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(i32::from(Self::MIN), i32::from(Self::MAX)) as u8)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn profile(self) -> RiskProfile {
        RiskProfile::from_score(self)
    }
}

impl TryFrom<i32> for RiskScore {
    type Error = RiskError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RiskScore> for u8 {
    fn from(score: RiskScore) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub const CONSERVATIVE_MAX: u8 = 30;
    pub const MODERATE_MAX: u8 = 60;

    #[must_use]
    pub fn from_score(score: RiskScore) -> Self {
        match score.value() {
            s if s <= Self::CONSERVATIVE_MAX => RiskProfile::Conservative,
            s if s <= Self::MODERATE_MAX => RiskProfile::Moderate,
            _ => RiskProfile::Aggressive,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RiskProfile::Conservative => "Conservative",
            RiskProfile::Moderate => "Moderate",
            RiskProfile::Aggressive => "Aggressive",
        }
    }
}

/// Strategic weight of one asset class inside a segment, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClassWeight {
    pub name: String,
    pub weight_pct: f64,
}

fn classes(entries: &[(&str, f64)]) -> Vec<AssetClassWeight> {
    entries
        .iter()
        .map(|(name, weight_pct)| AssetClassWeight {
            name: (*name).to_string(),
            weight_pct: *weight_pct,
        })
        .collect()
}

/// Annualized expected return and volatility of one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentParameters {
    pub expected_return: f64,
    pub volatility: f64,
    #[serde(default)]
    pub classes: Vec<AssetClassWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioParameters {
    pub domestic: SegmentParameters,
    pub international: SegmentParameters,
}

impl PortfolioParameters {
    /// Expected return of the 70/30 domestic/international blend
    #[must_use]
    pub fn blended_return(&self) -> f64 {
        let w = crate::rates::DOMESTIC_WEIGHT;
        w * self.domestic.expected_return + (1.0 - w) * self.international.expected_return
    }

    /// Volatility of the blend, assuming uncorrelated segments
    #[must_use]
    pub fn blended_volatility(&self) -> f64 {
        let w = crate::rates::DOMESTIC_WEIGHT;
        let dom = w * self.domestic.volatility;
        let intl = (1.0 - w) * self.international.volatility;
        (dom * dom + intl * intl).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioTable {
    pub conservative: PortfolioParameters,
    pub moderate: PortfolioParameters,
    pub aggressive: PortfolioParameters,
}

impl PortfolioTable {
    #[must_use]
    pub fn for_profile(&self, profile: RiskProfile) -> &PortfolioParameters {
        match profile {
            RiskProfile::Conservative => &self.conservative,
            RiskProfile::Moderate => &self.moderate,
            RiskProfile::Aggressive => &self.aggressive,
        }
    }
}

impl Default for PortfolioTable {
    fn default() -> Self {
        Self {
            conservative: PortfolioParameters {
                domestic: SegmentParameters {
                    expected_return: 0.174,
                    volatility: 0.034,
                    classes: classes(&[
                        ("Liquidity CDI", 37.50),
                        ("BR Floating Credit", 17.50),
                        ("BR Fixed Rate", 0.00),
                        ("BR Inflation Linked", 10.00),
                        ("BR Absolute Return", 15.00),
                        ("BR Equities", 10.00),
                        ("BR Private Equity", 7.50),
                        ("BR Real Estate", 2.50),
                    ]),
                },
                international: SegmentParameters {
                    expected_return: 0.068,
                    volatility: 0.039,
                    classes: classes(&[
                        ("Cash Equivalent", 31.50),
                        ("Intl Fixed Rate", 13.00),
                        ("Intl Inflation Linked", 3.25),
                        ("Intl Private Credit", 7.25),
                        ("Intl Absolute Return", 13.00),
                        ("Intl Equities", 16.25),
                        ("Intl Private Equity", 8.50),
                        ("Intl Real Estate", 4.00),
                        ("Commodities", 3.25),
                    ]),
                },
            },
            moderate: PortfolioParameters {
                domestic: SegmentParameters {
                    expected_return: 0.188,
                    volatility: 0.049,
                    classes: classes(&[
                        ("Liquidity CDI", 22.50),
                        ("BR Floating Credit", 17.50),
                        ("BR Fixed Rate", 0.00),
                        ("BR Inflation Linked", 12.50),
                        ("BR Absolute Return", 12.50),
                        ("BR Equities", 15.00),
                        ("BR Private Equity", 15.00),
                        ("BR Real Estate", 5.00),
                    ]),
                },
                international: SegmentParameters {
                    expected_return: 0.081,
                    volatility: 0.045,
                    classes: classes(&[
                        ("Cash Equivalent", 12.00),
                        ("Intl Fixed Rate", 14.00),
                        ("Intl Inflation Linked", 3.50),
                        ("Intl Private Credit", 8.88),
                        ("Intl Absolute Return", 14.00),
                        ("Intl Equities", 17.50),
                        ("Intl Private Equity", 21.25),
                        ("Intl Real Estate", 5.38),
                        ("Commodities", 3.50),
                    ]),
                },
            },
            aggressive: PortfolioParameters {
                domestic: SegmentParameters {
                    expected_return: 0.202,
                    volatility: 0.068,
                    classes: classes(&[
                        ("Liquidity CDI", 10.00),
                        ("BR Floating Credit", 14.50),
                        ("BR Fixed Rate", 0.00),
                        ("BR Inflation Linked", 15.00),
                        ("BR Absolute Return", 10.00),
                        ("BR Equities", 22.50),
                        ("BR Private Equity", 21.00),
                        ("BR Real Estate", 7.00),
                    ]),
                },
                international: SegmentParameters {
                    expected_return: 0.095,
                    volatility: 0.056,
                    classes: classes(&[
                        ("Cash Equivalent", 4.25),
                        ("Intl Fixed Rate", 8.50),
                        ("Intl Inflation Linked", 2.13),
                        ("Intl Private Credit", 7.44),
                        ("Intl Absolute Return", 8.50),
                        ("Intl Equities", 25.63),
                        ("Intl Private Equity", 36.13),
                        ("Intl Real Estate", 5.31),
                        ("Commodities", 2.13),
                    ]),
                },
            },
        }
    }
}
