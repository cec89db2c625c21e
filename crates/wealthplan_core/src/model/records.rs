//! Per-year projection records
//!
//! One `YearRecord` is produced for every year of the horizon. Monetary
//! fields are BRL unless the field name says otherwise.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    Brl,
    Usd,
}

impl Currency {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
        }
    }
}

/// Expense categories, each with its own formula and native currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Housing,
    /// School fees, domestic college and allowances
    EducationDomestic,
    /// College abroad
    EducationAbroad,
    Health,
    Vehicles,
    Lifestyle,
    Travel,
    SecondResidence,
    Luxury,
    Philanthropy,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Housing,
        ExpenseCategory::EducationDomestic,
        ExpenseCategory::EducationAbroad,
        ExpenseCategory::Health,
        ExpenseCategory::Vehicles,
        ExpenseCategory::Lifestyle,
        ExpenseCategory::Travel,
        ExpenseCategory::SecondResidence,
        ExpenseCategory::Luxury,
        ExpenseCategory::Philanthropy,
    ];

    #[must_use]
    pub fn currency(self) -> Currency {
        match self {
            ExpenseCategory::EducationAbroad | ExpenseCategory::Travel => Currency::Usd,
            _ => Currency::Brl,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::EducationDomestic => "Education",
            ExpenseCategory::EducationAbroad => "Education abroad",
            ExpenseCategory::Health => "Health",
            ExpenseCategory::Vehicles => "Vehicles",
            ExpenseCategory::Lifestyle => "Lifestyle",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::SecondResidence => "Second residence",
            ExpenseCategory::Luxury => "Luxury",
            ExpenseCategory::Philanthropy => "Philanthropy",
        }
    }
}

/// One category subtotal for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub category: ExpenseCategory,
    /// Amount in the category's native currency, inflated and scaled
    pub native: f64,
    /// Same amount converted to BRL at the year's exchange rate
    pub brl: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub items: Vec<ExpenseItem>,
    pub total_brl: f64,
    /// Sum of the USD-denominated categories, in USD
    pub total_usd: f64,
    /// Sum of the BRL-denominated categories
    pub brl_only: f64,
    /// USD-denominated categories converted to BRL
    pub usd_converted: f64,
}

impl ExpenseBreakdown {
    #[must_use]
    pub fn from_items(items: Vec<ExpenseItem>) -> Self {
        let mut breakdown = ExpenseBreakdown {
            items,
            ..Default::default()
        };
        for item in &breakdown.items {
            match item.category.currency() {
                Currency::Brl => breakdown.brl_only += item.brl,
                Currency::Usd => {
                    breakdown.total_usd += item.native;
                    breakdown.usd_converted += item.brl;
                }
            }
        }
        breakdown.total_brl = breakdown.brl_only + breakdown.usd_converted;
        breakdown
    }

    /// BRL subtotal of a category, zero when absent
    #[must_use]
    pub fn category(&self, category: ExpenseCategory) -> f64 {
        self.items
            .iter()
            .find(|item| item.category == category)
            .map_or(0.0, |item| item.brl)
    }
}

/// Income by source for one year, all in BRL
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub salary: f64,
    pub rent_brl: f64,
    pub rent_usd: f64,
    pub dividends_brl: f64,
    pub dividends_usd: f64,
    pub total: f64,
}

/// Values of the three wealth buckets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketValues {
    pub reserve: f64,
    pub liquid: f64,
    pub illiquid: f64,
    pub total: f64,
}

impl BucketValues {
    #[must_use]
    pub fn new(reserve: f64, liquid: f64, illiquid: f64) -> Self {
        Self {
            reserve,
            liquid,
            illiquid,
            total: reserve + liquid + illiquid,
        }
    }
}

/// Returns earned by each bucket during the year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketReturns {
    pub reserve: f64,
    pub liquid: f64,
    pub illiquid: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Year index, 0-based
    pub year: usize,
    pub calendar_year: Option<i16>,
    pub client_age: u32,
    /// BRL per USD
    pub exchange_rate: f64,
    pub expenses: ExpenseBreakdown,
    pub incomes: IncomeBreakdown,
    pub net_cash_flow: f64,
    /// Opening bucket values; liquid is display-adjusted by the currency-mix factor
    pub nominal: BucketValues,
    /// `nominal` deflated by cumulative BRL inflation
    pub real: BucketValues,
    /// Opening liquid value before the currency-mix adjustment
    pub liquid_unadjusted: f64,
    pub returns: BucketReturns,
    /// Reserve return plus liquid return
    pub financial_return: f64,
    /// Illiquid value at year + 1 minus value at year
    pub illiquid_appreciation: f64,
    /// Net cash flow plus financial return plus illiquid appreciation
    pub total_growth: f64,
}

/// Non-fatal conditions surfaced alongside a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionWarning {
    /// No salary is available while the client is still working
    SalaryMissing,
    /// The safety reserve requirement exceeds the investable wealth
    ReserveExceedsWealth { year: usize },
    /// The liquid portfolio was exhausted
    LiquidDepleted { year: usize },
}

impl std::fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectionWarning::SalaryMissing => {
                write!(f, "no salary available before retirement; projecting with zero salary")
            }
            ProjectionWarning::ReserveExceedsWealth { year } => write!(
                f,
                "year {year}: safety reserve requirement exceeds investable wealth"
            ),
            ProjectionWarning::LiquidDepleted { year } => {
                write!(f, "year {year}: liquid portfolio depleted")
            }
        }
    }
}
