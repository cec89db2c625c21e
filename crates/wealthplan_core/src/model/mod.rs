mod household;
mod portfolio;
mod premises;
mod records;
mod results;

pub use household::{
    Child, Discretionary, HouseholdForm, HouseholdProfile, Housing, IlliquidAsset, IncomeStream,
    LifestyleTier, MacroAssumptions,
};
pub use portfolio::{
    AssetClassWeight, PortfolioParameters, PortfolioTable, RiskProfile, RiskScore,
    SegmentParameters,
};
pub use premises::{
    AgeBand, BenchmarkPremises, EducationPremises, HealthPremises, HousingPremises,
    LifestylePremises, Premises, ReservePremises, TierCost, TravelPremises, ValuationPremises,
    VehiclePremises, band_amount,
};
pub use records::{
    BucketReturns, BucketValues, Currency, ExpenseBreakdown, ExpenseCategory, ExpenseItem,
    IncomeBreakdown, ProjectionWarning, YearRecord,
};
pub use results::{MonteCarloSummary, PercentileBand, SegmentOutcome, SegmentSimulation};
