pub mod household_file;

pub use household_file::{
    DataError, HouseholdFile, MarketSalary, MarketTable, PreparedRun, RiskSection, SalarySection,
};
