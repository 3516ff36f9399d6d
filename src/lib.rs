pub mod calendar;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod lookup;
pub mod strategies;
pub mod types;

#[cfg(test)]
mod testing;

// re-export key types
pub use config::{EngineConfig, PlanClassification};
pub use decimal::{CurrencyPrecision, Money, Rate};
pub use engine::RateEngine;
pub use errors::{RateEngineError, Result};
pub use lookup::{
    apply_discounts, InMemoryRateTable, PublishedRate, RateAdjustment, RateLookup,
    RateLookupResult, RateRow, RateTable,
};
pub use strategies::{
    AnnuityMode, AnnuityRateStrategy, AvgDeclaredRateStrategy, DateRange, DepositRateStrategy,
    DividendRateStrategy, FourBankRateStrategy, FreeLookRateStrategy, InterestCalcRateStrategy,
    LastMonthRateStrategy, LoanRateStrategy, RateStrategy, StrategyContext,
};
pub use types::{
    CalculationInput, CalculationResult, MonthlyDetail, PlanAttributes, PlanCategory,
    RatePurpose, RateType,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
