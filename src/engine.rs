use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::decimal::CurrencyPrecision;
use crate::errors::Result;
use crate::lookup::{RateLookup, RateTable};
use crate::strategies::{
    AnnuityRateStrategy, AvgDeclaredRateStrategy, DepositRateStrategy, DividendRateStrategy,
    FourBankRateStrategy, FreeLookRateStrategy, InterestCalcRateStrategy, LastMonthRateStrategy,
    LoanRateStrategy, RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose};

/// entry point: routes each calculation to the strategy owning its rate purpose
pub struct RateEngine<T> {
    table: T,
    config: EngineConfig,
}

impl<T: RateTable> RateEngine<T> {
    pub fn new(table: T) -> Self {
        Self {
            table,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(table: T, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { table, config })
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn context(&self) -> StrategyContext<'_> {
        StrategyContext::new(RateLookup::new(&self.table), &self.config)
    }

    /// strategy owning a rate purpose
    pub fn strategy_for(&self, purpose: RatePurpose) -> Box<dyn RateStrategy + '_> {
        let ctx = self.context();
        match purpose {
            RatePurpose::AnnuityCompound | RatePurpose::AnnuityLinear => {
                Box::new(AnnuityRateStrategy::new(ctx))
            }
            RatePurpose::Deposit => Box::new(DepositRateStrategy::new(ctx)),
            RatePurpose::PolicyLoan => Box::new(LoanRateStrategy::new(ctx)),
            RatePurpose::LastMonth => Box::new(LastMonthRateStrategy::new(ctx)),
            RatePurpose::FourBank => Box::new(FourBankRateStrategy::new(ctx)),
            RatePurpose::FreeLookRefund
            | RatePurpose::FreeLookPremium
            | RatePurpose::FreeLookDeclared => Box::new(FreeLookRateStrategy::new(ctx)),
            RatePurpose::Dividend => Box::new(DividendRateStrategy::new(ctx)),
            RatePurpose::AvgDeclared => Box::new(AvgDeclaredRateStrategy::new(ctx)),
            RatePurpose::InterestCalc => Box::new(InterestCalcRateStrategy::new(ctx)),
        }
    }

    /// calculate the actual rate and interest for one input
    pub fn calculate(
        &self,
        input: &CalculationInput,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let strategy = self.strategy_for(input.rate_purpose);
        debug!(
            purpose = %input.rate_purpose,
            strategy = strategy.name(),
            "dispatching rate calculation"
        );
        strategy.calculate(input, precision)
    }

    /// calculate with the purpose given as a raw code, unknown codes give the zero result
    pub fn calculate_code(
        &self,
        code: &str,
        input: &CalculationInput,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        match code.parse::<RatePurpose>() {
            Ok(purpose) => {
                let mut routed = input.clone();
                routed.rate_purpose = purpose;
                self.calculate(&routed, precision)
            }
            Err(e) => {
                warn!(error = %e, "rate purpose not recognised");
                Ok(CalculationResult::zero(precision))
            }
        }
    }

    /// calculate every input in order, stopping at the first rate table failure
    pub fn calculate_batch(
        &self,
        inputs: &[CalculationInput],
        precision: CurrencyPrecision,
    ) -> Result<Vec<CalculationResult>> {
        inputs.iter().map(|input| self.calculate(input, precision)).collect()
    }
}
