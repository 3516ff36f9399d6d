use crate::decimal::{CurrencyPrecision, Money};
use crate::errors::Result;
use crate::strategies::{month_weighted_rate, DateRange, RateStrategy, StrategyContext};
use crate::types::{CalculationInput, CalculationResult, PlanCategory, RatePurpose, RateType};

/// dividend rate, an average only
pub struct DividendRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> DividendRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    fn rate_type(&self, input: &CalculationInput) -> RateType {
        match self.ctx.config.category_of(input.plan_attributes.as_ref()) {
            PlanCategory::EnterpriseAnnuity => RateType::Declared,
            _ => RateType::Reference,
        }
    }
}

impl RateStrategy for DividendRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "dividend"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::Dividend
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let rate = match input.pre_resolved() {
            Some(rate) => rate,
            None => {
                let months = self
                    .ctx
                    .price_months(
                        input,
                        &range.periods(),
                        self.rate_type(input),
                        |p| p.month_start,
                    )?;
                month_weighted_rate(&months)
            }
        };

        Ok(self.ctx.finish(rate, Money::ZERO, Vec::new(), precision))
    }
}
