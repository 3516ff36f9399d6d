use crate::decimal::CurrencyPrecision;
use crate::errors::Result;
use crate::strategies::annuity::{AnnuityMode, AnnuityRateStrategy};
use crate::strategies::{
    day_weighted_rate, per_month_rounded, DateRange, RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// deposit-type sub-account interest, annuity plans hand off to the annuity strategy
pub struct DepositRateStrategy<'a> {
    ctx: StrategyContext<'a>,
    annuity: AnnuityRateStrategy<'a>,
}

impl<'a> DepositRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self {
            ctx,
            annuity: AnnuityRateStrategy::new(ctx),
        }
    }
}

impl RateStrategy for DepositRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "deposit"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::Deposit
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let plan = input.plan_attributes.as_ref();
        if self.ctx.config.category_of(plan).is_annuity() {
            let mode = if plan.map_or(false, |p| p.compound_interest) {
                AnnuityMode::Compound
            } else {
                AnnuityMode::Linear
            };
            return self.annuity.compute_mode(input, range, mode, precision);
        }

        let months = self
            .ctx
            .price_months(input, &range.periods(), RateType::Declared, |p| p.month_start)?;
        let (details, interest) = per_month_rounded(&months, input.principal, precision);

        Ok(self.ctx.finish(day_weighted_rate(&months), interest, details, precision))
    }
}
