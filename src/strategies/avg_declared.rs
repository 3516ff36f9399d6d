use rust_decimal::Decimal;

use crate::calendar;
use crate::decimal::{CurrencyPrecision, Money, Rate};
use crate::errors::Result;
use crate::lookup::RateAdjustment;
use crate::strategies::{DateRange, RateStrategy, StrategyContext};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// mean of the published declared rates over the trailing months up to the end date
pub struct AvgDeclaredRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> AvgDeclaredRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }
}

impl RateStrategy for AvgDeclaredRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "avg_declared"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::AvgDeclared
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let months = self.ctx.config.avg_declared_months as i32;
        let last = calendar::to_month_start(range.end);

        let mut sum = Decimal::ZERO;
        for offset in (0..months).rev() {
            let Some(month) = calendar::add_months(last, -offset) else {
                continue;
            };
            // published rate, markdown and discount do not apply here
            let found = self
                .ctx
                .lookup
                .lookup(input.rate_key(), RateType::Declared, month, RateAdjustment::NONE)?;
            sum += found.published_rate.floor_at_zero().as_decimal();
        }

        let average = Rate::from_decimal(sum / Decimal::from(months));
        Ok(self.ctx.finish(average, Money::ZERO, Vec::new(), precision))
    }
}
