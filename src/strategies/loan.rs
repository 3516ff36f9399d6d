use crate::decimal::CurrencyPrecision;
use crate::errors::Result;
use crate::strategies::{
    accumulated, day_weighted_rate, DateRange, PricedMonth, RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// policy loan interest
///
/// interior months accrue one extra day (both boundary days count), the final
/// month its exact days; interest is rounded once for the whole range
pub struct LoanRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> LoanRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    /// priced months with the loan day convention applied
    pub fn loan_months(
        &self,
        input: &CalculationInput,
        range: DateRange,
    ) -> Result<Vec<PricedMonth>> {
        let periods = range.periods();
        let months: Vec<PricedMonth> = match input.pre_resolved() {
            Some(rate) => periods
                .iter()
                .map(|p| PricedMonth::new(*p, rate.floor_at_zero()))
                .collect(),
            None => self
                .ctx
                .price_months(input, &periods, RateType::Loan, |p| p.month_start)?,
        };

        Ok(months
            .into_iter()
            .map(|m| PricedMonth {
                days: if m.period.is_final { m.days } else { m.days + 1 },
                ..m
            })
            .collect())
    }
}

impl RateStrategy for LoanRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "policy_loan"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::PolicyLoan
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let months = self.loan_months(input, range)?;
        let scale = self.ctx.config.detail_scale;
        let (details, interest) = accumulated(&months, input.principal, scale);

        Ok(self.ctx.finish(day_weighted_rate(&months), interest, details, precision))
    }
}
