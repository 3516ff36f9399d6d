use tracing::debug;

use crate::calendar;
use crate::decimal::CurrencyPrecision;
use crate::errors::Result;
use crate::lookup::RateAdjustment;
use crate::strategies::{
    blended_interest, day_weighted_rate, informational_details, total_days, DateRange, PricedMonth,
    RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// interest refunded when a policy is cancelled during the free-look period
///
/// a single rate, looked up on the begin date, applies to every month
pub struct FreeLookRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> FreeLookRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn rate_type_for(purpose: RatePurpose) -> Option<RateType> {
        match purpose {
            RatePurpose::FreeLookRefund | RatePurpose::FreeLookPremium => Some(RateType::FreeLook),
            RatePurpose::FreeLookDeclared => Some(RateType::FreeLookDeclared),
            _ => None,
        }
    }

    /// explicit account key, else the plan's free-look rate code
    fn rate_key<'i>(input: &'i CalculationInput) -> Option<&'i str> {
        input
            .account_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                input
                    .plan_attributes
                    .as_ref()
                    .and_then(|p| p.free_look_rate_code.as_deref())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

impl RateStrategy for FreeLookRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "free_look"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        Self::rate_type_for(purpose).is_some()
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let rate_type = Self::rate_type_for(input.rate_purpose);
        let (Some(rate_type), Some(key)) = (rate_type, Self::rate_key(input)) else {
            debug!("free-look calculation without a rate key");
            return Ok(CalculationResult::zero(precision));
        };

        let found = self.ctx.lookup.lookup(
            Some(key),
            rate_type,
            range.begin,
            RateAdjustment::from_input(input),
        )?;
        if found.is_unavailable() {
            return Ok(CalculationResult::zero(precision));
        }
        let rate = found.adjusted_rate.floor_at_zero();

        let count = (calendar::months_between(range.begin, range.end) + 1).max(1) as u32;
        let months: Vec<PricedMonth> = range
            .periods_limited(count)
            .into_iter()
            .map(|p| PricedMonth::new(p, rate))
            .collect();

        let average = day_weighted_rate(&months);
        let interest = blended_interest(
            input.principal,
            average,
            total_days(&months),
            range.year_days(),
        );

        Ok(self.ctx.finish(average, interest, informational_details(&months, precision), precision))
    }
}
