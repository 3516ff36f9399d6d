use crate::calendar;
use crate::decimal::{CurrencyPrecision, Rate};
use crate::errors::Result;
use crate::strategies::{
    accumulated, day_weighted_rate, DateRange, PricedMonth, RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// four-bank rate: a published reference rate is reported, a separate
/// interest-bearing rate drives the interest
pub struct FourBankRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> FourBankRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    /// interest-bearing rate for a month
    ///
    /// precedence: the caller's pre-resolved rate, then the loan rate family
    fn bearing_rate(&self, input: &CalculationInput, month: &PricedMonth) -> Result<Rate> {
        match input.pre_resolved() {
            Some(rate) => Ok(rate.floor_at_zero()),
            None => self.ctx.resolve_rate(input, RateType::Loan, month.period.month_start),
        }
    }
}

impl RateStrategy for FourBankRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "four_bank"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::FourBank
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let count = calendar::period_count(range.begin, range.end)
            .min(self.ctx.config.four_bank_month_cap);
        let periods = range.periods_limited(count);

        // reported rate: unadjusted reference publication
        let reference = periods
            .iter()
            .map(|p| -> Result<PricedMonth> {
                let published = self
                    .ctx
                    .lookup(input, RateType::Reference, p.month_start)?
                    .published_rate;
                Ok(PricedMonth::new(*p, published.floor_at_zero()))
            })
            .collect::<Result<Vec<_>>>()?;

        let bearing = reference
            .iter()
            .map(|m| -> Result<PricedMonth> {
                Ok(PricedMonth {
                    rate: self.bearing_rate(input, m)?,
                    ..*m
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let scale = self.ctx.config.detail_scale;
        let (bearing_details, interest) = accumulated(&bearing, input.principal, scale);
        let details = reference
            .iter()
            .zip(bearing_details)
            .map(|(m, b)| m.detail(b.interest_amount))
            .collect();

        Ok(self.ctx.finish(day_weighted_rate(&reference), interest, details, precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decimal::Money;
    use crate::lookup::InMemoryRateTable;
    use crate::testing::{context, date, CountingRateTable};

    fn table() -> InMemoryRateTable {
        InMemoryRateTable::new()
            .with_rate("FB01", RateType::Reference, Rate::from_units(160), date(2000, 1, 1))
            .with_rate("FB01", RateType::Loan, Rate::from_units(600), date(2000, 1, 1))
    }

    fn four_bank_input() -> CalculationInput {
        CalculationInput::new(RatePurpose::FourBank, Money::from_major(1_000_000))
            .with_account_key("FB01")
            .with_range(date(2023, 1, 1), date(2024, 1, 1))
    }

    #[test]
    fn test_reports_reference_rate_and_charges_pre_resolved() {
        let table = table();
        let config = EngineConfig::default();
        let strategy = FourBankRateStrategy::new(context(&table, &config));

        let input = four_bank_input().with_pre_resolved_rate(Rate::from_units(400));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();

        assert_eq!(result.actual_rate, Rate::from_units(160));
        assert_eq!(result.interest_amount, Money::from_major(40_000));
        assert_eq!(result.monthly_details.len(), 12);
        assert!(result.monthly_details.iter().all(|d| d.rate_factor == Rate::from_units(160)));
    }

    #[test]
    fn test_falls_back_to_loan_rate() {
        let table = table();
        let config = EngineConfig::default();
        let strategy = FourBankRateStrategy::new(context(&table, &config));

        let input = four_bank_input().with_pre_resolved_rate(Rate::ZERO);
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();

        assert_eq!(result.actual_rate, Rate::from_units(160));
        assert_eq!(result.interest_amount, Money::from_major(60_000));
    }

    #[test]
    fn test_reference_rate_ignores_markdown() {
        let table = table();
        let config = EngineConfig::default();
        let strategy = FourBankRateStrategy::new(context(&table, &config));

        let input = four_bank_input().with_markdown(Rate::from_units(100));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();

        assert_eq!(result.actual_rate, Rate::from_units(160));
        // loan rate 600 marked down to 500
        assert_eq!(result.interest_amount, Money::from_major(50_000));
    }

    #[test]
    fn test_month_count_capped_at_ten_years() {
        let table = CountingRateTable::new(table());
        let config = EngineConfig::default();
        let strategy = FourBankRateStrategy::new(context(&table, &config));

        let input = four_bank_input()
            .with_range(date(2000, 1, 1), date(2015, 1, 1))
            .with_pre_resolved_rate(Rate::from_units(400));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();

        assert_eq!(result.monthly_details.len(), 120);
        assert_eq!(table.calls(), 120);
        assert_eq!(result.monthly_details[119].month_label, "2009-12");
        // ten years of days only
        assert_eq!(result.total_days(), 3653);
    }
}
