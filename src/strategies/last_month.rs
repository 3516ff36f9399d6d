use crate::calendar;
use crate::decimal::{CurrencyPrecision, Money};
use crate::errors::Result;
use crate::strategies::{blended_interest, DateRange, RateStrategy, StrategyContext};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// one rate, valid in the month containing the end date, for the whole range
pub struct LastMonthRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> LastMonthRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }
}

impl RateStrategy for LastMonthRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "last_month"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::LastMonth
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let days = range.total_days();
        let pre_resolved = input.pre_resolved().map(|r| r.floor_at_zero());

        if input.principal.is_zero() || days == 0 {
            let rate = pre_resolved.unwrap_or_default();
            return Ok(self.ctx.finish(rate, Money::ZERO, Vec::new(), precision));
        }

        let rate = match pre_resolved {
            Some(rate) => rate,
            None => self.ctx.resolve_rate(
                input,
                RateType::Declared,
                calendar::to_month_start(range.end),
            )?,
        };
        let interest = blended_interest(input.principal, rate, days, range.year_days());

        Ok(self.ctx.finish(rate, interest, Vec::new(), precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decimal::Rate;
    use crate::lookup::InMemoryRateTable;
    use crate::testing::{context, date, CountingRateTable};

    fn stepped_table() -> InMemoryRateTable {
        let mut table = InMemoryRateTable::new();
        table.insert_period(
            "LM01",
            RateType::Declared,
            Rate::from_units(300),
            date(2020, 1, 1),
            date(2023, 5, 31),
        );
        table.insert("LM01", RateType::Declared, Rate::from_units(200), date(2023, 6, 1));
        table
    }

    fn last_month_input() -> CalculationInput {
        CalculationInput::new(RatePurpose::LastMonth, Money::from_major(1_000_000))
            .with_account_key("LM01")
            .with_range(date(2023, 1, 1), date(2023, 6, 15))
    }

    #[test]
    fn test_uses_end_month_rate_only() {
        let table = CountingRateTable::new(stepped_table());
        let config = EngineConfig::default();
        let strategy = LastMonthRateStrategy::new(context(&table, &config));

        let result = strategy.calculate(&last_month_input(), CurrencyPrecision::Domestic).unwrap();

        assert_eq!(table.calls(), 1);
        assert_eq!(result.actual_rate, Rate::from_units(200));
        // 1,000,000 * 0.02 * 165 / 365
        assert_eq!(result.interest_amount, Money::from_major(9041));
        assert!(result.monthly_details.is_empty());
    }

    #[test]
    fn test_zero_principal_skips_lookup() {
        let table = CountingRateTable::new(stepped_table());
        let config = EngineConfig::default();
        let strategy = LastMonthRateStrategy::new(context(&table, &config));

        let mut input = last_month_input();
        input.principal = Money::ZERO;
        let result = strategy.calculate(&input, CurrencyPrecision::Foreign).unwrap();

        assert_eq!(table.calls(), 0);
        assert!(result.is_zero());
        assert_eq!(result.interest_amount.as_decimal().scale(), 2);
    }

    #[test]
    fn test_pre_resolved_rate() {
        let table = CountingRateTable::new(stepped_table());
        let config = EngineConfig::default();
        let strategy = LastMonthRateStrategy::new(context(&table, &config));

        let input = last_month_input().with_pre_resolved_rate(Rate::from_units(365));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();

        assert_eq!(table.calls(), 0);
        assert_eq!(result.actual_rate, Rate::from_units(365));
        // 1,000,000 * 0.0365 * 165 / 365
        assert_eq!(result.interest_amount, Money::from_major(16_500));
    }
}
