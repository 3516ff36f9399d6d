use crate::decimal::CurrencyPrecision;
use crate::errors::Result;
use crate::strategies::{
    blended_interest, day_weighted_rate, informational_details, total_days, DateRange,
    RateStrategy, StrategyContext,
};
use crate::types::{CalculationInput, CalculationResult, RatePurpose, RateType};

/// general day-weighted average rate, interest from the blended average
pub struct InterestCalcRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> InterestCalcRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }
}

impl RateStrategy for InterestCalcRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "interest_calc"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        purpose == RatePurpose::InterestCalc
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let months = self
            .ctx
            .price_months(input, &range.periods(), RateType::Reference, |p| p.month_start)?;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decimal::{Money, Rate};
    use crate::lookup::InMemoryRateTable;
    use crate::testing::{context, date, flat_table};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn interest_input() -> CalculationInput {
        CalculationInput::new(RatePurpose::InterestCalc, Money::from_major(1_000_000))
            .with_account_key("IC01")
            .with_range(date(2024, 1, 1), date(2024, 4, 1))
    }

    #[test]
    fn test_leap_quarter_constant_rate() {
        let table = flat_table("IC01", RateType::Reference, 250);
        let config = EngineConfig::default();
        let strategy = InterestCalcRateStrategy::new(context(&table, &config));

        let result = strategy.calculate(&interest_input(), CurrencyPrecision::Domestic).unwrap();

        assert_eq!(result.actual_rate, Rate::from_units(250));
        // 1,000,000 * 0.025 * 91 / 366 = 6215.85, rounded once
        assert_eq!(result.interest_amount, Money::from_major(6216));
        let diff = (result.interest_amount.as_decimal() - dec!(6158)).abs();
        assert!(diff <= dec!(100));

        let days: Vec<u32> = result.monthly_details.iter().map(|d| d.day_count).collect();
        assert_eq!(days, vec![31, 29, 31]);
        assert!(result.monthly_details.iter().all(|d| d.interest_amount.is_zero()));
    }

    #[test]
    fn test_single_month_reports_rate_exactly() {
        let table = flat_table("IC01", RateType::Reference, 187);
        let config = EngineConfig::default();
        let strategy = InterestCalcRateStrategy::new(context(&table, &config));

        let input = interest_input().with_range(date(2024, 5, 3), date(2024, 5, 28));
        let result = strategy.calculate(&input, CurrencyPrecision::Foreign).unwrap();

        assert_eq!(result.actual_rate, Rate::from_units(187));
        assert_eq!(result.monthly_details.len(), 1);
        assert_eq!(result.interest_amount.as_decimal().scale(), 2);
    }

    #[test]
    fn test_single_month_keeps_published_precision() {
        let published = Rate::from_decimal(dec!(250.12345678));
        let mut table = InMemoryRateTable::new();
        table.insert("IC01", RateType::Reference, published, date(2000, 1, 1));
        let input = interest_input().with_range(date(2024, 5, 1), date(2024, 6, 1));

        let config = EngineConfig::default();
        let strategy = InterestCalcRateStrategy::new(context(&table, &config));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();
        assert_eq!(result.actual_rate, published);

        let config = EngineConfig::default().with_rate_scale(4);
        let strategy = InterestCalcRateStrategy::new(context(&table, &config));
        let result = strategy.calculate(&input, CurrencyPrecision::Domestic).unwrap();
        assert_eq!(result.actual_rate, Rate::from_decimal(dec!(250.1235)));
    }

    #[test]
    fn test_blended_rate_drives_interest() {
        let mut table = InMemoryRateTable::new();
        table.insert_period(
            "IC01",
            RateType::Reference,
            Rate::from_units(300),
            date(2023, 1, 1),
            date(2023, 1, 31),
        );
        table.insert("IC01", RateType::Reference, Rate::from_units(200), date(2023, 2, 1));
        let config = EngineConfig::default();
        let strategy = InterestCalcRateStrategy::new(context(&table, &config));

        let input = interest_input().with_range(date(2023, 1, 1), date(2023, 3, 1));
        let result = strategy.calculate(&input, CurrencyPrecision::Foreign).unwrap();

        let average = Decimal::from(300 * 31 + 200 * 28) / Decimal::from(59);
        assert_eq!(result.actual_rate.as_decimal(), average);
        // blended: 1,000,000 * (14900 / 59 / 10000) * 59 / 365 = 14900 * 100 / 365
        assert_eq!(result.interest_amount.as_decimal(), dec!(4082.19));
    }
}
