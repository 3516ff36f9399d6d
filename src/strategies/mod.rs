pub mod annuity;
pub mod avg_declared;
pub mod deposit;
pub mod dividend;
pub mod four_bank;
pub mod free_look;
pub mod interest_calc;
pub mod last_month;
pub mod loan;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calendar::{self, MonthPeriod};
use crate::config::EngineConfig;
use crate::decimal::{CurrencyPrecision, Money, Rate};
use crate::errors::Result;
use crate::lookup::{RateAdjustment, RateLookup, RateLookupResult};
use crate::types::{CalculationInput, CalculationResult, MonthlyDetail, RatePurpose, RateType};

pub use annuity::{AnnuityMode, AnnuityRateStrategy};
pub use avg_declared::AvgDeclaredRateStrategy;
pub use deposit::DepositRateStrategy;
pub use dividend::DividendRateStrategy;
pub use four_bank::FourBankRateStrategy;
pub use free_look::FreeLookRateStrategy;
pub use interest_calc::InterestCalcRateStrategy;
pub use last_month::LastMonthRateStrategy;
pub use loan::LoanRateStrategy;

/// validated calculation range, `begin < end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub begin: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// both dates present and correctly ordered, otherwise none
    pub fn from_input(input: &CalculationInput) -> Option<Self> {
        match (input.begin_date, input.end_date) {
            (Some(begin), Some(end)) if begin < end => Some(Self { begin, end }),
            _ => None,
        }
    }

    pub fn total_days(&self) -> u32 {
        (self.end - self.begin).num_days().max(0) as u32
    }

    /// year basis for range-level interest
    pub fn year_days(&self) -> u32 {
        calendar::year_day_count(self.begin)
    }

    /// every calendar month the range touches
    pub fn periods(&self) -> Vec<MonthPeriod> {
        self.periods_limited(calendar::period_count(self.begin, self.end))
    }

    pub fn periods_limited(&self, count: u32) -> Vec<MonthPeriod> {
        calendar::month_periods(self.begin, self.end, count)
    }
}

/// common contract of the rate calculations
pub trait RateStrategy {
    fn name(&self) -> &'static str;

    fn supports(&self, purpose: RatePurpose) -> bool;

    /// calculate over a range already known to be valid
    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult>;

    /// guarded entry point, anomalies resolve to the zero result
    fn calculate(
        &self,
        input: &CalculationInput,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        if !self.supports(input.rate_purpose) {
            warn!(
                strategy = self.name(),
                purpose = %input.rate_purpose,
                "unsupported rate purpose"
            );
            return Ok(CalculationResult::zero(precision));
        }
        let Some(range) = DateRange::from_input(input) else {
            debug!(
                strategy = self.name(),
                begin = ?input.begin_date,
                end = ?input.end_date,
                "missing or misordered range"
            );
            return Ok(CalculationResult::zero(precision));
        };
        self.compute(input, range, precision)
    }
}

/// one month of a range with the rate that applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedMonth {
    pub period: MonthPeriod,
    pub rate: Rate,
    /// accrual days, normally the period's actual days
    pub days: u32,
}

impl PricedMonth {
    pub fn new(period: MonthPeriod, rate: Rate) -> Self {
        Self {
            period,
            rate,
            days: period.days(),
        }
    }

    /// simple interest for this month on the month's own year basis
    pub fn interest(&self, principal: Money) -> Money {
        principal.simple_interest(self.rate, self.days, self.period.year_days())
    }

    pub fn detail(&self, interest_amount: Money) -> MonthlyDetail {
        MonthlyDetail {
            month_label: self.period.label(),
            day_count: self.days,
            rate_factor: self.rate,
            interest_amount,
        }
    }
}

pub fn total_days(months: &[PricedMonth]) -> u32 {
    months.iter().map(|m| m.days).sum()
}

/// each month weighs by its accrual days
pub fn day_weighted_rate(months: &[PricedMonth]) -> Rate {
    let days = total_days(months);
    if days == 0 {
        return Rate::ZERO;
    }
    let weighted: Decimal = months
        .iter()
        .map(|m| m.rate.as_decimal() * Decimal::from(m.days))
        .sum();
    Rate::from_decimal(weighted / Decimal::from(days))
}

/// each month weighs the same
pub fn month_weighted_rate(months: &[PricedMonth]) -> Rate {
    if months.is_empty() {
        return Rate::ZERO;
    }
    let sum: Decimal = months.iter().map(|m| m.rate.as_decimal()).sum();
    Rate::from_decimal(sum / Decimal::from(months.len() as u64))
}

/// details carrying days and rate only
pub fn informational_details(
    months: &[PricedMonth],
    precision: CurrencyPrecision,
) -> Vec<MonthlyDetail> {
    let zero = Money::ZERO.round_to(precision);
    months.iter().map(|m| m.detail(zero)).collect()
}

/// round every month on its own, the total is the sum of the rounded months
pub fn per_month_rounded(
    months: &[PricedMonth],
    principal: Money,
    precision: CurrencyPrecision,
) -> (Vec<MonthlyDetail>, Money) {
    let start = (Vec::with_capacity(months.len()), Money::ZERO.round_to(precision));
    months.iter().fold(start, |(mut details, total), m| {
        let interest = m.interest(principal).round_to(precision);
        details.push(m.detail(interest));
        (details, total + interest)
    })
}

/// accumulate unrounded monthly interest, the caller rounds the total once
pub fn accumulated(
    months: &[PricedMonth],
    principal: Money,
    detail_scale: u32,
) -> (Vec<MonthlyDetail>, Money) {
    let start = (Vec::with_capacity(months.len()), Money::ZERO);
    months.iter().fold(start, |(mut details, total), m| {
        let interest = m.interest(principal);
        details.push(m.detail(interest.round_dp(detail_scale)));
        (details, total + interest)
    })
}

/// collaborators every strategy shares
#[derive(Clone, Copy)]
pub struct StrategyContext<'a> {
    pub lookup: RateLookup<'a>,
    pub config: &'a EngineConfig,
}

impl<'a> StrategyContext<'a> {
    pub fn new(lookup: RateLookup<'a>, config: &'a EngineConfig) -> Self {
        Self { lookup, config }
    }

    /// adjusted lookup for the input's rate key
    pub fn lookup(
        &self,
        input: &CalculationInput,
        rate_type: RateType,
        as_of: NaiveDate,
    ) -> Result<RateLookupResult> {
        self.lookup
            .lookup(input.rate_key(), rate_type, as_of, RateAdjustment::from_input(input))
    }

    /// adjusted rate in force on `as_of`, never negative
    pub fn resolve_rate(
        &self,
        input: &CalculationInput,
        rate_type: RateType,
        as_of: NaiveDate,
    ) -> Result<Rate> {
        Ok(self.lookup(input, rate_type, as_of)?.adjusted_rate.floor_at_zero())
    }

    /// price each period with the rate in force on the date `as_of` picks
    pub fn price_months<F>(
        &self,
        input: &CalculationInput,
        periods: &[MonthPeriod],
        rate_type: RateType,
        as_of: F,
    ) -> Result<Vec<PricedMonth>>
    where
        F: Fn(&MonthPeriod) -> NaiveDate,
    {
        periods
            .iter()
            .map(|p| -> Result<PricedMonth> {
                Ok(PricedMonth::new(*p, self.resolve_rate(input, rate_type, as_of(p))?))
            })
            .collect()
    }

    /// final rounding: interest to the currency, actual rate only when a rate scale is set
    pub fn finish(
        &self,
        actual_rate: Rate,
        interest: Money,
        monthly_details: Vec<MonthlyDetail>,
        precision: CurrencyPrecision,
    ) -> CalculationResult {
        CalculationResult {
            actual_rate: match self.config.rate_scale {
                Some(scale) => actual_rate.floor_at_zero().round_dp(scale),
                None => actual_rate.floor_at_zero(),
            },
            interest_amount: interest.round_to(precision),
            monthly_details,
        }
    }
}

/// interest on a blended rate over the whole range
pub fn blended_interest(principal: Money, rate: Rate, days: u32, year_days: u32) -> Money {
    principal.simple_interest(rate, days, year_days)
}
