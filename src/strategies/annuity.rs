use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{self, MonthPeriod};
use crate::decimal::{CurrencyPrecision, Money, Rate, RATE_UNITS};
use crate::errors::Result;
use crate::strategies::{
    day_weighted_rate, per_month_rounded, total_days, DateRange, PricedMonth, RateStrategy,
    StrategyContext,
};
use crate::types::{
    CalculationInput, CalculationResult, MonthlyDetail, PlanCategory, RatePurpose, RateType,
};

/// decimal places kept on the annualised compound rate
const ANNUALISED_SCALE: u32 = 20;

/// how annuity value accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AnnuityMode {
    /// monthly growth factors multiply
    Compound,
    /// simple interest per month
    Linear,
}

impl AnnuityMode {
    pub fn for_purpose(purpose: RatePurpose) -> Option<Self> {
        match purpose {
            RatePurpose::AnnuityCompound => Some(AnnuityMode::Compound),
            RatePurpose::AnnuityLinear => Some(AnnuityMode::Linear),
            _ => None,
        }
    }

    pub fn rate_type(&self) -> RateType {
        match self {
            AnnuityMode::Compound => RateType::Declared,
            AnnuityMode::Linear => RateType::AnnuityDaily,
        }
    }
}

/// compound and linear annuity accumulation
pub struct AnnuityRateStrategy<'a> {
    ctx: StrategyContext<'a>,
}

impl<'a> AnnuityRateStrategy<'a> {
    pub fn new(ctx: StrategyContext<'a>) -> Self {
        Self { ctx }
    }

    /// date whose rate applies to a month
    ///
    /// enterprise annuities follow the policy anniversary, and keep the
    /// issue-date rate while fewer policy years than the threshold have elapsed
    pub fn rate_as_of(&self, input: &CalculationInput, period: &MonthPeriod) -> NaiveDate {
        let plan = input.plan_attributes.as_ref();
        let issue = match (self.ctx.config.category_of(plan), input.policy_issue_date) {
            (PlanCategory::EnterpriseAnnuity, Some(issue)) => issue,
            _ => return period.month_start,
        };

        match self.ctx.config.issue_date_rate_years(plan) {
            Some(years) if calendar::elapsed_policy_years(issue, period.month_start) < years => {
                issue
            }
            _ => calendar::policy_anniversary(issue, period.month_start),
        }
    }

    /// calculate in an explicit mode, used when another strategy delegates here
    pub fn compute_mode(
        &self,
        input: &CalculationInput,
        range: DateRange,
        mode: AnnuityMode,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        let months = self.ctx.price_months(input, &range.periods(), mode.rate_type(), |p| {
            self.rate_as_of(input, p)
        })?;

        match mode {
            AnnuityMode::Compound => Ok(self.compound(input.principal, range, &months, precision)),
            AnnuityMode::Linear => {
                let (details, interest) = per_month_rounded(&months, input.principal, precision);
                Ok(self.ctx.finish(day_weighted_rate(&months), interest, details, precision))
            }
        }
    }

    fn compound(
        &self,
        principal: Money,
        range: DateRange,
        months: &[PricedMonth],
        precision: CurrencyPrecision,
    ) -> CalculationResult {
        let scale = self.ctx.config.detail_scale;
        let (details, product) = months.iter().fold(
            (Vec::<MonthlyDetail>::with_capacity(months.len()), Decimal::ONE),
            |(mut details, product), m| {
                let growth = m.rate.as_fraction() * Decimal::from(m.days)
                    / Decimal::from(m.period.year_days());
                let next = product * (Decimal::ONE + growth);
                details.push(m.detail(principal.scale_by(next - product).round_dp(scale)));
                (details, next)
            },
        );

        let growth = product - Decimal::ONE;
        let days = total_days(months);
        // annualised so a constant rate reports itself; the division leaves
        // residue past the 28th digit, trimmed at ANNUALISED_SCALE
        let actual_rate = if days == 0 {
            Rate::ZERO
        } else {
            let year_days = Decimal::from(range.year_days());
            let annualised = growth * RATE_UNITS * year_days / Decimal::from(days);
            Rate::from_decimal(annualised).round_dp(ANNUALISED_SCALE)
        };

        self.ctx.finish(actual_rate, principal.scale_by(growth), details, precision)
    }
}

impl RateStrategy for AnnuityRateStrategy<'_> {
    fn name(&self) -> &'static str {
        "annuity"
    }

    fn supports(&self, purpose: RatePurpose) -> bool {
        AnnuityMode::for_purpose(purpose).is_some()
    }

    fn compute(
        &self,
        input: &CalculationInput,
        range: DateRange,
        precision: CurrencyPrecision,
    ) -> Result<CalculationResult> {
        match AnnuityMode::for_purpose(input.rate_purpose) {
            Some(mode) => self.compute_mode(input, range, mode, precision),
            None => Ok(CalculationResult::zero(precision)),
        }
    }
}
