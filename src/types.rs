use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decimal::{CurrencyPrecision, Money, Rate};
use crate::errors::RateEngineError;

/// business calculation being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatePurpose {
    /// compound annuity accumulation
    #[serde(rename = "AC")]
    AnnuityCompound,
    /// linear (annuity daily) accumulation
    #[serde(rename = "AL")]
    AnnuityLinear,
    /// deposit-type sub-account interest
    #[serde(rename = "DP")]
    Deposit,
    /// policy loan interest
    #[serde(rename = "PL")]
    PolicyLoan,
    /// single rate valid at the last month of the range
    #[serde(rename = "LM")]
    LastMonth,
    /// four-bank reference rate with a separate interest-bearing rate
    #[serde(rename = "FB")]
    FourBank,
    #[serde(rename = "FL1")]
    FreeLookRefund,
    #[serde(rename = "FL2")]
    FreeLookPremium,
    #[serde(rename = "FL3")]
    FreeLookDeclared,
    #[serde(rename = "DV")]
    Dividend,
    /// trailing twelve-month declared rate average
    #[serde(rename = "AD")]
    AvgDeclared,
    /// general day-weighted average rate
    #[serde(rename = "IC")]
    InterestCalc,
}

impl RatePurpose {
    pub const ALL: [RatePurpose; 12] = [
        RatePurpose::AnnuityCompound,
        RatePurpose::AnnuityLinear,
        RatePurpose::Deposit,
        RatePurpose::PolicyLoan,
        RatePurpose::LastMonth,
        RatePurpose::FourBank,
        RatePurpose::FreeLookRefund,
        RatePurpose::FreeLookPremium,
        RatePurpose::FreeLookDeclared,
        RatePurpose::Dividend,
        RatePurpose::AvgDeclared,
        RatePurpose::InterestCalc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RatePurpose::AnnuityCompound => "AC",
            RatePurpose::AnnuityLinear => "AL",
            RatePurpose::Deposit => "DP",
            RatePurpose::PolicyLoan => "PL",
            RatePurpose::LastMonth => "LM",
            RatePurpose::FourBank => "FB",
            RatePurpose::FreeLookRefund => "FL1",
            RatePurpose::FreeLookPremium => "FL2",
            RatePurpose::FreeLookDeclared => "FL3",
            RatePurpose::Dividend => "DV",
            RatePurpose::AvgDeclared => "AD",
            RatePurpose::InterestCalc => "IC",
        }
    }
}

impl fmt::Display for RatePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RatePurpose {
    type Err = RateEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        RatePurpose::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RateEngineError::UnknownRatePurpose {
                code: s.to_string(),
            })
    }
}

/// lookup type code, the rate-family segment of the rate table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateType {
    /// four-bank / general reference rate
    #[serde(rename = "0")]
    Reference,
    #[serde(rename = "1")]
    FreeLook,
    #[serde(rename = "2")]
    Loan,
    /// declared (compound) rate
    #[serde(rename = "5")]
    Declared,
    #[serde(rename = "8")]
    AnnuityDaily,
    #[serde(rename = "9")]
    FreeLookDeclared,
}

impl RateType {
    pub fn code(&self) -> &'static str {
        match self {
            RateType::Reference => "0",
            RateType::FreeLook => "1",
            RateType::Loan => "2",
            RateType::Declared => "5",
            RateType::AnnuityDaily => "8",
            RateType::FreeLookDeclared => "9",
        }
    }
}

impl fmt::Display for RateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RateType {
    type Err = RateEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(RateType::Reference),
            "1" => Ok(RateType::FreeLook),
            "2" => Ok(RateType::Loan),
            "5" => Ok(RateType::Declared),
            "8" => Ok(RateType::AnnuityDaily),
            "9" => Ok(RateType::FreeLookDeclared),
            other => Err(RateEngineError::UnknownRateType {
                code: other.to_string(),
            }),
        }
    }
}

/// routing category of a plan, resolved from its insurance type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanCategory {
    Deposit,
    Annuity,
    /// annuity whose rates follow the policy anniversary
    EnterpriseAnnuity,
    Other,
}

impl PlanCategory {
    pub fn is_annuity(&self) -> bool {
        matches!(self, PlanCategory::Annuity | PlanCategory::EnterpriseAnnuity)
    }
}

/// read-only plan reference data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanAttributes {
    pub plan_code: String,
    /// insurance-type classification code
    pub insurance_type: String,
    /// rate key used for free-look refund interest
    pub free_look_rate_code: Option<String>,
    /// annuity accumulates with compounding instead of linearly
    pub compound_interest: bool,
    /// policy years during which the issue-date rate stays pinned
    pub issue_date_rate_years: Option<u32>,
}

impl PlanAttributes {
    pub fn new(plan_code: impl Into<String>, insurance_type: impl Into<String>) -> Self {
        Self {
            plan_code: plan_code.into(),
            insurance_type: insurance_type.into(),
            ..Default::default()
        }
    }

    pub fn with_free_look_rate_code(mut self, code: impl Into<String>) -> Self {
        self.free_look_rate_code = Some(code.into());
        self
    }

    pub fn with_compound_interest(mut self, compound: bool) -> Self {
        self.compound_interest = compound;
        self
    }

    pub fn with_issue_date_rate_years(mut self, years: u32) -> Self {
        self.issue_date_rate_years = Some(years);
        self
    }
}

/// one calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    pub rate_purpose: RatePurpose,
    pub begin_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub principal: Money,
    pub account_key: Option<String>,
    pub plan_code: Option<String>,
    /// rate already resolved by an earlier step
    pub pre_resolved_rate: Option<Rate>,
    /// subtracted from the published rate
    pub rate_markdown: Option<Rate>,
    /// percentage of the marked-down rate that applies (90 keeps 90%)
    pub rate_discount_percent: Option<Decimal>,
    pub policy_issue_date: Option<NaiveDate>,
    pub plan_attributes: Option<PlanAttributes>,
}

impl CalculationInput {
    pub fn new(rate_purpose: RatePurpose, principal: Money) -> Self {
        Self {
            rate_purpose,
            begin_date: None,
            end_date: None,
            principal,
            account_key: None,
            plan_code: None,
            pre_resolved_rate: None,
            rate_markdown: None,
            rate_discount_percent: None,
            policy_issue_date: None,
            plan_attributes: None,
        }
    }

    pub fn with_range(mut self, begin: NaiveDate, end: NaiveDate) -> Self {
        self.begin_date = Some(begin);
        self.end_date = Some(end);
        self
    }

    pub fn with_account_key(mut self, key: impl Into<String>) -> Self {
        self.account_key = Some(key.into());
        self
    }

    pub fn with_plan_code(mut self, code: impl Into<String>) -> Self {
        self.plan_code = Some(code.into());
        self
    }

    pub fn with_pre_resolved_rate(mut self, rate: Rate) -> Self {
        self.pre_resolved_rate = Some(rate);
        self
    }

    pub fn with_markdown(mut self, markdown: Rate) -> Self {
        self.rate_markdown = Some(markdown);
        self
    }

    pub fn with_discount_percent(mut self, percent: Decimal) -> Self {
        self.rate_discount_percent = Some(percent);
        self
    }

    pub fn with_policy_issue_date(mut self, issue_date: NaiveDate) -> Self {
        self.policy_issue_date = Some(issue_date);
        self
    }

    pub fn with_plan_attributes(mut self, attributes: PlanAttributes) -> Self {
        self.plan_attributes = Some(attributes);
        self
    }

    /// key into the rate table: the account key, else the plan code
    pub fn rate_key(&self) -> Option<&str> {
        [
            self.account_key.as_deref(),
            self.plan_code.as_deref(),
            self.plan_attributes.as_ref().map(|p| p.plan_code.as_str()),
        ]
        .into_iter()
        .flatten()
        .find(|k| !k.trim().is_empty())
    }

    /// pre-resolved rate, treating zero as absent
    pub fn pre_resolved(&self) -> Option<Rate> {
        self.pre_resolved_rate.filter(|r| !r.is_zero())
    }
}

/// per-month breakdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyDetail {
    pub month_label: String,
    pub day_count: u32,
    pub rate_factor: Rate,
    pub interest_amount: Money,
}

/// output of a single calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub actual_rate: Rate,
    pub interest_amount: Money,
    pub monthly_details: Vec<MonthlyDetail>,
}

impl CalculationResult {
    /// zero rate, zero interest, no detail
    pub fn zero(precision: CurrencyPrecision) -> Self {
        Self {
            actual_rate: Rate::ZERO,
            interest_amount: Money::ZERO.round_to(precision),
            monthly_details: Vec::new(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.actual_rate.is_zero() && self.interest_amount.is_zero()
    }

    pub fn total_days(&self) -> u32 {
        self.monthly_details.iter().map(|d| d.day_count).sum()
    }

    /// sum of the per-month interest shares
    pub fn detail_interest(&self) -> Money {
        self.monthly_details.iter().map(|d| d.interest_amount).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purpose_codes_round_trip() {
        for purpose in RatePurpose::ALL {
            assert_eq!(purpose.code().parse::<RatePurpose>().unwrap(), purpose);
        }
        assert_eq!("fl2".parse::<RatePurpose>().unwrap(), RatePurpose::FreeLookPremium);
        assert!("XX".parse::<RatePurpose>().is_err());
    }

    #[test]
    fn test_purpose_serde_uses_codes() {
        let json = serde_json::to_string(&RatePurpose::PolicyLoan).unwrap();
        assert_eq!(json, "\"PL\"");
        let parsed: RateType = serde_json::from_str("\"8\"").unwrap();
        assert_eq!(parsed, RateType::AnnuityDaily);
    }

    #[test]
    fn test_rate_key_precedence() {
        let input = CalculationInput::new(RatePurpose::PolicyLoan, Money::from_major(1))
            .with_plan_code("PLAN")
            .with_account_key("ACCT");
        assert_eq!(input.rate_key(), Some("ACCT"));

        let input = CalculationInput::new(RatePurpose::PolicyLoan, Money::from_major(1))
            .with_plan_code("PLAN");
        assert_eq!(input.rate_key(), Some("PLAN"));

        let input = CalculationInput::new(RatePurpose::PolicyLoan, Money::from_major(1))
            .with_account_key("  ");
        assert_eq!(input.rate_key(), None);
    }

    #[test]
    fn test_zero_pre_resolved_is_absent() {
        let input = CalculationInput::new(RatePurpose::FourBank, Money::from_major(1))
            .with_pre_resolved_rate(Rate::ZERO);
        assert_eq!(input.pre_resolved(), None);
    }

    #[test]
    fn test_zero_result_scale() {
        let result = CalculationResult::zero(CurrencyPrecision::Foreign);
        assert!(result.is_zero());
        assert_eq!(result.interest_amount.as_decimal().scale(), 2);
        assert!(result.monthly_details.is_empty());
    }
}
