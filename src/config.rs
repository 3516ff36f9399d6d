use serde::{Deserialize, Serialize};

use crate::errors::{RateEngineError, Result};
use crate::types::{PlanAttributes, PlanCategory};

/// engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// decimal places kept on the reported actual rate, full precision when unset
    pub rate_scale: Option<u32>,
    /// decimal places kept on unrounded monthly interest shares
    pub detail_scale: u32,
    /// ceiling on months iterated by the four-bank calculation
    pub four_bank_month_cap: u32,
    /// trailing months averaged for the declared-rate average
    pub avg_declared_months: u32,
    pub classification: PlanClassification,
    /// issue-date pinning threshold when the plan carries none
    pub default_issue_date_rate_years: Option<u32>,
}

/// insurance-type codes mapped to routing categories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanClassification {
    pub deposit_types: Vec<String>,
    pub annuity_types: Vec<String>,
    pub enterprise_annuity_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_scale: None,
            detail_scale: 6,
            four_bank_month_cap: 120,
            avg_declared_months: 12,
            classification: PlanClassification::standard(),
            default_issue_date_rate_years: None,
        }
    }
}

impl PlanClassification {
    /// default insurance-type codes
    pub fn standard() -> Self {
        Self {
            deposit_types: vec!["D".to_string(), "U".to_string()],
            annuity_types: vec!["A".to_string()],
            enterprise_annuity_types: vec!["E".to_string(), "G".to_string()],
        }
    }

    pub fn category_of(&self, insurance_type: &str) -> PlanCategory {
        let code = insurance_type.trim();
        let listed = |codes: &[String]| codes.iter().any(|c| c.eq_ignore_ascii_case(code));

        // enterprise wins over plain annuity when a code appears in both
        if listed(&self.enterprise_annuity_types) {
            PlanCategory::EnterpriseAnnuity
        } else if listed(&self.annuity_types) {
            PlanCategory::Annuity
        } else if listed(&self.deposit_types) {
            PlanCategory::Deposit
        } else {
            PlanCategory::Other
        }
    }
}

impl EngineConfig {
    /// load configuration from json, missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_classification(mut self, classification: PlanClassification) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_rate_scale(mut self, scale: u32) -> Self {
        self.rate_scale = Some(scale);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(scale) = self.rate_scale.filter(|s| *s > 12) {
            return Err(RateEngineError::InvalidConfiguration {
                message: format!("rate scale {scale} exceeds 12 places"),
            });
        }
        if self.detail_scale > 12 {
            return Err(RateEngineError::InvalidConfiguration {
                message: format!("detail scale {} exceeds 12 places", self.detail_scale),
            });
        }
        if self.four_bank_month_cap == 0 {
            return Err(RateEngineError::InvalidConfiguration {
                message: "four-bank month cap must be positive".to_string(),
            });
        }
        if self.avg_declared_months == 0 {
            return Err(RateEngineError::InvalidConfiguration {
                message: "declared-rate average needs at least one month".to_string(),
            });
        }
        Ok(())
    }

    /// routing category of the input's plan, `Other` when no plan is supplied
    pub fn category_of(&self, plan: Option<&PlanAttributes>) -> PlanCategory {
        plan.map(|p| self.classification.category_of(&p.insurance_type))
            .unwrap_or(PlanCategory::Other)
    }

    /// policy years during which an enterprise annuity keeps its issue-date rate
    pub fn issue_date_rate_years(&self, plan: Option<&PlanAttributes>) -> Option<u32> {
        plan.and_then(|p| p.issue_date_rate_years)
            .or(self.default_issue_date_rate_years)
    }
}
