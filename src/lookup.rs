use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::decimal::Rate;
use crate::errors::{RateEngineError, Result};
use crate::types::{CalculationInput, RateType};

/// one published rate row and its effective period (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedRate {
    pub rate: Rate,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

impl PublishedRate {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.map_or(true, |to| date <= to)
    }
}

/// external rate table, read-only
pub trait RateTable: Send + Sync {
    /// all published rows for a key and rate family
    fn published_rates(&self, key: &str, rate_type: RateType) -> Result<Vec<PublishedRate>>;
}

/// in-process rate table
#[derive(Debug, Clone, Default)]
pub struct InMemoryRateTable {
    rows: HashMap<(String, RateType), Vec<PublishedRate>>,
}

/// flat row layout used for json loading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRow {
    pub key: String,
    pub rate_type: RateType,
    pub rate: Rate,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

impl InMemoryRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// load rows from a json array of `RateRow`
    pub fn from_json(json: &str) -> Result<Self> {
        let rows: Vec<RateRow> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for row in rows {
            table.insert_row(row)?;
        }
        Ok(table)
    }

    pub fn insert_row(&mut self, row: RateRow) -> Result<()> {
        if let Some(to) = row.effective_to {
            if to < row.effective_from {
                return Err(RateEngineError::InvalidRateRow {
                    message: format!(
                        "{} type {} ends {} before it starts {}",
                        row.key, row.rate_type, to, row.effective_from
                    ),
                });
            }
        }
        self.rows
            .entry((row.key, row.rate_type))
            .or_default()
            .push(PublishedRate {
                rate: row.rate,
                effective_from: row.effective_from,
                effective_to: row.effective_to,
            });
        Ok(())
    }

    /// add an open-ended rate effective from `from`
    pub fn insert(&mut self, key: &str, rate_type: RateType, rate: Rate, from: NaiveDate) {
        self.rows
            .entry((key.to_string(), rate_type))
            .or_default()
            .push(PublishedRate {
                rate,
                effective_from: from,
                effective_to: None,
            });
    }

    /// add a rate for a closed period
    pub fn insert_period(
        &mut self,
        key: &str,
        rate_type: RateType,
        rate: Rate,
        from: NaiveDate,
        to: NaiveDate,
    ) {
        self.rows
            .entry((key.to_string(), rate_type))
            .or_default()
            .push(PublishedRate {
                rate,
                effective_from: from,
                effective_to: Some(to),
            });
    }

    pub fn with_rate(
        mut self,
        key: &str,
        rate_type: RateType,
        rate: Rate,
        from: NaiveDate,
    ) -> Self {
        self.insert(key, rate_type, rate, from);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateTable for InMemoryRateTable {
    fn published_rates(&self, key: &str, rate_type: RateType) -> Result<Vec<PublishedRate>> {
        Ok(self
            .rows
            .get(&(key.to_string(), rate_type))
            .cloned()
            .unwrap_or_default())
    }
}

/// published and adjusted rate for one lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLookupResult {
    pub published_rate: Rate,
    pub adjusted_rate: Rate,
}

impl RateLookupResult {
    /// zero sentinel, no matching row
    pub const UNAVAILABLE: RateLookupResult = RateLookupResult {
        published_rate: Rate::ZERO,
        adjusted_rate: Rate::ZERO,
    };

    /// a zero published rate means no rate is available
    pub fn is_unavailable(&self) -> bool {
        self.published_rate.is_zero()
    }
}

/// markdown and discount carried by a calculation input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateAdjustment {
    pub markdown: Option<Rate>,
    pub discount_percent: Option<Decimal>,
}

impl RateAdjustment {
    pub const NONE: RateAdjustment = RateAdjustment {
        markdown: None,
        discount_percent: None,
    };

    pub fn from_input(input: &CalculationInput) -> Self {
        Self {
            markdown: input.rate_markdown,
            discount_percent: input.rate_discount_percent,
        }
    }

    pub fn apply(&self, rate: Rate) -> Rate {
        apply_discounts(rate, self.markdown, self.discount_percent)
    }
}

/// subtract the markdown, then keep `discount_percent` percent of what remains
pub fn apply_discounts(
    rate: Rate,
    markdown: Option<Rate>,
    discount_percent: Option<Decimal>,
) -> Rate {
    let marked_down = match markdown {
        Some(m) => rate.as_decimal() - m.as_decimal(),
        None => rate.as_decimal(),
    };
    let discounted = match discount_percent {
        Some(p) => marked_down * p / Decimal::ONE_HUNDRED,
        None => marked_down,
    };
    Rate::from_decimal(discounted)
}

/// pick the row in force on `as_of`, latest effective start wins
pub fn best_match(rows: &[PublishedRate], as_of: NaiveDate) -> Option<&PublishedRate> {
    rows.iter()
        .filter(|r| r.covers(as_of))
        .max_by_key(|r| r.effective_from)
}

/// resolves published rates from a rate table
#[derive(Clone, Copy)]
pub struct RateLookup<'a> {
    table: &'a dyn RateTable,
}

impl<'a> RateLookup<'a> {
    pub fn new(table: &'a dyn RateTable) -> Self {
        Self { table }
    }

    /// published and adjusted rate on `as_of`, or the zero sentinel
    pub fn lookup(
        &self,
        key: Option<&str>,
        rate_type: RateType,
        as_of: NaiveDate,
        adjustment: RateAdjustment,
    ) -> Result<RateLookupResult> {
        let Some(key) = key else {
            debug!(%rate_type, %as_of, "rate lookup skipped, no key");
            return Ok(RateLookupResult::UNAVAILABLE);
        };

        let rows = self.table.published_rates(key, rate_type)?;
        let Some(row) = best_match(&rows, as_of) else {
            debug!(key, %rate_type, %as_of, "no published rate in force");
            return Ok(RateLookupResult::UNAVAILABLE);
        };

        let result = RateLookupResult {
            published_rate: row.rate,
            adjusted_rate: adjustment.apply(row.rate),
        };
        debug!(
            key,
            %rate_type,
            %as_of,
            published = %result.published_rate,
            adjusted = %result.adjusted_rate,
            "rate resolved"
        );
        Ok(result)
    }
}
