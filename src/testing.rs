//! shared fixtures for unit tests

use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::EngineConfig;
use crate::decimal::Rate;
use crate::errors::Result;
use crate::lookup::{InMemoryRateTable, PublishedRate, RateLookup, RateTable};
use crate::strategies::StrategyContext;
use crate::types::RateType;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// table holding one open-ended rate from 2000-01-01
pub fn flat_table(key: &str, rate_type: RateType, units: i64) -> InMemoryRateTable {
    InMemoryRateTable::new().with_rate(key, rate_type, Rate::from_units(units), date(2000, 1, 1))
}

pub fn context<'a>(table: &'a dyn RateTable, config: &'a EngineConfig) -> StrategyContext<'a> {
    StrategyContext::new(RateLookup::new(table), config)
}

/// wraps a table and counts how often it is queried
pub struct CountingRateTable<T> {
    inner: T,
    calls: AtomicUsize,
}

impl<T: RateTable> CountingRateTable<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<T: RateTable> RateTable for CountingRateTable<T> {
    fn published_rates(&self, key: &str, rate_type: RateType) -> Result<Vec<PublishedRate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.published_rates(key, rate_type)
    }
}
