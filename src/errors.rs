use thiserror::Error;

use crate::types::RateType;

/// infrastructure and configuration failures
///
/// business anomalies (missing dates, unavailable rates, unsupported purposes)
/// never surface here, they resolve to a zero result instead
#[derive(Error, Debug)]
pub enum RateEngineError {
    #[error("rate table unavailable for key {key} type {rate_type}: {message}")]
    RateTable {
        key: String,
        rate_type: RateType,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid currency precision: {digits} fractional digits")]
    InvalidPrecision {
        digits: u32,
    },

    #[error("unknown rate purpose code: {code}")]
    UnknownRatePurpose {
        code: String,
    },

    #[error("unknown rate type code: {code}")]
    UnknownRateType {
        code: String,
    },

    #[error("invalid rate row: {message}")]
    InvalidRateRow {
        message: String,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RateEngineError>;
