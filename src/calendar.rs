//! Calendar arithmetic shared by every rate strategy.
//!
//! Ranges are half-open: `begin` accrues, `end` does not. A range is split
//! into calendar months, each contributing the days it overlaps.

use chrono::{Datelike, Months, NaiveDate};

/// check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// days in the calendar year containing `date` (365 or 366)
pub fn year_day_count(date: NaiveDate) -> u32 {
    if is_leap_year(date.year()) {
        366
    } else {
        365
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// first day of the month containing `date`
pub fn to_month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// first day of the following month
pub fn next_month_start(date: NaiveDate) -> Option<NaiveDate> {
    to_month_start(date).checked_add_months(Months::new(1))
}

/// shift by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// calendar month boundaries crossed from `begin` to `end`
pub fn months_between(begin: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - begin.year()) * 12 + end.month() as i32 - begin.month() as i32
}

/// actual days from `from` to `to`, bounded to a single month span
pub fn days_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let days = (to - from).num_days().max(0) as u32;
    days.min(days_in_month(from.year(), from.month()))
}

/// month label, `YYYY-MM`
pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// number of monthly periods a range is split into
///
/// the month boundaries crossed, so the days of a partial final month past
/// the last boundary do not accrue; a same-month range still spans one period
pub fn period_count(begin: NaiveDate, end: NaiveDate) -> u32 {
    let raw = months_between(begin, end);
    let count = if raw <= 0 { raw + 1 } else { raw };
    count.max(0) as u32
}

/// the part of a range falling in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    pub month_start: NaiveDate,
    pub from: NaiveDate,
    /// exclusive
    pub until: NaiveDate,
    pub is_final: bool,
}

impl MonthPeriod {
    pub fn days(&self) -> u32 {
        days_between(self.from, self.until)
    }

    pub fn year_days(&self) -> u32 {
        year_day_count(self.month_start)
    }

    pub fn label(&self) -> String {
        format_month(self.month_start)
    }
}

/// split `[begin, end)` into `count` consecutive calendar months
///
/// months past `end` are kept with zero days so callers that iterate a fixed
/// number of months see every one of them
pub fn month_periods(begin: NaiveDate, end: NaiveDate, count: u32) -> Vec<MonthPeriod> {
    let first = to_month_start(begin);
    let mut periods = Vec::with_capacity(count as usize);

    for i in 0..count {
        let Some(month_start) = add_months(first, i as i32) else {
            break;
        };
        let Some(next) = next_month_start(month_start) else {
            break;
        };
        let from = begin.max(month_start);
        let until = end.min(next).max(from);
        periods.push(MonthPeriod {
            month_start,
            from,
            until,
            is_final: i + 1 == count,
        });
    }

    periods
}

/// whole policy years elapsed since issue as of `on`
pub fn elapsed_policy_years(issue: NaiveDate, on: NaiveDate) -> u32 {
    if on <= issue {
        return 0;
    }
    let mut years = (on.year() - issue.year()).max(0);
    while years > 0 {
        match add_months(issue, years * 12) {
            Some(anniversary) if anniversary > on => years -= 1,
            _ => break,
        }
    }
    years as u32
}

/// most recent policy anniversary on or before `on`
pub fn policy_anniversary(issue: NaiveDate, on: NaiveDate) -> NaiveDate {
    let years = elapsed_policy_years(issue, on) as i32;
    add_months(issue, years * 12).unwrap_or(issue)
}
