//! Rate and horizon conversions feeding a projection

use chrono::{Datelike, NaiveDate};

/// Convert an annual growth rate to the equivalent compounded monthly rate
pub fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Whole calendar months from `start` to `end`
///
/// Day-of-month is ignored, so 2024-01-31 to 2024-02-01 counts as one month.
/// The result is negative when `end` falls in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}
