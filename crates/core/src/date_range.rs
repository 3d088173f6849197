//! Calendar arithmetic for list filters and "today" lookups.
//!
//! Every day boundary is computed in the gym's timezone and then converted
//! to UTC, so a "day" is the half-open interval
//! `[local midnight, next local midnight)`.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use chrono_tz::Tz;

use crate::errors::{GymError, GymResult};

/// Wire format of dates in query strings and manual attendance forms.
pub const DMY_FORMAT: &str = "%d-%m-%Y";

pub fn parse_dmy(value: &str) -> GymResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DMY_FORMAT).map_err(|_| {
        GymError::Validation(format!("Invalid date '{}', expected dd-mm-yyyy", value.trim()))
    })
}

pub fn format_dmy(date: NaiveDate) -> String {
    date.format(DMY_FORMAT).to_string()
}

/// Parses an `HH:MM` wall-clock time on `date` in `tz`.
pub fn local_time_on(date: NaiveDate, time: &str, tz: Tz) -> GymResult<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|_| {
        GymError::Validation(format!("Invalid time '{}', expected HH:MM", time.trim()))
    })?;
    Ok(resolve_local(tz, date.and_time(time)))
}

/// Calendar date of `now` as seen from the gym.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Start of `date` in `tz`, expressed in UTC.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// `[startOfDay, startOfNextDay)` for `date` in `tz`.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (start_of_day(date, tz), start_of_day(next, tz))
}

// Ambiguous local times (DST fold) take the earlier instant; skipped ones
// (DST gap) are read as UTC wall-clock.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => Utc.from_utc_datetime(&local),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    /// The seven days ending today.
    LastWeek,
    ThisMonth,
    LastMonth,
    Custom,
}

impl FromStr for DatePreset {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "today" => Ok(DatePreset::Today),
            "yesterday" => Ok(DatePreset::Yesterday),
            "last_week" | "last_7_days" => Ok(DatePreset::LastWeek),
            "this_month" => Ok(DatePreset::ThisMonth),
            "last_month" => Ok(DatePreset::LastMonth),
            "custom" => Ok(DatePreset::Custom),
            _ => Err(GymError::Validation(format!("Unknown date filter '{}'", s.trim()))),
        }
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> GymResult<Self> {
        if end < start {
            return Err(GymError::Validation(format!(
                "Date range ends ({}) before it starts ({})",
                format_dmy(end),
                format_dmy(start)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn from_preset(
        preset: DatePreset,
        today: NaiveDate,
        from: Option<&str>,
        to: Option<&str>,
    ) -> GymResult<Self> {
        match preset {
            DatePreset::Today => Ok(Self::single(today)),
            DatePreset::Yesterday => Ok(Self::single(today.pred_opt().unwrap_or(today))),
            DatePreset::LastWeek => Self::new(
                today.checked_sub_days(Days::new(6)).unwrap_or(today),
                today,
            ),
            DatePreset::ThisMonth => Self::new(first_of_month(today), today),
            DatePreset::LastMonth => {
                let this_month = first_of_month(today);
                let start = this_month
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(this_month);
                let end = this_month.pred_opt().unwrap_or(this_month);
                Self::new(start, end)
            }
            DatePreset::Custom => {
                let from = non_blank(from).ok_or_else(|| {
                    GymError::Validation("Custom date filter needs a 'from' date".to_string())
                })?;
                let start = parse_dmy(from)?;
                let end = match non_blank(to) {
                    Some(to) => parse_dmy(to)?,
                    None => start,
                };
                Self::new(start, end)
            }
        }
    }

    /// Resolves the `dateFilter`/`from`/`to` query parameters. A bare `from`
    /// implies a custom range; nothing at all yields `default`.
    pub fn from_query(
        date_filter: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        default: Option<DatePreset>,
    ) -> GymResult<Option<Self>> {
        let preset = match non_blank(date_filter) {
            Some(filter) => Some(filter.parse()?),
            None if non_blank(from).is_some() => Some(DatePreset::Custom),
            None => default,
        };
        preset
            .map(|p| Self::from_preset(p, today, from, to))
            .transpose()
    }

    /// Half-open UTC interval covering every day of the range.
    pub fn utc_bounds(&self, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        (day_bounds(self.start, tz).0, day_bounds(self.end, tz).1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_month_spans_whole_previous_month() {
        let range = DateRange::from_preset(DatePreset::LastMonth, date(2024, 3, 15), None, None)
            .unwrap();
        assert_eq!(range.start, date(2024, 2, 1));
        assert_eq!(range.end, date(2024, 2, 29));
    }

    #[test]
    fn kolkata_day_starts_at_1830_utc() {
        let (start, end) = day_bounds(date(2024, 5, 10), Kolkata);
        assert_eq!(start.to_rfc3339(), "2024-05-09T18:30:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-05-10T18:30:00+00:00");
    }
}
