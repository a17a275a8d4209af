use super::models::WeekDay;
use crate::utils::time::{month_label, start_of_week, today};
use chrono::{Datelike, Duration, NaiveDate};

/// A day code placed on the calendar of the current week
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    pub week_day: WeekDay,
    pub date: NaiveDate,
}

impl ResolvedDay {
    /// Day of month padded to two digits, e.g. `02`
    pub fn day_number(&self) -> String {
        format!("{:02}", self.date.day())
    }

    pub fn month_label(&self) -> String {
        month_label(self.date)
    }
}

/// Date of the given day code within the week (Sunday to Saturday) containing `today`.
///
/// Returns `None` for codes outside 1..=7.
pub fn date_in_current_week(code: u8, today: NaiveDate) -> Option<NaiveDate> {
    let week_day = WeekDay::from_code(code)?;
    Some(start_of_week(today) + Duration::days(week_day.days_from_sunday() as i64))
}

/// Same as [`date_in_current_week`] using the local wall clock
pub fn date_in_current_week_now(code: u8) -> Option<NaiveDate> {
    date_in_current_week(code, today())
}

pub fn resolve_day(code: u8, today: NaiveDate) -> Option<ResolvedDay> {
    let week_day = WeekDay::from_code(code)?;
    let date = date_in_current_week(code, today)?;
    Some(ResolvedDay { week_day, date })
}
