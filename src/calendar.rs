//! Month calendar view.
//!
//! Lays out a month as a Sunday-first grid and marks the days that have
//! events, the way the portal's calendar tab shows them.

use crate::utils::time::month_title;
use chrono::{Datelike, Months, NaiveDate};
use std::collections::BTreeSet;

/// Column headers, Sunday first
pub const WEEKDAY_INITIALS: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

/// A single cell of the month grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub has_event: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    first_day: NaiveDate,
    today: NaiveDate,
    event_dates: BTreeSet<NaiveDate>,
}

impl MonthView {
    /// View of the month containing `date`
    pub fn containing(date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
            today,
            event_dates: BTreeSet::new(),
        }
    }

    /// View of an explicit month; `None` if the month does not exist
    pub fn new(year: i32, month: u32, today: NaiveDate) -> Option<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self::containing(first_day, today))
    }

    pub fn with_event_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.event_dates.extend(dates);
        self
    }

    pub fn next_month(&self) -> Self {
        self.shifted(|d| d.checked_add_months(Months::new(1)))
    }

    pub fn previous_month(&self) -> Self {
        self.shifted(|d| d.checked_sub_months(Months::new(1)))
    }

    fn shifted<F>(&self, shift: F) -> Self
    where
        F: Fn(NaiveDate) -> Option<NaiveDate>,
    {
        Self {
            first_day: shift(self.first_day).unwrap_or(self.first_day),
            today: self.today,
            event_dates: self.event_dates.clone(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// e.g. `fevereiro 2026`
    pub fn title(&self) -> String {
        month_title(self.first_day)
    }

    /// Empty cells before the 1st (Sunday = 0)
    pub fn leading_blanks(&self) -> usize {
        self.first_day.weekday().num_days_from_sunday() as usize
    }

    pub fn days(&self) -> Vec<CalendarDay> {
        self.first_day
            .iter_days()
            .take_while(|d| d.month() == self.first_day.month())
            .map(|date| CalendarDay {
                date,
                has_event: self.event_dates.contains(&date),
                is_today: date == self.today,
            })
            .collect()
    }

    /// Plain text grid: `*` marks a day with events, `[..]` marks today
    pub fn render_text(&self) -> String {
        let mut out = format!("{}\n", self.title());
        out.push_str(
            &WEEKDAY_INITIALS
                .iter()
                .map(|d| format!("{:^4}", d))
                .collect::<String>(),
        );
        out.push('\n');

        let mut cells: Vec<String> = vec!["    ".to_string(); self.leading_blanks()];
        cells.extend(self.days().iter().map(|day| {
            let marker = if day.has_event { "*" } else { " " };
            if day.is_today {
                format!("[{:>2}]", day.date.day())
            } else {
                format!(" {:>2}{}", day.date.day(), marker)
            }
        }));

        for week in cells.chunks(7) {
            out.push_str(week.concat().trim_end());
            out.push('\n');
        }
        out
    }
}
