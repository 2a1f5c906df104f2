use chrono::{Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::str::FromStr;

use crate::utils::graph::types::DataPoint;

/// Symbolic window of history to plot, always ending on "today".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateRangeSelector {
    Last7Days,
    Last14Days,
    LastMonth,
    Last3Months,
    Last6Months,
    LastYear,
    Last3Years,
}

/// Concrete inclusive interval of calendar days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

enum Window {
    Days(u64),
    Months(u32),
}

impl DateRangeSelector {
    pub const ALL: [DateRangeSelector; 7] = [
        Self::Last7Days,
        Self::Last14Days,
        Self::LastMonth,
        Self::Last3Months,
        Self::Last6Months,
        Self::LastYear,
        Self::Last3Years,
    ];

    fn window(self) -> Window {
        match self {
            Self::Last7Days => Window::Days(7),
            Self::Last14Days => Window::Days(14),
            Self::LastMonth => Window::Months(1),
            Self::Last3Months => Window::Months(3),
            Self::Last6Months => Window::Months(6),
            Self::LastYear => Window::Months(12),
            Self::Last3Years => Window::Months(36),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 Days",
            Self::Last14Days => "Last 14 Days",
            Self::LastMonth => "Last Month",
            Self::Last3Months => "Last 3 Months",
            Self::Last6Months => "Last 6 Months",
            Self::LastYear => "Last Year",
            Self::Last3Years => "Last 3 Years",
        }
    }

    /// Resolves the selector against `today`.
    ///
    /// `today` is always the last day of the range. Day windows count it as one of their days
    /// (`Last7Days` covers today and the six days before). Month windows go back whole calendar
    /// months from today, clamping to the end of shorter months.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self.window() {
            Window::Days(days) => today.checked_sub_days(Days::new(days - 1)),
            Window::Months(months) => today.checked_sub_months(Months::new(months)),
        }
        .unwrap_or(NaiveDate::MIN);

        tracing::debug!(
            "[RANGE] Resolved {} relative to {} as {} ..= {}",
            self.label(),
            today,
            start,
            today
        );

        DateRange { start, end: today }
    }
}

/// Free-function form of [`DateRangeSelector::resolve`].
pub fn resolve_range(selector: DateRangeSelector, today: NaiveDate) -> DateRange {
    selector.resolve(today)
}

impl fmt::Display for DateRangeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DateRangeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "7d" | "last7days" => Ok(Self::Last7Days),
            "14d" | "last14days" => Ok(Self::Last14Days),
            "1m" | "lastmonth" => Ok(Self::LastMonth),
            "3m" | "last3months" => Ok(Self::Last3Months),
            "6m" | "last6months" => Ok(Self::Last6Months),
            "1y" | "lastyear" => Ok(Self::LastYear),
            "3y" | "last3years" => Ok(Self::Last3Years),
            _ => Err(format!("Unknown date range: {s}")),
        }
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn start_datetime(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Right edge of the plotted time span.
    ///
    /// If the latest point falls on the end date, its timestamp closes the span so the line
    /// reaches the right edge. Otherwise the span stops at the start of the end date.
    pub fn end_datetime(&self, points: &[DataPoint]) -> NaiveDateTime {
        let start_of_end = self.end.and_time(NaiveTime::MIN);

        match points.iter().map(|p| p.timestamp).max() {
            Some(last) if last.date() == self.end => last,
            _ => start_of_end,
        }
    }
}
