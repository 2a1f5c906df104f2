use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::collections::BTreeSet;

use super::types::{AxisRange, DataPoint};
use crate::utils::date_range::DateRange;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of weekdays in `[from, to)`. Zero when `to <= from`.
pub fn weekdays_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let days = (to - from).num_days();
    if days <= 0 {
        return 0;
    }

    let full_weeks = days / 7;
    let mut count = full_weeks * 5;
    let mut date = from + chrono::Duration::days(full_weeks * 7);
    while date < to {
        if !is_weekend(date) {
            count += 1;
        }
        date = date.succ_opt().unwrap_or(to);
    }
    count
}

/// Position of `ts` on the weekend-compressed axis starting at `origin`.
///
/// Each weekday occupies one unit and the time of day adds a fraction of it. Saturdays and
/// Sundays take no room: any weekend timestamp lands on the start of the following Monday.
pub fn business_ordinal(ts: NaiveDateTime, origin: NaiveDate) -> f64 {
    plotted_ordinal(ts, origin, &BTreeSet::new())
}

/// Like [`business_ordinal`], except that the weekend days in `weekend_days` keep a slot of
/// their own. Only weekends without data are compressed away.
pub fn plotted_ordinal(ts: NaiveDateTime, origin: NaiveDate, weekend_days: &BTreeSet<NaiveDate>) -> f64 {
    let date = ts.date();
    let whole = if date >= origin {
        (weekdays_between(origin, date) + weekend_days.range(origin..date).count() as i64) as f64
    } else {
        -((weekdays_between(date, origin) + weekend_days.range(date..origin).count() as i64) as f64)
    };

    if is_weekend(date) && !weekend_days.contains(&date) {
        whole
    } else {
        whole + f64::from(ts.time().num_seconds_from_midnight()) / SECONDS_PER_DAY
    }
}

/// Pixel rectangles of the chart, derived from the canvas size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub inner_left: f32,
    pub inner_top: f32,
    pub inner_right: f32,
    pub inner_bottom: f32,
}

impl PlotArea {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as f32, height as f32);

        let left_margin = (width * 0.1).clamp(40.0, 90.0);
        let right_margin = (width * 0.04).clamp(10.0, 40.0);
        let top_margin = (height * 0.1).clamp(30.0, 70.0);
        let bottom_margin = (height * 0.12).clamp(40.0, 80.0);
        let plot_padding = (width.min(height) * 0.02).clamp(4.0, 12.0);

        let left = left_margin.min(width / 2.0);
        let top = top_margin.min(height / 2.0);
        let right = (width - right_margin).max(left);
        let bottom = (height - bottom_margin).max(top);

        PlotArea {
            left,
            top,
            right,
            bottom,
            inner_left: (left + plot_padding).min(right),
            inner_top: (top + plot_padding).min(bottom),
            inner_right: (right - plot_padding).max(left),
            inner_bottom: (bottom - plot_padding).max(top),
        }
    }

    pub fn inner_width(&self) -> f32 {
        self.inner_right - self.inner_left
    }

    pub fn inner_height(&self) -> f32 {
        self.inner_bottom - self.inner_top
    }
}

/// Horizontal mapping from timestamps to pixels on the weekend-compressed axis.
///
/// Weekend days holding at least one point are plotted days and keep their slot.
#[derive(Clone, Debug)]
pub struct XScale {
    origin: NaiveDate,
    weekend_days: BTreeSet<NaiveDate>,
    lo: f64,
    hi: f64,
    left_px: f32,
    width_px: f32,
}

impl XScale {
    pub fn new(date_range: &DateRange, points: &[DataPoint], left_px: f32, width_px: f32) -> Self {
        let origin = date_range.start;
        let weekend_days: BTreeSet<NaiveDate> = points
            .iter()
            .map(|p| p.timestamp.date())
            .filter(|d| is_weekend(*d))
            .collect();
        let lo = plotted_ordinal(date_range.start_datetime(), origin, &weekend_days);
        let hi = plotted_ordinal(date_range.end_datetime(points), origin, &weekend_days);
        XScale {
            origin,
            weekend_days,
            lo,
            hi,
            left_px,
            width_px,
        }
    }

    pub fn ordinal(&self, ts: NaiveDateTime) -> f64 {
        plotted_ordinal(ts, self.origin, &self.weekend_days)
    }

    /// Ordinal bounds of the plotted span.
    pub fn domain(&self) -> (f64, f64) {
        (self.lo, self.hi)
    }

    /// Fraction of the plot width for `ordinal`, clamped to `[0, 1]`.
    pub fn ratio_of_ordinal(&self, ordinal: f64) -> f32 {
        let span = self.hi - self.lo;
        if span <= 0.0 {
            return 0.0;
        }
        ((ordinal - self.lo) / span).clamp(0.0, 1.0) as f32
    }

    pub fn ordinal_to_px(&self, ordinal: f64) -> f32 {
        self.left_px + self.ratio_of_ordinal(ordinal) * self.width_px
    }

    pub fn to_px(&self, ts: NaiveDateTime) -> f32 {
        self.ordinal_to_px(self.ordinal(ts))
    }
}

/// Vertical mapping; larger values sit higher on the image.
#[derive(Clone, Copy, Debug)]
pub struct YScale {
    range: AxisRange,
    top_px: f32,
    bottom_px: f32,
}

impl YScale {
    pub fn new(range: AxisRange, top_px: f32, bottom_px: f32) -> Self {
        YScale {
            range,
            top_px,
            bottom_px,
        }
    }

    pub fn range(&self) -> AxisRange {
        self.range
    }

    pub fn to_px(&self, value: f32) -> f32 {
        let span = self.range.span();
        if span <= 0.0 {
            return self.bottom_px;
        }
        let normalized = (self.range.clamp(value) - self.range.min) / span;
        self.bottom_px - normalized * (self.bottom_px - self.top_px)
    }
}

/// Gridline values every `step` inside `range`.
///
/// Ticks are anchored at zero when the range contains it, otherwise at the range minimum.
pub fn axis_ticks(range: AxisRange, step: f32) -> Vec<f32> {
    if step <= 0.0 || range.span() < 0.0 {
        return Vec::new();
    }

    let anchor = if range.contains(0.0) { 0.0 } else { range.min };
    let first = ((range.min - anchor) / step).ceil() as i64;
    let last = ((range.max - anchor) / step).floor() as i64;

    (first..=last).map(|k| anchor + k as f32 * step).collect()
}
