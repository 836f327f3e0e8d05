use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::task::{shift_days, Task};

/// Days shown before the earliest task start.
pub const LEADING_DAYS: i64 = 10;
/// Days shown after the latest task end.
pub const TRAILING_DAYS: i64 = 30;

/// Zoom presets for the timeline, coarse to fine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomLevel {
    Month,
    #[default]
    Week,
    Day,
}

impl ZoomLevel {
    pub fn all() -> &'static [ZoomLevel] {
        &[ZoomLevel::Month, ZoomLevel::Week, ZoomLevel::Day]
    }

    pub fn label(self) -> &'static str {
        match self {
            ZoomLevel::Month => "Month",
            ZoomLevel::Week => "Week",
            ZoomLevel::Day => "Day",
        }
    }

    /// Built-in pixels per day.
    pub fn default_day_width(self) -> f32 {
        match self {
            ZoomLevel::Month => 6.0,
            ZoomLevel::Week => 16.0,
            ZoomLevel::Day => 40.0,
        }
    }

    pub fn zoom_in(self) -> Self {
        match self {
            ZoomLevel::Month => ZoomLevel::Week,
            ZoomLevel::Week | ZoomLevel::Day => ZoomLevel::Day,
        }
    }

    pub fn zoom_out(self) -> Self {
        match self {
            ZoomLevel::Day => ZoomLevel::Week,
            ZoomLevel::Week | ZoomLevel::Month => ZoomLevel::Month,
        }
    }
}

/// Convert a date to an x offset from `origin`.
pub fn map_date_to_offset(date: NaiveDate, origin: NaiveDate, day_width: f32) -> f32 {
    (date - origin).num_days() as f32 * day_width
}

/// Convert an x offset back to a date, rounding to the nearest whole day.
pub fn map_offset_to_date(offset: f32, origin: NaiveDate, day_width: f32) -> NaiveDate {
    let days = (offset / day_width).round() as i64;
    shift_days(origin, days)
}

/// One column of the day-scale header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayTick {
    pub date: NaiveDate,
    pub offset: f32,
    pub is_weekend: bool,
    pub is_month_start: bool,
}

/// Horizontal extent of a task bar in timeline coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpan {
    pub left: f32,
    pub width: f32,
}

impl BarSpan {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// X position of the progress marker for a percentage.
    pub fn progress_x(&self, progress: u8) -> f32 {
        self.left + self.width * f32::from(progress.min(100)) / 100.0
    }

    /// Percentage for a pointer position inside the bar, clamped to 0..=100.
    pub fn progress_at(&self, pointer_x: f32) -> u8 {
        if self.width <= 0.0 {
            return 0;
        }
        let pct = ((pointer_x - self.left) / self.width * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Maps calendar dates onto the horizontal axis of the chart.
///
/// Derived from the task list and zoom level; rebuild it whenever either changes.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMapper {
    /// Date at offset zero.
    pub origin: NaiveDate,
    /// Pixels per day.
    pub day_width: f32,
    /// Days from `origin` to the end of the visible range.
    pub visible_span_days: i64,
}

impl TimelineMapper {
    pub fn new(tasks: &[Task], day_width: f32, today: NaiveDate) -> Self {
        let earliest = tasks.iter().map(|t| t.start).min();
        let latest = tasks.iter().map(|t| t.end).max();

        let origin = earliest
            .map(|d| shift_days(d, -LEADING_DAYS))
            .unwrap_or(today);
        let last = shift_days(latest.unwrap_or(origin), TRAILING_DAYS);

        Self {
            origin,
            day_width,
            visible_span_days: (last - origin).num_days().max(0),
        }
    }

    /// Build a mapper anchored on the local clock for empty schedules.
    pub fn for_today(tasks: &[Task], day_width: f32) -> Self {
        Self::new(tasks, day_width, chrono::Local::now().date_naive())
    }

    pub fn date_to_offset(&self, date: NaiveDate) -> f32 {
        map_date_to_offset(date, self.origin, self.day_width)
    }

    pub fn offset_to_date(&self, offset: f32) -> NaiveDate {
        map_offset_to_date(offset, self.origin, self.day_width)
    }

    /// Whole days for a pointer displacement.
    pub fn offset_to_days(&self, delta: f32) -> i64 {
        (delta / self.day_width).round() as i64
    }

    pub fn last_visible_date(&self) -> NaiveDate {
        shift_days(self.origin, self.visible_span_days)
    }

    /// Total width in pixels for the visible range.
    pub fn total_width(&self) -> f32 {
        self.visible_span_days as f32 * self.day_width
    }

    /// Bar covering the inclusive day range `start..=end`.
    pub fn bar_span(&self, start: NaiveDate, end: NaiveDate) -> BarSpan {
        let left = self.date_to_offset(start);
        let days = (end - start).num_days().max(0) + 1;
        BarSpan {
            left,
            width: days as f32 * self.day_width,
        }
    }

    pub fn day_ticks(&self) -> Vec<DayTick> {
        (0..=self.visible_span_days)
            .map(|i| {
                let date = shift_days(self.origin, i);
                DayTick {
                    date,
                    offset: i as f32 * self.day_width,
                    is_weekend: date.weekday().num_days_from_monday() >= 5,
                    is_month_start: date.day() == 1,
                }
            })
            .collect()
    }
}
