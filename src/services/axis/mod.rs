//! Conversion between vertical pixel offsets and times of day.
//!
//! The axis starts at `day_start` (offset 0) and every hour is
//! `hour_height` pixels tall. Offsets coming from the pointer are snapped to
//! the nearest `snap_minutes` boundary (half rounds up) and clamped so the
//! result is always a usable event start or end.

use chrono::NaiveTime;

use crate::models::settings::EngineSettings;
use crate::models::time::{TimeOfDay, MINUTES_PER_HOUR};

/// Which edge of an event a converted time is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotBound {
    /// Leaves room for a minimum-length event before `day_end`.
    Start,
    End,
}

/// Where the current-time line is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NowIndicator {
    pub offset_px: f32,
    /// Position as a fraction of the displayed axis height.
    pub fraction: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    day_start: TimeOfDay,
    day_end: TimeOfDay,
    display_end: TimeOfDay,
    hour_height: f32,
    snap_minutes: u16,
    min_duration_minutes: u16,
}

/// `Math.round` semantics: halves go towards positive infinity.
pub(crate) fn round_half_up(value: f32) -> i32 {
    if value.is_finite() {
        (value + 0.5).floor() as i32
    } else {
        0
    }
}

impl TimeAxis {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            day_start: settings.day_start,
            day_end: settings.day_end,
            display_end: settings.display_end,
            hour_height: settings.hour_height,
            snap_minutes: settings.snap_minutes.max(1),
            min_duration_minutes: settings.min_duration_minutes,
        }
    }

    pub fn day_start(&self) -> TimeOfDay {
        self.day_start
    }

    pub fn day_end(&self) -> TimeOfDay {
        self.day_end
    }

    pub fn hour_height(&self) -> f32 {
        self.hour_height
    }

    pub fn snap_minutes(&self) -> u16 {
        self.snap_minutes
    }

    pub fn min_duration_minutes(&self) -> u16 {
        self.min_duration_minutes
    }

    pub fn latest_start(&self) -> TimeOfDay {
        self.day_end.offset(-(self.min_duration_minutes as i32))
    }

    /// Pixels the pointer must travel for one snap step.
    pub fn pixels_per_snap(&self) -> f32 {
        self.hour_height * self.snap_minutes as f32 / MINUTES_PER_HOUR as f32
    }

    /// Convert a vertical drag distance into a snapped minute delta.
    pub fn minutes_delta(&self, delta_px: f32) -> i32 {
        let step = self.pixels_per_snap();
        if !(step > 0.0) {
            return 0;
        }
        round_half_up(delta_px / step) * self.snap_minutes as i32
    }

    /// Hour rows drawn down the side of the grid (07, 08, ... 21).
    pub fn hours(&self) -> Vec<u16> {
        let last = if self.display_end.minute() == 0 {
            self.display_end.hour().saturating_sub(1)
        } else {
            self.display_end.hour()
        };
        (self.day_start.hour()..=last).collect()
    }

    /// Total drawn height of the axis.
    pub fn height(&self) -> f32 {
        self.hours().len() as f32 * self.hour_height
    }

    /// Snapped, clamped time for a vertical offset from the top of the axis.
    ///
    /// Non-finite offsets are treated as 0.
    pub fn pixel_to_time(&self, offset_px: f32, bound: SlotBound) -> TimeOfDay {
        let offset = if offset_px.is_finite() { offset_px } else { 0.0 };
        let minutes_from_top = (offset / self.hour_height * MINUTES_PER_HOUR as f32).floor();
        let snapped = round_half_up(minutes_from_top / self.snap_minutes as f32)
            * self.snap_minutes as i32;
        let total = self.day_start.minutes() as i32 + snapped;

        let upper = match bound {
            SlotBound::Start => self.latest_start(),
            SlotBound::End => self.day_end,
        };
        TimeOfDay::from_minutes(total.min(upper.minutes() as i32).max(self.day_start.minutes() as i32))
    }

    /// Vertical offset of `time` from the top of the axis.
    pub fn time_to_offset(&self, time: TimeOfDay) -> f32 {
        self.day_start.minutes_until(time) as f32 / MINUTES_PER_HOUR as f32 * self.hour_height
    }

    /// Pixel height of an event block spanning `start..end`. Never negative.
    pub fn time_range_to_height(&self, start: TimeOfDay, end: TimeOfDay) -> f32 {
        (start.minutes_until(end).max(0) as f32 / MINUTES_PER_HOUR as f32) * self.hour_height
    }

    /// Current-time line, or `None` outside the drawn range.
    pub fn now_indicator(&self, now: NaiveTime) -> Option<NowIndicator> {
        let now = TimeOfDay::from_chrono(now);
        if now < self.day_start || now > self.display_end {
            return None;
        }
        let span = self.day_start.minutes_until(self.display_end);
        if span <= 0 {
            return None;
        }
        let elapsed = self.day_start.minutes_until(now);
        Some(NowIndicator {
            offset_px: self.time_to_offset(now),
            fraction: elapsed as f32 / span as f32,
            label: now.format_12h(),
        })
    }
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}
