// Settings module
// Tunables for the time axis, gestures and timers

use serde::{Deserialize, Serialize};

use crate::hm;
use crate::models::grid::ViewMode;
use crate::models::time::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Earliest time an event may start.
    pub day_start: TimeOfDay,
    /// Latest time an event may end.
    pub day_end: TimeOfDay,
    /// Bottom of the drawn axis; the now-indicator hides past it.
    pub display_end: TimeOfDay,
    /// Pixel height of one hour row.
    pub hour_height: f32,
    pub snap_minutes: u16,
    pub min_duration_minutes: u16,
    /// Length of an event created by clicking an empty slot.
    pub default_event_minutes: u16,
    /// How long click-to-create stays disabled after a drag ends.
    pub click_suppression_ms: u64,
    pub now_refresh_secs: u64,
    /// A gesture with no pointer activity for this long is ended.
    pub gesture_timeout_secs: u64,
    pub default_view: ViewMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            day_start: hm!(7, 0),
            day_end: hm!(21, 30),
            display_end: hm!(22, 0),
            hour_height: 64.0,
            snap_minutes: 30,
            min_duration_minutes: 30,
            default_event_minutes: 60,
            click_suppression_ms: 1000,
            now_refresh_secs: 60,
            gesture_timeout_secs: 30,
            default_view: ViewMode::Week,
        }
    }
}

const MAX_TIMER_SECS: u64 = 24 * 60 * 60;
const MAX_TIMER_MS: u64 = MAX_TIMER_SECS * 1000;

impl EngineSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.day_end <= self.day_start {
            return Err("day_end must be after day_start".to_string());
        }
        if self.display_end < self.day_end {
            return Err("display_end must not be before day_end".to_string());
        }
        if !(self.hour_height.is_finite() && self.hour_height > 0.0) {
            return Err("hour_height must be a positive number".to_string());
        }
        if self.snap_minutes == 0 || self.snap_minutes > 60 {
            return Err("snap_minutes must be between 1 and 60".to_string());
        }
        if self.min_duration_minutes == 0 {
            return Err("min_duration_minutes must be positive".to_string());
        }
        if self.day_start.minutes_until(self.day_end) < self.min_duration_minutes as i32 {
            return Err("visible range is shorter than the minimum event duration".to_string());
        }
        if self.click_suppression_ms > MAX_TIMER_MS {
            return Err("click_suppression_ms must be at most one day".to_string());
        }
        if self.now_refresh_secs == 0 || self.now_refresh_secs > MAX_TIMER_SECS {
            return Err("now_refresh_secs must be between 1 second and one day".to_string());
        }
        if self.gesture_timeout_secs > MAX_TIMER_SECS {
            return Err("gesture_timeout_secs must be at most one day".to_string());
        }
        Ok(())
    }
}
