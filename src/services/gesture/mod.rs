//! Drag-to-move and drag-to-resize gesture state.
//!
//! A gesture captures the pointer position and the event's times when it
//! starts. Every pointer move recomputes the event from that capture (never
//! from the previous move), so bursty or repeated deliveries cannot drift.
//!
//! At most one gesture exists at a time; see [`GestureSlot`].

mod slot;

pub use slot::{GestureSlot, GestureSubscription};

use thiserror::Error;

use crate::models::event::EventId;
use crate::models::time::TimeOfDay;
use crate::services::axis::{round_half_up, TimeAxis};

/// Raw pointer input as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Mouse { x: f32, y: f32 },
    Touch { x: f32, y: f32 },
}

impl PointerInput {
    pub fn position(&self) -> Point {
        match *self {
            PointerInput::Mouse { x, y } | PointerInput::Touch { x, y } => Point::new(x, y),
        }
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, PointerInput::Touch { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Non-finite coordinates are treated as 0.
    pub fn new(x: f32, y: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            x: finite(x),
            y: finite(y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Bottom edge: changes the end time.
    Resize,
    /// Top edge: changes the start time.
    ResizeTop,
    /// Body: shifts both times, and the day in multi-column views.
    Move,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub event_id: EventId,
    pub start_y: f32,
    pub initial_end: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeTopGesture {
    pub event_id: EventId,
    pub start_y: f32,
    pub initial_start: TimeOfDay,
    pub initial_end: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveGesture {
    pub event_id: EventId,
    pub start: Point,
    pub initial_start: TimeOfDay,
    pub initial_end: TimeOfDay,
    pub duration_minutes: i32,
    pub initial_day: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureState {
    Resizing(ResizeGesture),
    ResizingTop(ResizeTopGesture),
    Moving(MoveGesture),
}

impl GestureState {
    pub fn event_id(&self) -> &EventId {
        match self {
            GestureState::Resizing(g) => &g.event_id,
            GestureState::ResizingTop(g) => &g.event_id,
            GestureState::Moving(g) => &g.event_id,
        }
    }

    pub fn kind(&self) -> GestureKind {
        match self {
            GestureState::Resizing(_) => GestureKind::Resize,
            GestureState::ResizingTop(_) => GestureKind::ResizeTop,
            GestureState::Moving(_) => GestureKind::Move,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("a gesture on event {0} is already in progress")]
    AlreadyActive(EventId),
    #[error("event {0} does not exist")]
    UnknownEvent(EventId),
    #[error("event {0} is not on the current grid")]
    NotOnGrid(EventId),
    #[error("the calendar engine is not running")]
    EngineStopped,
}

/// `min(max(x, lo), hi)` where `hi` wins if the bounds cross.
fn clamp_upper_wins(value: i32, lo: i32, hi: i32) -> i32 {
    value.max(lo).min(hi)
}

/// `max(min(x, hi), lo)` where `lo` wins if the bounds cross.
fn clamp_lower_wins(value: i32, lo: i32, hi: i32) -> i32 {
    value.min(hi).max(lo)
}

/// New end time for a bottom-edge resize. The event keeps at least the
/// minimum duration even when that pushes past `day_end`.
pub fn resized_end(
    initial_end: TimeOfDay,
    start: TimeOfDay,
    delta_minutes: i32,
    axis: &TimeAxis,
) -> TimeOfDay {
    let min_end = start.minutes() as i32 + axis.min_duration_minutes() as i32;
    let max_end = axis.day_end().minutes() as i32;
    let proposed = initial_end.minutes() as i32 + delta_minutes;
    TimeOfDay::from_minutes(clamp_lower_wins(proposed, min_end, max_end))
}

/// New start time for a top-edge resize. The event keeps at least the
/// minimum duration even when that pulls before `day_start`.
pub fn resized_start(
    initial_start: TimeOfDay,
    end: TimeOfDay,
    delta_minutes: i32,
    axis: &TimeAxis,
) -> TimeOfDay {
    let min_start = axis.day_start().minutes() as i32;
    let max_start = end.minutes() as i32 - axis.min_duration_minutes() as i32;
    let proposed = initial_start.minutes() as i32 + delta_minutes;
    TimeOfDay::from_minutes(clamp_upper_wins(proposed, min_start, max_start))
}

/// Shift a `duration`-long event by `delta_minutes`, keeping it inside the
/// axis. The duration never changes.
pub fn moved_times(
    initial_start: TimeOfDay,
    duration_minutes: i32,
    delta_minutes: i32,
    axis: &TimeAxis,
) -> (TimeOfDay, TimeOfDay) {
    let min_start = axis.day_start().minutes() as i32;
    let max_start = axis.day_end().minutes() as i32 - duration_minutes;
    let start = clamp_lower_wins(
        initial_start.minutes() as i32 + delta_minutes,
        min_start,
        max_start,
    );
    (
        TimeOfDay::from_minutes(start),
        TimeOfDay::from_minutes(start + duration_minutes),
    )
}

/// Column reached after dragging `delta_x` pixels from `initial_day`,
/// clamped to `0..=last_index`. A non-positive column width disables
/// horizontal movement.
pub fn moved_day(initial_day: usize, delta_x: f32, column_width: f32, last_index: usize) -> usize {
    if !(column_width.is_finite() && column_width > 0.0) {
        return initial_day.min(last_index);
    }
    let shift = round_half_up(delta_x / column_width) as i64;
    (initial_day as i64 + shift).clamp(0, last_index as i64) as usize
}
