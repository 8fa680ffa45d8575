//! The calendar engine: one instance owns the grid, the event store, the
//! active gesture and every timer.
//!
//! Hosts drive it with three kinds of calls:
//! - navigation and panel actions (`next`, `handle_grid_click`, `save`, ...)
//! - pointer input (`begin_*`, `pointer_move`, `pointer_up`)
//! - `tick()` from their event loop, which fires due timers
//!
//! Timers exist only between `start()` and `shutdown()`.

mod draft;

pub use draft::{EventDraft, DEFAULT_CATEGORY, NEW_EVENT_CATEGORY, NEW_EVENT_TITLE, UNTITLED};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::models::event::{CalendarEvent, EventId, EventPatch, PREVIEW_ID};
use crate::models::grid::{GridCell, ViewMode};
use crate::models::settings::EngineSettings;
use crate::models::time::TimeOfDay;
use crate::services::axis::{NowIndicator, SlotBound, TimeAxis};
use crate::services::clock::Clock;
use crate::services::gesture::{
    moved_day, moved_times, resized_end, resized_start, GestureError, GestureSlot, GestureState,
    GestureSubscription, MoveGesture, PointerInput, ResizeGesture, ResizeTopGesture,
};
use crate::services::grid::{cell_index, CalendarNavigator};
use crate::services::overlap::{resolve_columns, Placement};
use crate::services::seed::{self, SeedEvent};
use crate::services::store::{EventStore, StoreError};
use crate::services::timers::{Debounce, Interval};
use crate::utils::date::{is_same_day, week_start};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error(transparent)]
    Gesture(#[from] GestureError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("event {0} no longer exists")]
    UnknownEvent(EventId),
    #[error("there is no event draft to save")]
    NothingToSave,
}

/// What a call to [`CalendarEngine::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub now_refreshed: bool,
    pub clicks_released: bool,
    pub gesture_timed_out: bool,
}

/// An event ready to draw inside its day column.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEvent {
    pub event: CalendarEvent,
    pub placement: Placement,
    pub top_px: f32,
    pub height_px: f32,
}

pub struct CalendarEngine {
    settings: EngineSettings,
    axis: TimeAxis,
    clock: Box<dyn Clock>,
    navigator: CalendarNavigator,
    cells: Vec<GridCell>,
    cells_today: NaiveDate,
    store: EventStore,
    gestures: GestureSlot,
    /// Set while a gesture runs and until the release debounce fires.
    suppress_clicks: bool,
    click_release: Debounce,
    now_refresh: Interval,
    gesture_timeout: Duration,
    current_time: NaiveDateTime,
    column_width: f32,
    draft: Option<EventDraft>,
    editing: Option<EventId>,
    panel_open: bool,
    clicked_day: Option<usize>,
    running: bool,
}

impl CalendarEngine {
    pub fn new(settings: EngineSettings, clock: Box<dyn Clock>) -> Result<Self, EngineError> {
        settings.validate().map_err(EngineError::InvalidSettings)?;

        // validate() bounds every timer to one day
        let click_release = Duration::milliseconds(settings.click_suppression_ms as i64);
        let now_refresh = Duration::seconds(settings.now_refresh_secs as i64);
        let gesture_timeout = Duration::seconds(settings.gesture_timeout_secs as i64);

        let now = clock.now();
        let today = now.date();
        let navigator = CalendarNavigator::new(settings.default_view, today);
        let cells = navigator.cells(today);
        let store = EventStore::within_hours(settings.day_start, settings.day_end);

        Ok(Self {
            axis: TimeAxis::from_settings(&settings),
            click_release: Debounce::new(click_release),
            now_refresh: Interval::new(now_refresh),
            gesture_timeout,
            settings,
            clock,
            navigator,
            cells,
            cells_today: today,
            store,
            gestures: GestureSlot::new(),
            suppress_clicks: false,
            current_time: now,
            column_width: 0.0,
            draft: None,
            editing: None,
            panel_open: false,
            clicked_day: None,
            running: false,
        })
    }

    /// Start the now-refresh timer. Idempotent.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        let now = self.clock.now();
        self.current_time = now;
        self.now_refresh.start(now);
        self.running = true;
        log::info!("Calendar engine started in {} view", self.navigator.view());
    }

    /// Cancel every timer and end any active gesture. Safe to call twice.
    pub fn shutdown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.now_refresh.cancel();
        self.click_release.cancel();
        if let Some(state) = self.gestures.force_end() {
            log::debug!("Gesture on event {} ended by shutdown", state.event_id());
        }
        self.gestures.take_abandoned();
        self.suppress_clicks = false;
        log::info!("Calendar engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Fire whatever timers are due. A no-op once shut down.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if !self.running {
            return outcome;
        }
        let now = self.clock.now();

        if self.gestures.take_abandoned() {
            log::debug!("Gesture subscription dropped, releasing clicks after debounce");
            self.click_release.arm(now);
        }

        // A zero timeout disables the watchdog.
        let stalled = self.gesture_timeout > Duration::zero()
            && self
                .gestures
                .last_activity()
                .is_some_and(|last| now - last >= self.gesture_timeout);
        if stalled {
            if let Some(state) = self.gestures.force_end() {
                log::warn!(
                    "Gesture on event {} timed out without pointer activity",
                    state.event_id()
                );
            }
            self.click_release.arm(now);
            outcome.gesture_timed_out = true;
        }

        if self.click_release.fire_if_due(now) && !self.gestures.is_active() {
            self.suppress_clicks = false;
            outcome.clicks_released = true;
        }

        if self.now_refresh.poll(now) {
            self.current_time = now;
            outcome.now_refreshed = true;
            if now.date() != self.cells_today {
                log::debug!("Date changed to {}, rebuilding grid", now.date());
                self.rebuild_cells();
            }
        }

        outcome
    }

    // Events

    /// Replace every committed event. Events outside the visible hours are
    /// skipped with a warning.
    pub fn load_events(&mut self, events: Vec<CalendarEvent>) {
        let mut store = EventStore::within_hours(self.axis.day_start(), self.axis.day_end());
        store.load(events);
        self.store = store;
        self.store.reindex(&self.cells);
        log::info!("Loaded {} events", self.store.len());
    }

    /// Place `seeds` on the week containing today.
    pub fn seed_current_week(&mut self, seeds: &[SeedEvent]) {
        let monday = week_start(self.clock.today());
        self.load_events(seed::materialize(seeds, monday));
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EventStore {
        &mut self.store
    }

    // Navigation

    pub fn view(&self) -> ViewMode {
        self.navigator.view()
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.navigator.set_view(view);
        self.rebuild_cells();
    }

    pub fn anchor(&self) -> NaiveDate {
        self.navigator.anchor()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.navigator.selected()
    }

    pub fn next(&mut self) {
        self.navigator.next();
        self.rebuild_cells();
    }

    pub fn prev(&mut self) {
        self.navigator.prev();
        self.rebuild_cells();
    }

    pub fn go_to_today(&mut self) {
        self.navigator.go_to_today(self.clock.today());
        self.rebuild_cells();
    }

    /// Jump to an arbitrary date in the current view.
    pub fn go_to(&mut self, date: NaiveDate) {
        self.navigator.set_anchor(date);
        self.navigator.select(date);
        self.rebuild_cells();
    }

    /// Open the cell at `day_index` in the day view.
    pub fn toggle_day_view(&mut self, day_index: usize) -> bool {
        let Some(cell) = self.cells.get(day_index) else {
            return false;
        };
        self.navigator.show_day(cell.full_date);
        self.rebuild_cells();
        true
    }

    pub fn period_label(&self) -> String {
        self.navigator.label()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    fn rebuild_cells(&mut self) {
        let today = self.clock.today();
        self.cells = self.navigator.cells(today);
        self.cells_today = today;
        self.store.reindex(&self.cells);
    }

    // Axis

    pub fn axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn hours(&self) -> Vec<u16> {
        self.axis.hours()
    }

    /// Time as of the last refresh.
    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    pub fn now_indicator(&self) -> Option<NowIndicator> {
        self.axis.now_indicator(self.current_time.time())
    }

    pub fn should_show_time_indicator(&self, date: NaiveDate) -> bool {
        is_same_day(date, self.current_time.date())
    }

    // Layout

    pub fn events_for_day(&self, day_index: usize) -> Vec<CalendarEvent> {
        self.store.events_for_day(&self.cells, day_index)
    }

    pub fn all_events(&self) -> Vec<CalendarEvent> {
        self.store.all_events_including_preview(&self.cells)
    }

    /// Positioned events for one day column, preview included.
    pub fn layout_day(&self, day_index: usize) -> Vec<RenderedEvent> {
        let mut events = self.events_for_day(day_index);
        if let (Some(preview), Some(cell)) = (self.store.preview(), self.cells.get(day_index)) {
            if preview.date == cell.full_date {
                events.push(CalendarEvent {
                    day: day_index,
                    ..preview.clone()
                });
            }
        }

        resolve_columns(&events)
            .into_iter()
            .map(|positioned| RenderedEvent {
                top_px: self.axis.time_to_offset(positioned.event.start_time),
                height_px: self
                    .axis
                    .time_range_to_height(positioned.event.start_time, positioned.event.end_time),
                placement: positioned.placement,
                event: positioned.event.clone(),
            })
            .collect()
    }

    // Gestures

    /// Width of one day column, used to turn horizontal drags into day shifts.
    pub fn set_column_width(&mut self, width: f32) {
        self.column_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    pub fn gesture_state(&self) -> Option<GestureState> {
        self.gestures.active()
    }

    /// True while clicks must not create or open events.
    pub fn is_interaction_blocked(&self) -> bool {
        self.suppress_clicks || self.gestures.is_active()
    }

    fn gesture_target(&self, id: &EventId) -> Result<&CalendarEvent, GestureError> {
        if !self.running {
            return Err(GestureError::EngineStopped);
        }
        self.store
            .get(id)
            .ok_or_else(|| GestureError::UnknownEvent(id.clone()))
            .inspect_err(|e| log::warn!("Rejected gesture: {}", e))
    }

    fn begin_gesture(&mut self, state: GestureState) -> Result<GestureSubscription, GestureError> {
        let subscription = self
            .gestures
            .begin(state, self.clock.now())
            .inspect_err(|e| log::warn!("Rejected gesture: {}", e))?;
        self.suppress_clicks = true;
        self.click_release.cancel();
        log::debug!(
            "Started {:?} gesture on event {}",
            subscription.kind(),
            subscription.event_id()
        );
        Ok(subscription)
    }

    /// Start dragging the bottom edge of `id`.
    pub fn begin_resize(
        &mut self,
        id: &EventId,
        input: PointerInput,
    ) -> Result<GestureSubscription, GestureError> {
        let event = self.gesture_target(id)?;
        let state = GestureState::Resizing(ResizeGesture {
            event_id: event.id.clone(),
            start_y: input.position().y,
            initial_end: event.end_time,
        });
        self.begin_gesture(state)
    }

    /// Start dragging the top edge of `id`.
    pub fn begin_resize_top(
        &mut self,
        id: &EventId,
        input: PointerInput,
    ) -> Result<GestureSubscription, GestureError> {
        let event = self.gesture_target(id)?;
        let state = GestureState::ResizingTop(ResizeTopGesture {
            event_id: event.id.clone(),
            start_y: input.position().y,
            initial_start: event.start_time,
            initial_end: event.end_time,
        });
        self.begin_gesture(state)
    }

    /// Start moving `id`. The event must be visible on the current grid.
    pub fn begin_move(
        &mut self,
        id: &EventId,
        input: PointerInput,
    ) -> Result<GestureSubscription, GestureError> {
        let event = self.gesture_target(id)?;
        let initial_day = cell_index(&self.cells, event.date)
            .ok_or_else(|| GestureError::NotOnGrid(id.clone()))
            .inspect_err(|e| log::warn!("Rejected gesture: {}", e))?;
        let state = GestureState::Moving(MoveGesture {
            event_id: event.id.clone(),
            start: input.position(),
            initial_start: event.start_time,
            initial_end: event.end_time,
            duration_minutes: event.duration_minutes(),
            initial_day,
        });
        self.begin_gesture(state)
    }

    /// Apply a pointer move to the gesture owned by `subscription`.
    /// Returns true when the event changed.
    pub fn pointer_move(&mut self, subscription: &GestureSubscription, input: PointerInput) -> bool {
        if !self.running {
            return false;
        }
        let Some(state) = self.gestures.touch(subscription, self.clock.now()) else {
            return false;
        };
        let position = input.position();

        let Some(event) = self.store.get(state.event_id()) else {
            log::warn!("Event {} vanished during a gesture", state.event_id());
            return false;
        };

        let patch = match &state {
            GestureState::Resizing(gesture) => {
                let delta = self.axis.minutes_delta(position.y - gesture.start_y);
                let end = resized_end(gesture.initial_end, event.start_time, delta, &self.axis);
                if end == event.end_time {
                    return false;
                }
                EventPatch {
                    end_time: Some(end),
                    ..EventPatch::default()
                }
            }
            GestureState::ResizingTop(gesture) => {
                let delta = self.axis.minutes_delta(position.y - gesture.start_y);
                let start = resized_start(gesture.initial_start, event.end_time, delta, &self.axis);
                if start == event.start_time {
                    return false;
                }
                EventPatch {
                    start_time: Some(start),
                    ..EventPatch::default()
                }
            }
            GestureState::Moving(gesture) => {
                let delta = self.axis.minutes_delta(position.y - gesture.start.y);
                let (start, end) =
                    moved_times(gesture.initial_start, gesture.duration_minutes, delta, &self.axis);
                let day = if self.navigator.view() == ViewMode::Day {
                    gesture.initial_day
                } else {
                    moved_day(
                        gesture.initial_day,
                        position.x - gesture.start.x,
                        self.column_width,
                        self.cells.len().saturating_sub(1),
                    )
                };
                let Some(cell) = self.cells.get(day) else {
                    return false;
                };
                if start == event.start_time && end == event.end_time && cell.full_date == event.date
                {
                    return false;
                }
                EventPatch {
                    start_time: Some(start),
                    end_time: Some(end),
                    date: Some(cell.full_date),
                    day: Some(day),
                    ..EventPatch::default()
                }
            }
        };

        let id = state.event_id().clone();
        self.store.update(&id, patch)
    }

    /// End the gesture. Clicks stay suppressed until the release debounce
    /// fires.
    pub fn pointer_up(&mut self, subscription: GestureSubscription) -> Option<GestureState> {
        let ended = self.gestures.finish(subscription)?;
        if self.running {
            self.click_release.arm(self.clock.now());
        }
        log::debug!("Finished {:?} gesture on event {}", ended.kind(), ended.event_id());
        Some(ended)
    }

    // Creation and editing

    /// Click on an empty slot: create the preview event and open the panel.
    pub fn handle_grid_click(&mut self, day_index: usize, offset_y: f32) -> Option<&CalendarEvent> {
        if !self.running || self.is_interaction_blocked() {
            return None;
        }
        let date = self.cells.get(day_index)?.full_date;

        let start = self.axis.pixel_to_time(offset_y, SlotBound::Start);
        let end = TimeOfDay::from_minutes(
            (start.minutes() as i32 + self.settings.default_event_minutes as i32)
                .min(self.axis.day_end().minutes() as i32),
        );

        let draft = EventDraft::new(date, start, end);
        let mut preview = draft.to_event(PREVIEW_ID, day_index);
        preview.title = NEW_EVENT_TITLE.to_string();

        self.draft = Some(draft);
        self.editing = None;
        self.panel_open = true;
        self.clicked_day = Some(day_index);
        self.navigator.select(date);
        self.store.set_preview(preview);
        self.store.preview()
    }

    /// Open the panel for a new event on today's date, keeping any draft
    /// times already entered.
    pub fn open_add_event(&mut self) {
        let today = self.clock.today();
        let start = self.axis.day_start();
        let end = start.offset(self.settings.default_event_minutes as i32);
        let draft = self
            .draft
            .get_or_insert_with(|| EventDraft::new(today, start, end));
        draft.date = today;
        self.editing = None;
        self.panel_open = true;
    }

    /// Open the panel with a one-hour draft starting now.
    pub fn open_add_event_with_now(&mut self) {
        let now = self.clock.now();
        let start = TimeOfDay::from_chrono(now.time());
        let latest = self.axis.latest_start();
        let end = if start.hour() + 1 > latest.hour() {
            latest
        } else {
            start.offset(60)
        };

        self.draft = Some(EventDraft::new(now.date(), start, end));
        self.navigator.select(now.date());
        self.editing = None;
        self.panel_open = true;
    }

    /// Load `id` into the draft for editing. Ignored while clicks are
    /// suppressed.
    pub fn open_edit_event(&mut self, id: &EventId) -> bool {
        if self.is_interaction_blocked() {
            return false;
        }
        let Some(event) = self.store.get(id) else {
            return false;
        };
        let draft = EventDraft::from_event(event);
        self.navigator.select(event.date);
        self.draft = Some(draft);
        self.editing = Some(id.clone());
        self.panel_open = true;
        true
    }

    pub fn close_event_panel(&mut self) {
        self.panel_open = false;
        self.clicked_day = None;
        self.draft = None;
        self.editing = None;
        self.store.clear_preview();
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn draft(&self) -> Option<&EventDraft> {
        self.draft.as_ref()
    }

    /// Edit the draft; the preview, if any, follows the change.
    pub fn update_draft<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut EventDraft),
    {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        edit(draft);

        if self.editing.is_none() {
            if let Some(mut preview) = self.store.clear_preview() {
                let day = cell_index(&self.cells, draft.date).unwrap_or(preview.day);
                let title = preview.title.clone();
                preview = draft.to_event(PREVIEW_ID, day);
                if draft.title.trim().is_empty() {
                    preview.title = title;
                }
                self.store.set_preview(preview);
            }
        }
        true
    }

    pub fn editing(&self) -> Option<&EventId> {
        self.editing.as_ref()
    }

    pub fn clicked_day(&self) -> Option<usize> {
        self.clicked_day
    }

    /// Commit the draft: update the edited event or add a new one. Closes
    /// the panel on success.
    pub fn save(&mut self) -> Result<EventId, EngineError> {
        let draft = self.draft.as_ref().ok_or(EngineError::NothingToSave)?;

        let id = match self.editing.clone() {
            Some(id) => {
                self.store.check_times(&id, draft.start_time, draft.end_time)?;
                let mut patch = draft.to_patch();
                patch.day = cell_index(&self.cells, draft.date);
                if !self.store.update(&id, patch) {
                    return Err(EngineError::UnknownEvent(id));
                }
                log::info!("Updated event {}", id);
                id
            }
            None => {
                let day = cell_index(&self.cells, draft.date)
                    .or(self.clicked_day)
                    .unwrap_or(0);
                let id = self.store.allocate_id();
                let event = draft.to_event(id.clone(), day);
                let date = event.date;
                self.store.add(event)?;
                log::info!("Added event {} on {}", id, date);
                id
            }
        };

        self.close_event_panel();
        Ok(id)
    }
}

impl Drop for CalendarEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
