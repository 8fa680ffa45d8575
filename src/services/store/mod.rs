//! In-memory event collection plus the transient preview event.
//!
//! Lookups by day always go through the event `date` and the cells of the
//! current grid. The cached `day` column on stored events is refreshed by
//! [`EventStore::reindex`] and stamped onto the returned copies, never
//! trusted as input.

use thiserror::Error;

use crate::models::event::{CalendarEvent, EventId, EventPatch};
use crate::models::grid::GridCell;
use crate::models::time::TimeOfDay;
use crate::services::grid::cell_index;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("an event with id {0} already exists")]
    DuplicateId(EventId),
    #[error("event {0} must end after it starts")]
    InvalidTimes(EventId),
    #[error("id {0} is reserved for the preview event")]
    ReservedId(EventId),
    #[error("event {0} falls outside the visible hours")]
    OutsideHours(EventId),
}

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<CalendarEvent>,
    preview: Option<CalendarEvent>,
    next_id: i64,
    dirty: bool,
    /// Inclusive `(day_start, day_end)` every committed event must fit in.
    hours: Option<(TimeOfDay, TimeOfDay)>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Empty store that only accepts events between `day_start` and `day_end`.
    pub fn within_hours(day_start: TimeOfDay, day_end: TimeOfDay) -> Self {
        Self {
            hours: Some((day_start, day_end)),
            ..Self::new()
        }
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let mut store = Self::new();
        store.load(events);
        store
    }

    /// Add every valid event, logging and skipping the rest. Leaves the
    /// store clean.
    pub fn load(&mut self, events: Vec<CalendarEvent>) {
        for event in events {
            if let Err(err) = self.add(event) {
                log::warn!("Skipping event while building store: {}", err);
            }
        }
        self.dirty = false;
    }

    /// Check a start/end pair for `id` against ordering and the visible hours.
    pub fn check_times(
        &self,
        id: &EventId,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<(), StoreError> {
        if end <= start {
            return Err(StoreError::InvalidTimes(id.clone()));
        }
        if let Some((day_start, day_end)) = self.hours {
            if start < day_start || end > day_end {
                return Err(StoreError::OutsideHours(id.clone()));
            }
        }
        Ok(())
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True once any committed event changed since the last `mark_clean`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Next free numeric id.
    pub fn allocate_id(&mut self) -> EventId {
        let id = self.next_id;
        self.next_id += 1;
        EventId::Num(id)
    }

    pub fn add(&mut self, event: CalendarEvent) -> Result<EventId, StoreError> {
        if event.id.is_preview() {
            return Err(StoreError::ReservedId(event.id));
        }
        self.check_times(&event.id, event.start_time, event.end_time)?;
        if self.get(&event.id).is_some() {
            return Err(StoreError::DuplicateId(event.id));
        }
        if let EventId::Num(n) = event.id {
            self.next_id = self.next_id.max(n + 1);
        }
        let id = event.id.clone();
        log::debug!("Adding event {} '{}' on {}", id, event.title, event.date);
        self.events.push(event);
        self.dirty = true;
        Ok(id)
    }

    pub fn get(&self, id: &EventId) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == *id)
    }

    pub fn get_mut(&mut self, id: &EventId) -> Option<&mut CalendarEvent> {
        self.events.iter_mut().find(|event| event.id == *id)
    }

    /// Apply `patch` to the event in one step. Unknown ids are ignored and
    /// reported as `false`.
    pub fn update(&mut self, id: &EventId, patch: EventPatch) -> bool {
        match self.get_mut(id) {
            Some(event) => {
                patch.apply(event);
                self.dirty = true;
                true
            }
            None => {
                log::warn!("Ignoring update for unknown event {}", id);
                false
            }
        }
    }

    pub fn remove(&mut self, id: &EventId) -> Option<CalendarEvent> {
        let index = self.events.iter().position(|event| event.id == *id)?;
        self.dirty = true;
        Some(self.events.remove(index))
    }

    pub fn preview(&self) -> Option<&CalendarEvent> {
        self.preview.as_ref()
    }

    pub fn set_preview(&mut self, preview: CalendarEvent) {
        self.preview = Some(preview);
    }

    pub fn clear_preview(&mut self) -> Option<CalendarEvent> {
        self.preview.take()
    }

    /// Refresh the cached `day` column of every event against `cells`.
    /// Events outside the grid keep their previous value.
    pub fn reindex(&mut self, cells: &[GridCell]) {
        for event in self.events.iter_mut().chain(self.preview.iter_mut()) {
            if let Some(index) = cell_index(cells, event.date) {
                event.day = index;
            }
        }
    }

    /// Events whose date matches the cell at `day_index`, stamped with that
    /// index.
    pub fn events_for_day(&self, cells: &[GridCell], day_index: usize) -> Vec<CalendarEvent> {
        let Some(cell) = cells.get(day_index) else {
            return Vec::new();
        };
        self.events
            .iter()
            .filter(|event| event.date == cell.full_date)
            .map(|event| CalendarEvent {
                day: day_index,
                ..event.clone()
            })
            .collect()
    }

    /// Every committed event with a fresh `day`, followed by the preview.
    pub fn all_events_including_preview(&self, cells: &[GridCell]) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .chain(self.preview.iter())
            .map(|event| {
                let mut copy = event.clone();
                if let Some(index) = cell_index(cells, event.date) {
                    copy.day = index;
                }
                copy
            })
            .collect()
    }

    pub fn events_in_category(&self, category: &str) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|event| {
                event
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hm;
    use crate::models::grid::ViewMode;
    use crate::models::event::PREVIEW_ID;
    use crate::services::grid::generate_grid;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(id: i64, date: NaiveDate) -> CalendarEvent {
        CalendarEvent::new(id, "Sample", date, hm!(9, 0), hm!(10, 0)).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = EventStore::new();
        let id = store.add(sample(4, ymd(2025, 3, 10))).unwrap();
        assert_eq!(id, EventId::Num(4));
        assert!(store.get(&id).is_some());
        assert!(store.is_dirty());
        assert_eq!(store.allocate_id(), EventId::Num(5));
    }

    #[test]
    fn test_add_rejects_duplicates_and_preview_id() {
        let mut store = EventStore::new();
        store.add(sample(1, ymd(2025, 3, 10))).unwrap();
        assert_eq!(
            store.add(sample(1, ymd(2025, 3, 11))),
            Err(StoreError::DuplicateId(EventId::Num(1)))
        );

        let mut preview = sample(2, ymd(2025, 3, 10));
        preview.id = PREVIEW_ID;
        assert!(matches!(store.add(preview), Err(StoreError::ReservedId(_))));
    }

    #[test]
    fn test_add_rejects_inverted_times() {
        let mut store = EventStore::new();
        let mut event = sample(1, ymd(2025, 3, 10));
        event.end_time = hm!(8, 0);
        assert!(matches!(store.add(event), Err(StoreError::InvalidTimes(_))));
    }

    #[test]
    fn test_bounded_store_rejects_events_outside_hours() {
        let mut store = EventStore::within_hours(hm!(7, 0), hm!(21, 30));
        let mut early = sample(1, ymd(2025, 3, 10));
        early.start_time = hm!(3, 0);
        early.end_time = hm!(4, 0);
        assert_eq!(store.add(early), Err(StoreError::OutsideHours(EventId::Num(1))));

        let mut late = sample(2, ymd(2025, 3, 10));
        late.end_time = hm!(22, 0);
        assert!(matches!(store.add(late), Err(StoreError::OutsideHours(_))));

        let mut edge = sample(3, ymd(2025, 3, 10));
        edge.start_time = hm!(7, 0);
        edge.end_time = hm!(21, 30);
        assert!(store.add(edge).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_load_skips_events_outside_hours() {
        let mut early = sample(1, ymd(2025, 3, 10));
        early.start_time = hm!(5, 0);
        early.end_time = hm!(6, 0);
        let mut store = EventStore::within_hours(hm!(7, 0), hm!(21, 30));
        store.load(vec![early, sample(2, ymd(2025, 3, 10))]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.events()[0].id, EventId::Num(2));
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = EventStore::with_events(vec![sample(1, ymd(2025, 3, 10))]);
        assert!(!store.is_dirty());
        let changed = store.update(&EventId::Num(99), EventPatch::times(hm!(11, 0), hm!(12, 0)));
        assert!(!changed);
        assert!(!store.is_dirty());
        assert_eq!(store.events()[0].start_time, hm!(9, 0));
    }

    #[test]
    fn test_update_and_remove() {
        let mut store = EventStore::with_events(vec![sample(1, ymd(2025, 3, 10))]);
        assert!(store.update(&EventId::Num(1), EventPatch::times(hm!(11, 0), hm!(12, 0))));
        assert_eq!(store.events()[0].end_time, hm!(12, 0));

        let removed = store.remove(&EventId::Num(1)).unwrap();
        assert_eq!(removed.start_time, hm!(11, 0));
        assert!(store.is_empty());
        assert!(store.remove(&EventId::Num(1)).is_none());
    }

    #[test]
    fn test_events_for_day_uses_date_not_cached_day() {
        let cells = generate_grid(ViewMode::Week, ymd(2025, 3, 12), ymd(2025, 3, 12));
        let mut stale = sample(1, ymd(2025, 3, 14));
        stale.day = 0;
        let store = EventStore::with_events(vec![stale, sample(2, ymd(2025, 3, 10))]);

        let friday = store.events_for_day(&cells, 4);
        assert_eq!(friday.len(), 1);
        assert_eq!(friday[0].id, EventId::Num(1));
        assert_eq!(friday[0].day, 4);

        assert!(store.events_for_day(&cells, 12).is_empty());
    }

    #[test]
    fn test_all_events_include_preview_last() {
        let cells = generate_grid(ViewMode::Week, ymd(2025, 3, 12), ymd(2025, 3, 12));
        let mut store = EventStore::with_events(vec![sample(1, ymd(2025, 3, 16))]);
        let mut preview = sample(0, ymd(2025, 3, 11));
        preview.id = PREVIEW_ID;
        store.set_preview(preview);

        let all = store.all_events_including_preview(&cells);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].day, 6);
        assert!(all[1].id.is_preview());
        assert_eq!(all[1].day, 1);

        store.clear_preview();
        assert_eq!(store.all_events_including_preview(&cells).len(), 1);
    }

    #[test]
    fn test_reindex_updates_cached_day() {
        let cells = generate_grid(ViewMode::Month, ymd(2025, 3, 1), ymd(2025, 3, 1));
        let mut store = EventStore::with_events(vec![sample(1, ymd(2025, 3, 1))]);
        store.reindex(&cells);
        // March 2025 starts on a Saturday, so the 1st is the sixth cell.
        assert_eq!(store.events()[0].day, 5);
    }

    #[test]
    fn test_events_in_category() {
        let mut gym = sample(1, ymd(2025, 3, 10));
        gym.category = Some("Gym".to_string());
        let store = EventStore::with_events(vec![gym, sample(2, ymd(2025, 3, 10))]);
        assert_eq!(store.events_in_category("gym").len(), 1);
        assert!(store.events_in_category("Budget").is_empty());
    }
}
