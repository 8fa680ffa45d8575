// Test fixtures - reusable test data
// Manual clock and sample events shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use dashboard_calendar::hm;
use dashboard_calendar::models::event::CalendarEvent;
use dashboard_calendar::models::settings::EngineSettings;
use dashboard_calendar::models::time::TimeOfDay;
use dashboard_calendar::services::clock::Clock;
use dashboard_calendar::CalendarEngine;

/// Clock the test advances by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: i64) {
        self.advance(Duration::milliseconds(ms));
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Sample dates for testing
pub mod dates {
    use super::*;

    pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Monday Oct 19, 2026
    pub fn monday() -> NaiveDate {
        ymd(2026, 10, 19)
    }

    pub fn weekday(offset: i64) -> NaiveDate {
        monday() + Duration::days(offset)
    }

    /// Monday Oct 19, 2026 at 08:00
    pub fn monday_morning() -> NaiveDateTime {
        monday().and_hms_opt(8, 0, 0).unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn event(id: i64, date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> CalendarEvent {
        CalendarEvent::new(id, format!("Event {}", id), date, start, end).unwrap()
    }

    /// Two overlapping events on Monday: 9:00-10:00 and 9:30-10:30.
    pub fn overlapping_pair() -> Vec<CalendarEvent> {
        vec![
            event(1, dates::monday(), hm!(9, 0), hm!(10, 0)),
            event(2, dates::monday(), hm!(9, 30), hm!(10, 30)),
        ]
    }

    /// Back-to-back events on Monday: 9:00-10:00 and 10:00-11:00.
    pub fn back_to_back() -> Vec<CalendarEvent> {
        vec![
            event(1, dates::monday(), hm!(9, 0), hm!(10, 0)),
            event(2, dates::monday(), hm!(10, 0), hm!(11, 0)),
        ]
    }
}

/// Running engine on the week of [`dates::monday`] with the given events.
pub fn engine_with(events: Vec<CalendarEvent>) -> (CalendarEngine, ManualClock) {
    let clock = ManualClock::new(dates::monday_morning());
    let mut engine = CalendarEngine::new(EngineSettings::default(), Box::new(clock.clone()))
        .expect("default settings are valid");
    engine.start();
    engine.load_events(events);
    (engine, clock)
}
