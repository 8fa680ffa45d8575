use chrono::NaiveDate;

use crate::models::event::{Attendee, CalendarEvent, EventId, EventPatch};
use crate::models::palette::{self, EventColor};
use crate::models::time::TimeOfDay;

pub const UNTITLED: &str = "(No title)";
pub const DEFAULT_CATEGORY: &str = "Other";
pub const NEW_EVENT_TITLE: &str = "New Event";
pub const NEW_EVENT_CATEGORY: &str = "Meeting";

/// Editable copy of an event shown in the add/edit panel.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub background: String,
    pub border_color: String,
    pub meet_link: String,
    pub category: String,
    pub users: Vec<Attendee>,
}

impl EventDraft {
    pub fn new(date: NaiveDate, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            title: String::new(),
            date,
            start_time,
            end_time,
            background: palette::DEFAULT_COLOR.background.to_string(),
            border_color: palette::DEFAULT_COLOR.border.to_string(),
            meet_link: String::new(),
            category: NEW_EVENT_CATEGORY.to_string(),
            users: Vec::new(),
        }
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            background: event.background.clone(),
            border_color: event.border_color.clone(),
            meet_link: event.meet_link.clone().unwrap_or_default(),
            category: event
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            users: event.users.clone(),
        }
    }

    pub fn set_color(&mut self, color: &EventColor) {
        self.background = color.background.to_string();
        self.border_color = color.border.to_string();
    }

    fn title_or_default(&self) -> String {
        if self.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            self.title.clone()
        }
    }

    fn category_or_default(&self) -> String {
        if self.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            self.category.clone()
        }
    }

    fn meet_link_opt(&self) -> Option<String> {
        Some(self.meet_link.trim())
            .filter(|link| !link.is_empty())
            .map(str::to_string)
    }

    /// Build a committed event from this draft.
    pub fn to_event(&self, id: EventId, day: usize) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title_or_default(),
            day,
            start_time: self.start_time,
            end_time: self.end_time,
            date: self.date,
            background: self.background.clone(),
            background_dimmed: palette::dimmed(&self.background),
            border_color: self.border_color.clone(),
            meet_link: self.meet_link_opt(),
            category: Some(self.category_or_default()),
            users: self.users.clone(),
        }
    }

    /// Patch that overwrites an existing event with this draft.
    pub fn to_patch(&self) -> EventPatch {
        EventPatch {
            title: Some(self.title_or_default()),
            start_time: Some(self.start_time),
            end_time: Some(self.end_time),
            date: Some(self.date),
            background: Some(self.background.clone()),
            background_dimmed: Some(palette::dimmed(&self.background)),
            border_color: Some(self.border_color.clone()),
            meet_link: Some(self.meet_link_opt()),
            category: Some(Some(self.category_or_default())),
            users: Some(self.users.clone()),
            ..EventPatch::default()
        }
    }
}
