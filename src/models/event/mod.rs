// Event module
// Calendar event model laid out on the dashboard time grid

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::palette::{self, EventColor};
use crate::models::time::TimeOfDay;

/// Identity of an event. Seed data uses numbers, imported data may use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Num(i64),
    Text(String),
}

/// Sentinel id carried by the uncommitted preview event.
pub const PREVIEW_ID: EventId = EventId::Num(-1);

impl EventId {
    pub fn is_preview(&self) -> bool {
        *self == PREVIEW_ID
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Num(value)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Num(n) => write!(f, "{}", n),
            EventId::Text(s) => f.write_str(s),
        }
    }
}

/// Avatar shown on an event block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub src: String,
    pub alt: String,
}

/// Calendar event placed on one day of the grid.
///
/// `date` is authoritative. `day` is only a cache of the column the event
/// occupies in the currently generated grid and is rewritten whenever the
/// grid changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub day: usize,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub date: NaiveDate,
    pub background: String,
    pub background_dimmed: String,
    pub border_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meet_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub users: Vec<Attendee>,
}

impl CalendarEvent {
    /// Create an event with the default palette colour.
    ///
    /// # Examples
    /// ```
    /// use dashboard_calendar::models::event::CalendarEvent;
    /// use dashboard_calendar::hm;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    /// let event = CalendarEvent::new(1, "Standup", date, hm!(9, 0), hm!(9, 30)).unwrap();
    /// assert_eq!(event.duration_minutes(), 30);
    /// ```
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    ) -> Result<Self, String> {
        let event = Self::builder()
            .id(id)
            .title(title)
            .date(date)
            .times(start_time, end_time)
            .build()?;
        Ok(event)
    }

    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.end_time <= self.start_time {
            return Err("Event end time must be after start time".to_string());
        }
        if !self.background.starts_with('#') || !self.border_color.starts_with('#') {
            return Err("Colors must be in hex format (#RRGGBB)".to_string());
        }
        Ok(())
    }

    pub fn duration_minutes(&self) -> i32 {
        self.start_time.minutes_until(self.end_time)
    }

    /// Half-open `[start, end)` overlap test; touching events do not overlap.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub fn apply_color(&mut self, color: &EventColor) {
        self.background = color.background.to_string();
        self.background_dimmed = palette::dimmed(color.background);
        self.border_color = color.border.to_string();
    }
}

/// Partial update applied by [`crate::services::store::EventStore::update`].
///
/// Every field is applied in one call so a renderer never observes a half
/// updated event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub date: Option<NaiveDate>,
    pub day: Option<usize>,
    pub background: Option<String>,
    pub background_dimmed: Option<String>,
    pub border_color: Option<String>,
    pub meet_link: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub users: Option<Vec<Attendee>>,
}

impl EventPatch {
    pub fn times(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, event: &mut CalendarEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(start) = self.start_time {
            event.start_time = start;
        }
        if let Some(end) = self.end_time {
            event.end_time = end;
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(day) = self.day {
            event.day = day;
        }
        if let Some(background) = self.background {
            event.background = background;
        }
        if let Some(dimmed) = self.background_dimmed {
            event.background_dimmed = dimmed;
        }
        if let Some(border) = self.border_color {
            event.border_color = border;
        }
        if let Some(link) = self.meet_link {
            event.meet_link = link;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(users) = self.users {
            event.users = users;
        }
    }
}

/// Builder for creating events with optional fields
pub struct EventBuilder {
    id: Option<EventId>,
    title: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<TimeOfDay>,
    end_time: Option<TimeOfDay>,
    color: EventColor,
    meet_link: Option<String>,
    category: Option<String>,
    users: Vec<Attendee>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            date: None,
            start_time: None,
            end_time: None,
            color: palette::DEFAULT_COLOR,
            meet_link: None,
            category: None,
            users: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn times(mut self, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    pub fn color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    pub fn meet_link(mut self, link: impl Into<String>) -> Self {
        self.meet_link = Some(link.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn attendee(mut self, src: impl Into<String>, alt: impl Into<String>) -> Self {
        self.users.push(Attendee {
            src: src.into(),
            alt: alt.into(),
        });
        self
    }

    pub fn build(self) -> Result<CalendarEvent, String> {
        let id = self.id.ok_or("Event id is required")?;
        let date = self.date.ok_or("Event date is required")?;
        let start_time = self.start_time.ok_or("Event start time is required")?;
        let end_time = self.end_time.ok_or("Event end time is required")?;

        let mut event = CalendarEvent {
            id,
            title: self.title.unwrap_or_default(),
            day: 0,
            start_time,
            end_time,
            date,
            background: String::new(),
            background_dimmed: String::new(),
            border_color: String::new(),
            meet_link: self.meet_link,
            category: self.category,
            users: self.users,
        };
        event.apply_color(&self.color);
        event.validate()?;
        Ok(event)
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hm;

    fn sample_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_new_event_success() {
        let event = CalendarEvent::new(7, "Meeting", sample_date(), hm!(9, 0), hm!(10, 0)).unwrap();
        assert_eq!(event.id, EventId::Num(7));
        assert_eq!(event.title, "Meeting");
        assert_eq!(event.background, "#34d399");
        assert_eq!(event.background_dimmed, "#34d39920");
        assert_eq!(event.border_color, "#059669");
        assert_eq!(event.duration_minutes(), 60);
    }

    #[test]
    fn test_new_event_invalid_times() {
        let result = CalendarEvent::new(1, "Meeting", sample_date(), hm!(10, 0), hm!(9, 0));
        assert_eq!(result.unwrap_err(), "Event end time must be after start time");
    }

    #[test]
    fn test_new_event_equal_times() {
        assert!(CalendarEvent::new(1, "Meeting", sample_date(), hm!(10, 0), hm!(10, 0)).is_err());
    }

    #[test]
    fn test_builder_missing_date() {
        let result = CalendarEvent::builder().id(1).times(hm!(9, 0), hm!(10, 0)).build();
        assert_eq!(result.unwrap_err(), "Event date is required");
    }

    #[test]
    fn test_builder_with_optional_fields() {
        let event = CalendarEvent::builder()
            .id("planning-1")
            .title("Sprint planning")
            .date(sample_date())
            .times(hm!(13, 0), hm!(14, 30))
            .color(palette::EVENT_COLORS[2])
            .meet_link("https://meet.example.com/abc")
            .category("Meeting")
            .attendee("/avatars/ana.png", "Ana")
            .build()
            .unwrap();

        assert_eq!(event.id, EventId::Text("planning-1".to_string()));
        assert_eq!(event.background, "#fb923c");
        assert_eq!(event.background_dimmed, "#fb923c20");
        assert_eq!(event.category.as_deref(), Some("Meeting"));
        assert_eq!(event.users.len(), 1);
    }

    #[test]
    fn test_overlaps_is_half_open() {
        let a = CalendarEvent::new(1, "A", sample_date(), hm!(9, 0), hm!(10, 0)).unwrap();
        let b = CalendarEvent::new(2, "B", sample_date(), hm!(10, 0), hm!(11, 0)).unwrap();
        let c = CalendarEvent::new(3, "C", sample_date(), hm!(9, 30), hm!(10, 30)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_patch_applies_all_fields() {
        let mut event = CalendarEvent::new(1, "A", sample_date(), hm!(9, 0), hm!(10, 0)).unwrap();
        let next_day = sample_date().succ_opt().unwrap();
        let patch = EventPatch {
            date: Some(next_day),
            day: Some(1),
            ..EventPatch::times(hm!(11, 0), hm!(12, 0))
        };
        assert!(!patch.is_empty());
        patch.apply(&mut event);
        assert_eq!(event.start_time, hm!(11, 0));
        assert_eq!(event.end_time, hm!(12, 0));
        assert_eq!(event.date, next_day);
        assert_eq!(event.day, 1);
        assert_eq!(event.title, "A");
    }

    #[test]
    fn test_event_id_json_forms() {
        let num: EventId = serde_json::from_str("12").unwrap();
        let text: EventId = serde_json::from_str("\"gym-1\"").unwrap();
        assert_eq!(num, EventId::Num(12));
        assert_eq!(text, EventId::Text("gym-1".to_string()));
        assert!(PREVIEW_ID.is_preview());
    }
}
