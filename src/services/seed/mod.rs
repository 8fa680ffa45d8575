//! Seed events placed on the current week at load time.
//!
//! Seeds carry a `day` offset from the week's Monday instead of a date;
//! [`materialize`] turns them into concrete events.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::hm;
use crate::models::event::{Attendee, CalendarEvent, EventId};
use crate::models::palette::{self, EVENT_COLORS};
use crate::models::time::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEvent {
    pub id: EventId,
    pub title: String,
    /// Days after Monday (0 = Monday, 6 = Sunday).
    pub day: u32,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub background: String,
    #[serde(default)]
    pub background_dimmed: Option<String>,
    pub border_color: String,
    #[serde(default)]
    pub meet_link: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub users: Vec<Attendee>,
}

fn seed(
    id: i64,
    title: &str,
    day: u32,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
    color: usize,
    category: &str,
) -> SeedEvent {
    let swatch = EVENT_COLORS[color % EVENT_COLORS.len()];
    SeedEvent {
        id: EventId::Num(id),
        title: title.to_string(),
        day,
        start_time,
        end_time,
        background: swatch.background.to_string(),
        background_dimmed: None,
        border_color: swatch.border.to_string(),
        meet_link: None,
        category: Some(category.to_string()),
        users: Vec::new(),
    }
}

/// Demo week shipped with the dashboard.
pub fn default_seeds() -> Vec<SeedEvent> {
    let mut standup = seed(1, "Team standup", 0, hm!(9, 0), hm!(9, 30), 1, "Meeting");
    standup.meet_link = Some("https://meet.google.com/abc-defg-hij".to_string());
    standup.users = vec![
        Attendee {
            src: "https://i.pravatar.cc/128?u=1".to_string(),
            alt: "Ana".to_string(),
        },
        Attendee {
            src: "https://i.pravatar.cc/128?u=2".to_string(),
            alt: "Luca".to_string(),
        },
    ];

    vec![
        standup,
        seed(2, "Squat / Bench", 0, hm!(7, 0), hm!(8, 30), 0, "Gym"),
        seed(3, "Budget review", 1, hm!(10, 0), hm!(11, 0), 2, "Budget"),
        seed(4, "Design sync", 1, hm!(10, 30), hm!(12, 0), 1, "Meeting"),
        seed(5, "Deadlift / OHP", 2, hm!(7, 0), hm!(8, 30), 0, "Gym"),
        seed(6, "Lunch with Sam", 3, hm!(12, 0), hm!(13, 30), 2, "Personal"),
        seed(7, "Portfolio rebalance", 4, hm!(16, 0), hm!(17, 0), 2, "Budget"),
        seed(8, "Weekly planning", 6, hm!(18, 0), hm!(19, 0), 1, "Planning"),
    ]
}

/// Read seeds from a JSON array file.
pub fn load_seed_file(path: &Path) -> Result<Vec<SeedEvent>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed events from {}", path.display()))?;
    let seeds: Vec<SeedEvent> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse seed events from {}", path.display()))?;
    log::info!("Loaded {} seed events from {}", seeds.len(), path.display());
    Ok(seeds)
}

/// Place seeds on the week starting at `monday`. Seeds with inverted times
/// are skipped.
pub fn materialize(seeds: &[SeedEvent], monday: NaiveDate) -> Vec<CalendarEvent> {
    seeds
        .iter()
        .filter_map(|seed| {
            if seed.end_time <= seed.start_time {
                log::warn!("Skipping seed {} with end before start", seed.id);
                return None;
            }
            Some(CalendarEvent {
                id: seed.id.clone(),
                title: seed.title.clone(),
                day: seed.day as usize,
                start_time: seed.start_time,
                end_time: seed.end_time,
                date: monday + Duration::days(seed.day as i64),
                background: seed.background.clone(),
                background_dimmed: seed
                    .background_dimmed
                    .clone()
                    .unwrap_or_else(|| palette::dimmed(&seed.background)),
                border_color: seed.border_color.clone(),
                meet_link: seed.meet_link.clone(),
                category: seed.category.clone(),
                users: seed.users.clone(),
            })
        })
        .collect()
}
