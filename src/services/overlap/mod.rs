//! Side-by-side placement of overlapping events within one day column.
//!
//! Events are sorted by start time (stable), swept into overlap groups, and
//! each group is packed greedily into the lowest free column. Every member of
//! a group is given the same column count so the group renders as uniform
//! tracks.

use crate::models::event::CalendarEvent;
use crate::models::time::TimeOfDay;

/// Horizontal slot assigned to an event for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: usize,
    pub columns: usize,
}

impl Placement {
    /// Left edge and width as fractions of the day column width.
    pub fn horizontal_fraction(&self) -> (f32, f32) {
        let columns = self.columns.max(1) as f32;
        (self.column as f32 / columns, 1.0 / columns)
    }
}

/// An event annotated with its placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEvent<'a> {
    pub event: &'a CalendarEvent,
    pub placement: Placement,
}

/// Assign columns to the events of a single day.
///
/// The output is in start-time order. Two events sharing a column never
/// overlap; back-to-back events (`end == start`) may share one.
pub fn resolve_columns<'a, I>(events: I) -> Vec<PositionedEvent<'a>>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut sorted: Vec<&CalendarEvent> = events.into_iter().collect();
    // sort_by_key is stable, so equal starts keep their input order
    sorted.sort_by_key(|event| event.start_time);

    let mut positioned = Vec::with_capacity(sorted.len());
    for group in overlap_groups(&sorted) {
        let columns = assign_columns(group);
        let count = columns.iter().copied().max().map_or(0, |c| c + 1);
        positioned.extend(group.iter().zip(columns).map(|(&event, column)| PositionedEvent {
            event,
            placement: Placement {
                column,
                columns: count,
            },
        }));
    }
    positioned
}

/// Split start-sorted events into runs that are transitively connected by
/// overlap. The running maximum end is tracked, so an event that only
/// overlaps an earlier, longer member still joins the group.
fn overlap_groups<'s, 'a>(sorted: &'s [&'a CalendarEvent]) -> Vec<&'s [&'a CalendarEvent]> {
    let mut groups = Vec::new();
    let mut group_start = 0;
    let mut group_end: Option<TimeOfDay> = None;

    for (index, event) in sorted.iter().enumerate() {
        match group_end {
            Some(end) if event.start_time < end => {
                group_end = Some(end.max(event.end_time));
            }
            Some(_) => {
                groups.push(&sorted[group_start..index]);
                group_start = index;
                group_end = Some(event.end_time);
            }
            None => group_end = Some(event.end_time),
        }
    }
    if group_start < sorted.len() {
        groups.push(&sorted[group_start..]);
    }
    groups
}

/// Greedy first-fit: each event takes the lowest column whose last occupant
/// has already ended.
fn assign_columns(group: &[&CalendarEvent]) -> Vec<usize> {
    let mut column_ends: Vec<TimeOfDay> = Vec::new();
    group
        .iter()
        .map(|event| {
            match column_ends.iter().position(|end| *end <= event.start_time) {
                Some(free) => {
                    column_ends[free] = event.end_time;
                    free
                }
                None => {
                    column_ends.push(event.end_time);
                    column_ends.len() - 1
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hm;
    use chrono::NaiveDate;

    fn event(id: i64, start: TimeOfDay, end: TimeOfDay) -> CalendarEvent {
        let date = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        CalendarEvent::new(id, format!("Event {}", id), date, start, end).unwrap()
    }

    fn layout(events: &[CalendarEvent]) -> Vec<(i64, usize, usize)> {
        resolve_columns(events)
            .into_iter()
            .map(|p| match p.event.id {
                crate::models::event::EventId::Num(n) => (n, p.placement.column, p.placement.columns),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_empty_day() {
        assert!(resolve_columns(&[]).is_empty());
    }

    #[test]
    fn test_partial_overlap_uses_two_columns() {
        let events = vec![event(1, hm!(9, 0), hm!(10, 0)), event(2, hm!(9, 30), hm!(10, 30))];
        assert_eq!(layout(&events), vec![(1, 0, 2), (2, 1, 2)]);
    }

    #[test]
    fn test_back_to_back_share_column() {
        let events = vec![event(1, hm!(9, 0), hm!(10, 0)), event(2, hm!(10, 0), hm!(11, 0))];
        assert_eq!(layout(&events), vec![(1, 0, 1), (2, 0, 1)]);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let events = vec![event(2, hm!(11, 0), hm!(12, 0)), event(1, hm!(8, 0), hm!(9, 0))];
        assert_eq!(layout(&events), vec![(1, 0, 1), (2, 0, 1)]);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let events = vec![event(5, hm!(9, 0), hm!(10, 0)), event(3, hm!(9, 0), hm!(9, 30))];
        assert_eq!(layout(&events), vec![(5, 0, 2), (3, 1, 2)]);
    }

    #[test]
    fn test_column_reuse_inside_group() {
        // 1 spans the morning; 2 and 3 follow each other beside it.
        let events = vec![
            event(1, hm!(9, 0), hm!(12, 0)),
            event(2, hm!(9, 30), hm!(10, 0)),
            event(3, hm!(10, 0), hm!(11, 0)),
        ];
        assert_eq!(layout(&events), vec![(1, 0, 2), (2, 1, 2), (3, 1, 2)]);
    }

    #[test]
    fn test_nested_event_after_short_neighbour_stays_grouped() {
        // 3 does not overlap 2 but does overlap 1.
        let events = vec![
            event(1, hm!(9, 0), hm!(12, 0)),
            event(2, hm!(9, 30), hm!(10, 0)),
            event(3, hm!(10, 30), hm!(11, 0)),
        ];
        let placed = layout(&events);
        assert_eq!(placed, vec![(1, 0, 2), (2, 1, 2), (3, 1, 2)]);
    }

    #[test]
    fn test_three_way_overlap() {
        let events = vec![
            event(1, hm!(9, 0), hm!(11, 0)),
            event(2, hm!(9, 0), hm!(11, 0)),
            event(3, hm!(10, 0), hm!(10, 30)),
            event(4, hm!(13, 0), hm!(14, 0)),
        ];
        assert_eq!(
            layout(&events),
            vec![(1, 0, 3), (2, 1, 3), (3, 2, 3), (4, 0, 1)]
        );
    }

    #[test]
    fn test_horizontal_fraction() {
        let placement = Placement { column: 1, columns: 4 };
        assert_eq!(placement.horizontal_fraction(), (0.25, 0.25));
    }
}
