//! Grid generation and period navigation.
//!
//! A grid is rebuilt wholesale whenever the view mode or anchor date changes;
//! cells are never edited in place.

use chrono::{Datelike, NaiveDate};

use crate::models::grid::{GridCell, ViewMode};
use crate::utils::date::{
    add_months, clamp_to_supported, days_in_month, first_of_month, is_same_day, shift_days,
    week_start, weekday_index, WEEKDAY_LABELS,
};

/// Build the ordered cells for `view` around `anchor`.
///
/// Month grids start on the Monday on or before the 1st and end on the Sunday
/// on or after the last day, so the length is always a multiple of 7. Labels
/// come from the cell position, never from re-deriving the weekday.
/// Anchors within two months of chrono's date limits are pulled inward.
pub fn generate_grid(view: ViewMode, anchor: NaiveDate, today: NaiveDate) -> Vec<GridCell> {
    let anchor = clamp_to_supported(anchor);
    match view {
        ViewMode::Day => vec![make_cell(
            WEEKDAY_LABELS[weekday_index(anchor) as usize],
            anchor,
            true,
            today,
        )],
        ViewMode::Week => {
            let monday = week_start(anchor);
            (0..7)
                .map(|i| make_cell(WEEKDAY_LABELS[i], shift_days(monday, i as i64), true, today))
                .collect()
        }
        ViewMode::Month => month_cells(anchor, today),
    }
}

fn month_cells(anchor: NaiveDate, today: NaiveDate) -> Vec<GridCell> {
    let first = first_of_month(anchor);
    let leading = weekday_index(first) as usize;
    let month_len = days_in_month(first.year(), first.month()) as usize;
    let shown = leading + month_len;
    let total = shown.div_ceil(7) * 7;
    let grid_start = shift_days(first, -(leading as i64));

    (0..total)
        .map(|i| {
            let date = shift_days(grid_start, i as i64);
            let current = date.year() == first.year() && date.month() == first.month();
            make_cell(WEEKDAY_LABELS[i % 7], date, current, today)
        })
        .collect()
}

fn make_cell(label: &'static str, date: NaiveDate, current: bool, today: NaiveDate) -> GridCell {
    let is_today = is_same_day(date, today);
    GridCell {
        label,
        date: date.day(),
        current,
        today: is_today,
        highlight: is_today && current,
        full_date: date,
    }
}

/// First date of the period `anchor` falls in.
pub fn period_start(view: ViewMode, anchor: NaiveDate) -> NaiveDate {
    match view {
        ViewMode::Day => anchor,
        ViewMode::Week => week_start(anchor),
        ViewMode::Month => first_of_month(anchor),
    }
}

/// Anchor of the following period.
pub fn next_anchor(view: ViewMode, anchor: NaiveDate) -> NaiveDate {
    step(view, anchor, 1)
}

/// Anchor of the preceding period.
pub fn prev_anchor(view: ViewMode, anchor: NaiveDate) -> NaiveDate {
    step(view, anchor, -1)
}

fn step(view: ViewMode, anchor: NaiveDate, direction: i32) -> NaiveDate {
    let stepped = match view {
        ViewMode::Day => shift_days(anchor, direction as i64),
        ViewMode::Week => shift_days(week_start(anchor), 7 * direction as i64),
        ViewMode::Month => add_months(anchor, direction),
    };
    clamp_to_supported(stepped)
}

/// Heading shown above the grid.
pub fn period_label(view: ViewMode, anchor: NaiveDate) -> String {
    match view {
        ViewMode::Month => anchor.format("%B %Y").to_string(),
        ViewMode::Week => {
            let start = week_start(anchor);
            let end = shift_days(start, 6);
            if start.month() == end.month() {
                format!(
                    "{} {}-{}, {}",
                    start.format("%B"),
                    start.day(),
                    end.day(),
                    start.year()
                )
            } else {
                format!(
                    "{} - {}, {}",
                    start.format("%b %-d"),
                    end.format("%b %-d"),
                    end.year()
                )
            }
        }
        ViewMode::Day => anchor.format("%A, %B %-d, %Y").to_string(),
    }
}

/// Index of the cell showing `date`, if the grid contains it.
pub fn cell_index(cells: &[GridCell], date: NaiveDate) -> Option<usize> {
    cells.iter().position(|cell| is_same_day(cell.full_date, date))
}

/// Current view mode plus the two dates navigation moves.
///
/// Week and month views follow `anchor`; the day view follows `selected`,
/// so switching back from a day keeps the week or month that was open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarNavigator {
    view: ViewMode,
    anchor: NaiveDate,
    selected: NaiveDate,
}

impl CalendarNavigator {
    pub fn new(view: ViewMode, anchor: NaiveDate) -> Self {
        Self {
            view,
            anchor,
            selected: anchor,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Date the visible grid is built around.
    pub fn anchor(&self) -> NaiveDate {
        match self.view {
            ViewMode::Day => self.selected,
            ViewMode::Week | ViewMode::Month => self.anchor,
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = anchor;
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    /// Open `date` in the day view.
    pub fn show_day(&mut self, date: NaiveDate) {
        self.view = ViewMode::Day;
        self.selected = date;
    }

    pub fn next(&mut self) {
        self.step(1);
    }

    pub fn prev(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, direction: i32) {
        match self.view {
            ViewMode::Day => self.selected = step(ViewMode::Day, self.selected, direction),
            view => self.anchor = step(view, self.anchor, direction),
        }
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.anchor = today;
        self.selected = today;
    }

    pub fn period_start(&self) -> NaiveDate {
        period_start(self.view, self.anchor())
    }

    pub fn label(&self) -> String {
        period_label(self.view, self.anchor())
    }

    pub fn cells(&self, today: NaiveDate) -> Vec<GridCell> {
        generate_grid(self.view, self.anchor(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_grids_at_date_limits_do_not_panic() {
        for view in [ViewMode::Day, ViewMode::Week, ViewMode::Month] {
            for anchor in [NaiveDate::MIN, NaiveDate::MAX] {
                let cells = generate_grid(view, anchor, anchor);
                assert!(!cells.is_empty());
                assert_eq!(cells.len() % view_len(view), 0);
                for pair in cells.windows(2) {
                    assert_eq!(pair[1].full_date, pair[0].full_date.succ_opt().unwrap());
                }
                let _ = period_label(view, anchor);

                let mut nav = CalendarNavigator::new(view, anchor);
                nav.next();
                nav.prev();
                nav.prev();
                assert!(!nav.cells(anchor).is_empty());
            }
        }
    }

    fn view_len(view: ViewMode) -> usize {
        match view {
            ViewMode::Day => 1,
            _ => 7,
        }
    }

    #[test]
    fn test_day_grid_single_cell() {
        let cells = generate_grid(ViewMode::Day, ymd(2025, 6, 8), ymd(2025, 6, 8));
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].label, "SUN");
        assert!(cells[0].today);
        assert!(cells[0].highlight);
        assert!(cells[0].current);
    }

    #[test]
    fn test_week_grid_starts_monday() {
        let cells = generate_grid(ViewMode::Week, ymd(2024, 12, 4), ymd(2000, 1, 1));
        let dates: Vec<u32> = cells.iter().map(|c| c.date).collect();
        assert_eq!(dates, vec![2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(cells[0].label, "MON");
        assert_eq!(cells[6].label, "SUN");
        assert!(cells.iter().all(|c| c.current && !c.today));
    }

    #[test]
    fn test_week_grid_from_sunday_anchor() {
        let cells = generate_grid(ViewMode::Week, ymd(2024, 12, 8), ymd(2024, 12, 8));
        assert_eq!(cells[0].full_date, ymd(2024, 12, 2));
        assert!(cells[6].today);
    }

    #[test]
    fn test_month_grid_december_spills_into_january() {
        // Dec 1, 2025 is a Monday; Dec 31 is a Wednesday.
        let cells = generate_grid(ViewMode::Month, ymd(2025, 12, 15), ymd(2000, 1, 1));
        assert_eq!(cells.len(), 35);
        assert_eq!(cells[0].full_date, ymd(2025, 12, 1));
        assert_eq!(cells[34].full_date, ymd(2026, 1, 4));
        assert!(!cells[34].current);
        assert_eq!(cells[34].label, "SUN");
    }

    #[test]
    fn test_month_grid_january_leads_with_december() {
        // Jan 1, 2026 is a Thursday.
        let cells = generate_grid(ViewMode::Month, ymd(2026, 1, 20), ymd(2000, 1, 1));
        assert_eq!(cells[0].full_date, ymd(2025, 12, 29));
        assert!(!cells[0].current);
        assert_eq!(cells[3].full_date, ymd(2026, 1, 1));
        assert_eq!(cells[3].label, "THU");
        assert!(cells[3].current);
    }

    #[test]
    fn test_month_grid_february_leap_and_common() {
        let leap = generate_grid(ViewMode::Month, ymd(2024, 2, 1), ymd(2000, 1, 1));
        assert!(leap.iter().any(|c| c.full_date == ymd(2024, 2, 29) && c.current));

        let common = generate_grid(ViewMode::Month, ymd(2023, 2, 1), ymd(2000, 1, 1));
        assert!(common.iter().all(|c| !(c.full_date.month() == 2 && c.date == 29)));
        assert_eq!(common.iter().filter(|c| c.current).count(), 28);
    }

    #[test]
    fn test_month_grid_exact_four_weeks() {
        // Feb 2021 starts on a Monday and has 28 days.
        let cells = generate_grid(ViewMode::Month, ymd(2021, 2, 10), ymd(2000, 1, 1));
        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.current));
    }

    #[test]
    fn test_spillover_today_is_not_highlighted() {
        let cells = generate_grid(ViewMode::Month, ymd(2025, 12, 1), ymd(2026, 1, 2));
        let spill = cells.iter().find(|c| c.full_date == ymd(2026, 1, 2)).unwrap();
        assert!(spill.today);
        assert!(!spill.highlight);
    }

    #[test]
    fn test_navigation_month_keeps_day_of_month() {
        let mut nav = CalendarNavigator::new(ViewMode::Month, ymd(2025, 11, 15));
        nav.next();
        assert_eq!(nav.anchor(), ymd(2025, 12, 15));
        nav.next();
        assert_eq!(nav.anchor(), ymd(2026, 1, 15));
        nav.prev();
        nav.prev();
        assert_eq!(nav.anchor(), ymd(2025, 11, 15));
    }

    #[test]
    fn test_navigation_month_end_round_trip_keeps_period() {
        let mut nav = CalendarNavigator::new(ViewMode::Month, ymd(2024, 1, 31));
        let before = nav.period_start();
        nav.next();
        assert_eq!(nav.anchor(), ymd(2024, 2, 29));
        nav.prev();
        assert_eq!(nav.period_start(), before);
    }

    #[test]
    fn test_navigation_week_and_day() {
        let mut nav = CalendarNavigator::new(ViewMode::Week, ymd(2025, 12, 31));
        nav.next();
        assert_eq!(nav.anchor(), ymd(2026, 1, 5));
        nav.prev();
        assert_eq!(nav.period_start(), ymd(2025, 12, 29));

        nav.set_view(ViewMode::Day);
        nav.next();
        assert_eq!(nav.anchor(), ymd(2026, 1, 1));
        nav.go_to_today(ymd(2026, 3, 3));
        assert_eq!(nav.anchor(), ymd(2026, 3, 3));
    }

    #[test]
    fn test_day_view_keeps_week_anchor() {
        let mut nav = CalendarNavigator::new(ViewMode::Week, ymd(2026, 10, 19));
        nav.show_day(ymd(2026, 10, 22));
        assert_eq!(nav.label(), "Thursday, October 22, 2026");
        nav.next();
        assert_eq!(nav.selected(), ymd(2026, 10, 23));

        nav.set_view(ViewMode::Week);
        assert_eq!(nav.anchor(), ymd(2026, 10, 19));
        assert_eq!(nav.cells(ymd(2026, 10, 19)).len(), 7);
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(period_label(ViewMode::Month, ymd(2026, 10, 19)), "October 2026");
        assert_eq!(
            period_label(ViewMode::Week, ymd(2026, 10, 21)),
            "October 19-25, 2026"
        );
        assert_eq!(
            period_label(ViewMode::Week, ymd(2025, 12, 31)),
            "Dec 29 - Jan 4, 2026"
        );
        assert_eq!(
            period_label(ViewMode::Day, ymd(2026, 10, 19)),
            "Monday, October 19, 2026"
        );
    }

    #[test]
    fn test_cell_index() {
        let cells = generate_grid(ViewMode::Week, ymd(2025, 3, 12), ymd(2025, 3, 12));
        assert_eq!(cell_index(&cells, ymd(2025, 3, 16)), Some(6));
        assert_eq!(cell_index(&cells, ymd(2025, 3, 17)), None);
    }
}
