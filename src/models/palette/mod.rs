// Event colour palette
// Swatches offered when creating an event

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventColor {
    pub name: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

pub const EVENT_COLORS: [EventColor; 3] = [
    EventColor {
        name: "emerald",
        background: "#34d399",
        border: "#059669",
    },
    EventColor {
        name: "indigo",
        background: "#818cf8",
        border: "#3730a3",
    },
    EventColor {
        name: "orange",
        background: "#fb923c",
        border: "#ea580c",
    },
];

pub const DEFAULT_COLOR: EventColor = EVENT_COLORS[0];

/// Translucent variant of a palette background (hex + `20` alpha).
/// Unknown backgrounds fall back to the default swatch.
pub fn dimmed(background: &str) -> String {
    let swatch = EVENT_COLORS
        .iter()
        .find(|c| c.background.eq_ignore_ascii_case(background))
        .unwrap_or(&DEFAULT_COLOR);
    format!("{}20", swatch.background)
}

pub fn by_name(name: &str) -> Option<EventColor> {
    EVENT_COLORS
        .iter()
        .copied()
        .find(|c| c.name.eq_ignore_ascii_case(name))
}
