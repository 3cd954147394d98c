//! Wheel entries and their slice colors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Slice fill colors, indexed by `color_index % PALETTE.len()`.
pub const PALETTE: [&str; 8] = [
    "#7aa2ff", // blue
    "#fbbf24", // amber
    "#4ade80", // green
    "#fb7185", // pink/red
    "#a78bfa", // purple
    "#22c55e", // bright green
    "#60a5fa", // light blue
    "#e879f9", // magenta
];

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WheelEntry {
    pub label: String,
    pub color_index: usize,
}

impl WheelEntry {
    pub fn new(label: impl Into<String>, color_index: usize) -> Self {
        Self {
            label: label.into(),
            color_index,
        }
    }

    pub fn color(&self) -> &'static str {
        PALETTE[self.color_index % PALETTE.len()]
    }
}

/// Entries in list order, colored by position.
pub fn entries_from_labels<I, S>(labels: I) -> Vec<WheelEntry>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| WheelEntry::new(label, i))
        .collect()
}
