//! Job status vocabulary and the keyword classifier that maps free-text
//! statuses onto it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A CSS color name or hex value used for markers and the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    pub const RED: Color = Color("red");
    pub const ORANGE: Color = Color("orange");
    pub const GOLD: Color = Color("gold");
    pub const GREEN: Color = Color("green");
    pub const GRAY: Color = Color("gray");
    /// Brand blue, used for anything the classifier doesn't recognise.
    pub const DEFAULT: Color = Color("#0b5394");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Canonical job state.
///
/// Variant order is display order (legend, KPIs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    Open,
    /// Work has started; the sheet says "Attended" or "In Progress".
    Attended,
    OnHold,
    Completed,
    Closed,
    Unknown,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Open,
        Status::Attended,
        Status::OnHold,
        Status::Completed,
        Status::Closed,
        Status::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Attended => "Attended",
            Self::OnHold => "On Hold",
            Self::Completed => "Completed",
            Self::Closed => "Closed",
            Self::Unknown => "Unknown",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Open => Color::RED,
            Self::Attended => Color::ORANGE,
            Self::OnHold => Color::GOLD,
            Self::Completed => Color::GREEN,
            Self::Closed => Color::GRAY,
            Self::Unknown => Color::DEFAULT,
        }
    }

    /// Parse a label as typed by a user ("open", "In Progress", "on_hold").
    ///
    /// Unlike [`classify`], this is strict: text that names no status
    /// returns `None` instead of `Unknown`.
    pub fn from_label(s: &str) -> Option<Status> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "open" => Some(Self::Open),
            "attended" | "inprogress" => Some(Self::Attended),
            "onhold" | "hold" => Some(Self::OnHold),
            "completed" => Some(Self::Completed),
            "closed" => Some(Self::Closed),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classifier rule: if the lower-cased status contains `keyword`,
/// the record is `status`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keyword: &'static str,
    pub status: Status,
}

/// Classifier rules in priority order; the first matching rule wins.
///
/// "open" is checked first so that "Reopened" stays open, and "closed" last
/// so that statuses like "Completed - not closed" read as completed.
pub const RULES: &[Rule] = &[
    Rule { keyword: "open", status: Status::Open },
    Rule { keyword: "attend", status: Status::Attended },
    Rule { keyword: "progress", status: Status::Attended },
    Rule { keyword: "hold", status: Status::OnHold },
    Rule { keyword: "complet", status: Status::Completed },
    Rule { keyword: "closed", status: Status::Closed },
];

/// Classify a raw status cell. Total: every input maps to exactly one status.
pub fn classify(raw: &str) -> (Status, Color) {
    let status = classify_status(raw);
    (status, status.color())
}

/// [`classify`] without the color.
pub fn classify_status(raw: &str) -> Status {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return Status::Unknown;
    }
    RULES
        .iter()
        .find(|rule| lowered.contains(rule.keyword))
        .map(|rule| rule.status)
        .unwrap_or(Status::Unknown)
}
