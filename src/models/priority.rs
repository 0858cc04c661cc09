use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Priority level of a watchlist item
///
/// Known levels are ordered `Low < Medium < High < Urgent`. Values outside
/// that set are kept verbatim as `Unknown` instead of being rejected, so a
/// stray value stored by an older client never blocks a pick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    Unknown(String),
}

impl Priority {
    /// Rank used for ordering lists, highest first. Unknown values sort last.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
            Priority::Unknown(_) => 0,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Priority::Unknown(_))
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LOW" => Priority::Low,
            "MEDIUM" => Priority::Medium,
            "HIGH" => Priority::High,
            "URGENT" => Priority::Urgent,
            _ => Priority::Unknown(raw),
        }
    }
}

impl From<&str> for Priority {
    fn from(raw: &str) -> Self {
        Priority::from(raw.to_string())
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.to_string()
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "LOW"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::High => write!(f, "HIGH"),
            Priority::Urgent => write!(f, "URGENT"),
            Priority::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Anything that can be handed to the drawer as a candidate
pub trait Prioritized {
    fn priority(&self) -> &Priority;
}

impl Prioritized for Priority {
    fn priority(&self) -> &Priority {
        self
    }
}
