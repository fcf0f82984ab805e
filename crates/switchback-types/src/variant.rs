use serde::{Deserialize, Serialize};
use std::fmt;

/// Experiment arm a switchback window is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    Control,
    Treatment,
}

impl Variant {
    /// Returns both arms, control first
    pub fn all() -> &'static [Variant] {
        &[Variant::Control, Variant::Treatment]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Control => "Control",
            Variant::Treatment => "Treatment",
        }
    }

    /// Parse a variant name (case-insensitive)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "control" => Some(Variant::Control),
            "treatment" => Some(Variant::Treatment),
            _ => None,
        }
    }

    pub fn is_treatment(&self) -> bool {
        matches!(self, Variant::Treatment)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
