use serde::{Deserialize, Serialize};

/// Whether self-employment is the main occupation or a side activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OccupationStatus {
    Primary,
    Secondary,
}

impl OccupationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Self-employed as main occupation",
            Self::Secondary => "Self-employed as side activity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "primary" | "hoofdberoep" => Some(Self::Primary),
            "secondary" | "bijberoep" => Some(Self::Secondary),
            _ => None,
        }
    }
}
