use serde::{Deserialize, Serialize};

/// Household category used by the unemployment-benefit rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilySituation {
    WithDependents,
    LivingAlone,
    Cohabiting,
}

impl FamilySituation {
    pub fn all() -> &'static [FamilySituation] {
        &[
            FamilySituation::WithDependents,
            FamilySituation::LivingAlone,
            FamilySituation::Cohabiting,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithDependents => "with-dependents",
            Self::LivingAlone => "living-alone",
            Self::Cohabiting => "cohabiting",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WithDependents => "Head of household with dependents",
            Self::LivingAlone => "Living alone",
            Self::Cohabiting => "Cohabiting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "with-dependents" | "gezinslast" => Some(Self::WithDependents),
            "living-alone" | "alleenwonend" => Some(Self::LivingAlone),
            "cohabiting" | "samenwonend" => Some(Self::Cohabiting),
            _ => None,
        }
    }
}
