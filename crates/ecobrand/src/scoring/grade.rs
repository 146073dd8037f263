use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite scores are capped below the sub-score maximum.
pub const SCORE_CAP: f64 = 95.0;

/// Letter banding applied to the capped composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EcoLetter {
    A,
    B,
    C,
    D,
    E,
}

impl EcoLetter {
    pub const fn ordered() -> [Self; 5] {
        [Self::A, Self::B, Self::C, Self::D, Self::E]
    }

    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 75.0 {
            Self::B
        } else if score >= 55.0 {
            Self::C
        } else if score >= 30.0 {
            Self::D
        } else {
            Self::E
        }
    }

    /// Inclusive lower bound of the band.
    pub const fn lower_bound(self) -> f64 {
        match self {
            Self::A => 90.0,
            Self::B => 75.0,
            Self::C => 55.0,
            Self::D => 30.0,
            Self::E => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for EcoLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn cap(value: f64) -> f64 {
    value.clamp(0.0, SCORE_CAP)
}
