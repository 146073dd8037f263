//! Closed categorical ratings used by the engine.
//!
//! Free text only enters through `from_free_text`, which applies the legacy substring rules
//! (case-insensitive, first matching keyword wins). Everything downstream works with the enums.

use serde::{Deserialize, Serialize};

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// Shared low/moderate/high taxonomy for waste & pollution and overall environmental impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    #[serde(alias = "medium")]
    Moderate,
    High,
}

impl ImpactLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Moderate, Self::High]
    }

    pub fn from_free_text(raw: &str) -> Option<Self> {
        let text = raw.to_lowercase();
        if text.contains("low") {
            Some(Self::Low)
        } else if text.contains("high") {
            Some(Self::High)
        } else if contains_any(&text, &["medium", "moderate", "med"]) {
            Some(Self::Moderate)
        } else {
            None
        }
    }

    pub const fn sub_score(self) -> f64 {
        match self {
            Self::Low => 100.0,
            Self::Moderate => 60.0,
            Self::High => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalUsage {
    Minimal,
    Moderate,
    #[serde(alias = "high")]
    Severe,
}

impl ChemicalUsage {
    pub fn from_free_text(raw: &str) -> Option<Self> {
        let text = raw.to_lowercase();
        if text.contains("minimal") {
            Some(Self::Minimal)
        } else if text.contains("moderate") {
            Some(Self::Moderate)
        } else if contains_any(&text, &["severe", "high"]) {
            Some(Self::Severe)
        } else {
            None
        }
    }

    pub const fn sub_score(self) -> f64 {
        match self {
            Self::Minimal => 100.0,
            Self::Moderate => 60.0,
            Self::Severe => 0.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

/// Low recyclability floors at 20: material can still be recovered downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecyclabilityLevel {
    High,
    Medium,
    Low,
}

impl RecyclabilityLevel {
    pub fn from_free_text(raw: &str) -> Option<Self> {
        let text = raw.to_lowercase();
        if text.contains("high") {
            Some(Self::High)
        } else if text.contains("medium") {
            Some(Self::Medium)
        } else if text.contains("low") {
            Some(Self::Low)
        } else {
            None
        }
    }

    pub const fn sub_score(self) -> f64 {
        match self {
            Self::High => 100.0,
            Self::Medium => 60.0,
            Self::Low => 20.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SustainabilityLevel {
    High,
    #[serde(alias = "medium")]
    Moderate,
    Low,
}

impl SustainabilityLevel {
    pub fn from_free_text(raw: &str) -> Option<Self> {
        let text = raw.to_lowercase();
        if text.contains("high") {
            Some(Self::High)
        } else if contains_any(&text, &["medium", "moderate"]) {
            Some(Self::Moderate)
        } else if text.contains("low") {
            Some(Self::Low)
        } else {
            None
        }
    }

    pub const fn sub_score(self) -> f64 {
        match self {
            Self::High => 100.0,
            Self::Moderate => 60.0,
            Self::Low => 20.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Moderate => "Moderate",
            Self::Low => "Low",
        }
    }
}
