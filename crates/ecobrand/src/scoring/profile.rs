//! Environmental attribute bags accepted by the engine.
//!
//! `RawEnvironmentalProfile` is the lenient wire shape used by admin forms and legacy exports:
//! numbers may arrive as strings and ratings as free text, and a field of the wrong JSON type is
//! treated as absent instead of failing the whole payload. `normalize` turns it into the typed
//! `EnvironmentalProfile` the engine scores.

use super::levels::{ChemicalUsage, ImpactLevel, RecyclabilityLevel, SustainabilityLevel};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Typed, validated environmental attributes. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbon_footprint_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_consumption_liters: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_usage_kwh: Option<f64>,
    #[serde(
        rename = "wastePollutionLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub waste_pollution: Option<ImpactLevel>,
    #[serde(
        rename = "chemicalUsageLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub chemical_usage: Option<ChemicalUsage>,
    #[serde(
        rename = "recyclabilityLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub recyclability: Option<RecyclabilityLevel>,
    #[serde(
        rename = "environmentalImpactLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub environmental_impact: Option<ImpactLevel>,
    #[serde(
        rename = "sustainabilityLevel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sustainability: Option<SustainabilityLevel>,
}

impl EnvironmentalProfile {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A measurement as submitted: either a number or text with a leading numeric literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementInput {
    Number(f64),
    Text(String),
}

impl MeasurementInput {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => parse_measurement(text),
        }
    }
}

impl From<f64> for MeasurementInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MeasurementInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MeasurementInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Legacy/free-text attribute bag, keyed exactly as product forms submit it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnvironmentalProfile {
    #[serde(
        default,
        deserialize_with = "lenient_measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub carbon_footprint_kg: Option<MeasurementInput>,
    #[serde(
        default,
        deserialize_with = "lenient_measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub water_consumption_liters: Option<MeasurementInput>,
    #[serde(
        default,
        deserialize_with = "lenient_measurement",
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_usage_kwh: Option<MeasurementInput>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub waste_pollution_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub chemical_usage_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub recyclability_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub environmental_impact_level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sustainability_level: Option<String>,
}

impl RawEnvironmentalProfile {
    /// Parse measurements and match free-text ratings. Unusable values become `None`.
    pub fn normalize(&self) -> EnvironmentalProfile {
        EnvironmentalProfile {
            carbon_footprint_kg: usable_measurement(self.carbon_footprint_kg.as_ref()),
            water_consumption_liters: usable_measurement(self.water_consumption_liters.as_ref()),
            energy_usage_kwh: usable_measurement(self.energy_usage_kwh.as_ref()),
            waste_pollution: self
                .waste_pollution_level
                .as_deref()
                .and_then(ImpactLevel::from_free_text),
            chemical_usage: self
                .chemical_usage_level
                .as_deref()
                .and_then(ChemicalUsage::from_free_text),
            recyclability: self
                .recyclability_level
                .as_deref()
                .and_then(RecyclabilityLevel::from_free_text),
            environmental_impact: self
                .environmental_impact_level
                .as_deref()
                .and_then(ImpactLevel::from_free_text),
            sustainability: self
                .sustainability_level
                .as_deref()
                .and_then(SustainabilityLevel::from_free_text),
        }
    }
}

impl From<&EnvironmentalProfile> for RawEnvironmentalProfile {
    fn from(profile: &EnvironmentalProfile) -> Self {
        Self {
            carbon_footprint_kg: profile.carbon_footprint_kg.map(MeasurementInput::Number),
            water_consumption_liters: profile
                .water_consumption_liters
                .map(MeasurementInput::Number),
            energy_usage_kwh: profile.energy_usage_kwh.map(MeasurementInput::Number),
            waste_pollution_level: profile.waste_pollution.map(|l| l.label().to_string()),
            chemical_usage_level: profile.chemical_usage.map(|l| l.label().to_string()),
            recyclability_level: profile.recyclability.map(|l| l.label().to_string()),
            environmental_impact_level: profile
                .environmental_impact
                .map(|l| l.label().to_string()),
            sustainability_level: profile.sustainability.map(|l| l.label().to_string()),
        }
    }
}

fn usable_measurement(input: Option<&MeasurementInput>) -> Option<f64> {
    input
        .and_then(MeasurementInput::value)
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Strip everything except digits, `.` and `-`, then read the leading decimal literal.
pub fn parse_measurement(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    leading_literal(&stripped).and_then(|literal| literal.parse::<f64>().ok())
}

fn leading_literal(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - integer_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if fraction_end > fraction_start {
            digits += fraction_end - fraction_start;
            end = fraction_end;
        }
    }

    (digits > 0).then(|| &text[..end])
}

fn lenient_measurement<'de, D>(deserializer: D) -> Result<Option<MeasurementInput>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().map(MeasurementInput::Number),
        Some(Value::String(text)) => Some(MeasurementInput::Text(text)),
        _ => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}
