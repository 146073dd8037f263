use std::io::Read;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::normalizer::normalize_name;
use crate::catalog::domain::{split_ingredients, ProductDraft};
use crate::scoring::{MeasurementInput, RawEnvironmentalProfile};

/// Parse every row of a legacy export, returning the rows that carry a product name.
pub(crate) fn parse_drafts<R: Read>(reader: R) -> Result<LegacyExport, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut export = LegacyExport::default();

    for record in csv_reader.deserialize::<LegacyRow>() {
        let row = record?;
        match row.into_draft() {
            Some(draft) => export.drafts.push(draft),
            None => export.nameless_rows += 1,
        }
    }

    Ok(export)
}

/// Drafts read from an export, plus the count of rows dropped for lacking a product name.
#[derive(Debug, Default)]
pub struct LegacyExport {
    pub drafts: Vec<ProductDraft>,
    pub nameless_rows: usize,
}

#[derive(Debug, Deserialize)]
struct LegacyRow {
    #[serde(rename = "ProductName", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(
        rename = "ProductImageURL",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    image_url: Option<String>,
    #[serde(rename = "AnalysisDate", default, deserialize_with = "empty_string_as_none")]
    analysis_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    carbon_footprint: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    water_consumption: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    energy_usage: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    waste_pollution: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    chemical_usage: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    recyclability: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    environmental_impact: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sustainability_level: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ingredients: Option<String>,
}

impl LegacyRow {
    fn into_draft(self) -> Option<ProductDraft> {
        let name = normalize_name(self.name.as_deref()?);
        if name.is_empty() {
            return None;
        }

        let profile = RawEnvironmentalProfile {
            carbon_footprint_kg: self.carbon_footprint.map(MeasurementInput::from),
            water_consumption_liters: self.water_consumption.map(MeasurementInput::from),
            energy_usage_kwh: self.energy_usage.map(MeasurementInput::from),
            waste_pollution_level: self.waste_pollution,
            chemical_usage_level: self.chemical_usage,
            recyclability_level: self.recyclability,
            environmental_impact_level: self.environmental_impact,
            sustainability_level: self.sustainability_level,
        };

        Some(ProductDraft {
            name,
            category: self.category.unwrap_or_default(),
            image_url: self.image_url,
            analysis_date: self.analysis_date.as_deref().and_then(parse_date),
            profile,
            ingredients: self
                .ingredients
                .as_deref()
                .map(split_ingredients)
                .unwrap_or_default(),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}
