use serde::Serialize;

use super::domain::{CategorizedProducts, ProductRecord};
use crate::scoring::{EcoLetter, EcoScoreResult};

const NOT_AVAILABLE: &str = "N/A";

/// Badge colour for each letter band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoColor {
    Green,
    Lime,
    Amber,
    Orange,
    Red,
}

impl EcoColor {
    pub const fn for_letter(letter: EcoLetter) -> Self {
        match letter {
            EcoLetter::A => EcoColor::Green,
            EcoLetter::B => EcoColor::Lime,
            EcoLetter::C => EcoColor::Amber,
            EcoLetter::D => EcoColor::Orange,
            EcoLetter::E => EcoColor::Red,
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            EcoColor::Green => "#1b9e3e",
            EcoColor::Lime => "#8cc63f",
            EcoColor::Amber => "#f5b700",
            EcoColor::Orange => "#f28c28",
            EcoColor::Red => "#d7263d",
        }
    }
}

/// `"<int>/100"` for scored products, `"N/A"` otherwise.
pub fn eco_display(result: &EcoScoreResult) -> String {
    match result.score {
        Some(score) => format!("{}/100", score.trunc() as i64),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn display_or_na(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn label_or_na(label: Option<&'static str>) -> String {
    label.unwrap_or(NOT_AVAILABLE).to_string()
}

fn measurement_or_na(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{value} {unit}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Per-attribute display strings shown on the product detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorView {
    pub carbon_footprint: String,
    pub water_consumption: String,
    pub energy_usage: String,
    pub waste_pollution: String,
    pub chemical_usage: String,
    pub recyclability: String,
}

/// Product shaped for the storefront.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub category: String,
    pub date: String,
    pub eco: String,
    pub eco_score: Option<f64>,
    pub eco_letter: String,
    pub eco_color: Option<&'static str>,
    pub impact: String,
    pub sustain: String,
    pub factors: FactorView,
    pub ingredients: Vec<String>,
}

impl From<&ProductRecord> for ProductView {
    fn from(record: &ProductRecord) -> Self {
        let profile = &record.profile;
        Self {
            id: record.id.0.clone(),
            name: display_or_na(&record.name),
            image: record.image_url.clone(),
            category: display_or_na(&record.category),
            date: record.analysis_date.format("%Y-%m-%d").to_string(),
            eco: eco_display(&record.eco),
            eco_score: record.eco.score,
            eco_letter: label_or_na(record.eco.letter.map(EcoLetter::label)),
            eco_color: record
                .eco
                .letter
                .map(|letter| EcoColor::for_letter(letter).hex()),
            impact: label_or_na(profile.environmental_impact.map(|level| level.label())),
            sustain: label_or_na(profile.sustainability.map(|level| level.label())),
            factors: FactorView {
                carbon_footprint: measurement_or_na(profile.carbon_footprint_kg, "kg CO2e"),
                water_consumption: measurement_or_na(profile.water_consumption_liters, "L"),
                energy_usage: measurement_or_na(profile.energy_usage_kwh, "kWh"),
                waste_pollution: label_or_na(profile.waste_pollution.map(|level| level.label())),
                chemical_usage: label_or_na(profile.chemical_usage.map(|level| level.label())),
                recyclability: label_or_na(profile.recyclability.map(|level| level.label())),
            },
            ingredients: record.ingredients.clone(),
        }
    }
}

/// Compact card used by the "better alternatives" strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlternativeView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub eco_score: Option<f64>,
    pub eco_letter: Option<EcoLetter>,
    pub sustainability_level: Option<&'static str>,
    pub recyclability: Option<&'static str>,
}

impl From<&ProductRecord> for AlternativeView {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id.0.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            image: record.image_url.clone(),
            eco_score: record.eco.score,
            eco_letter: record.eco.letter,
            sustainability_level: record.profile.sustainability.map(|level| level.label()),
            recyclability: record.profile.recyclability.map(|level| level.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedView {
    pub low: Vec<ProductView>,
    pub moderate: Vec<ProductView>,
    pub high: Vec<ProductView>,
    pub uncategorized: usize,
}

impl From<&CategorizedProducts> for CategorizedView {
    fn from(categorized: &CategorizedProducts) -> Self {
        let views = |records: &[ProductRecord]| -> Vec<ProductView> {
            records.iter().map(ProductView::from).collect()
        };
        Self {
            low: views(&categorized.low),
            moderate: views(&categorized.moderate),
            high: views(&categorized.high),
            uncategorized: categorized.uncategorized,
        }
    }
}
