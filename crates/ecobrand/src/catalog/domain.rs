use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::{
    EcoLetter, EcoScoreResult, EnvironmentalProfile, ImpactLevel, RawEnvironmentalProfile,
};

/// Identifier wrapper for catalog products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the account that uploaded or searched for products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product as entered through the admin form or a legacy import, before scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    #[serde(default)]
    pub profile: RawEnvironmentalProfile,
    #[serde(default, deserialize_with = "ingredient_list")]
    pub ingredients: Vec<String>,
}

/// Partial update. A supplied `profile` replaces the stored attributes wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    #[serde(default)]
    pub profile: Option<RawEnvironmentalProfile>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
}

/// Stored product. `eco` is derived from `profile` and recomputed whenever it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub analysis_date: NaiveDate,
    pub profile: EnvironmentalProfile,
    pub eco: EcoScoreResult,
    pub ingredients: Vec<String>,
    pub uploaded_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn eco_score(&self) -> Option<f64> {
        self.eco.score
    }

    pub fn eco_letter(&self) -> Option<EcoLetter> {
        self.eco.letter
    }

    pub fn impact_level(&self) -> Option<ImpactLevel> {
        self.profile.environmental_impact
    }
}

/// Products bucketed by their overall environmental impact rating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorizedProducts {
    pub low: Vec<ProductRecord>,
    pub moderate: Vec<ProductRecord>,
    pub high: Vec<ProductRecord>,
    pub uncategorized: usize,
}

/// Audit row written for every product search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub user_id: Option<UserId>,
    pub query: String,
    pub created_at: DateTime<Utc>,
    pub product_id: Option<ProductId>,
    pub searched_product_name: Option<String>,
    pub is_found: bool,
    pub eco_score: Option<f64>,
    pub eco_letter: Option<EcoLetter>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecomputeSummary {
    pub processed: usize,
    pub changed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub scored: usize,
    pub unscored: usize,
    pub skipped: usize,
}

/// Split a comma separated ingredient string, dropping blanks.
pub fn split_ingredients(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IngredientsInput {
    List(Vec<String>),
    Text(String),
}

fn ingredient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<IngredientsInput>::deserialize(deserializer)?;
    Ok(match input {
        Some(IngredientsInput::List(items)) => items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Some(IngredientsInput::Text(text)) => split_ingredients(&text),
        None => Vec::new(),
    })
}
