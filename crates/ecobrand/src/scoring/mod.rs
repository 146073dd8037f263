//! Eco-score computation.
//!
//! Each environmental attribute is normalized into a 0–100 "goodness" sub-score. Sub-scores are
//! combined with fixed weights over whichever attributes are usable, rounded to two decimals,
//! capped at 95, and banded into an A–E letter. The computation is pure and total: missing or
//! malformed attributes drop out of the average, and a profile with nothing usable yields an
//! unscored result instead of an error.

mod curves;
mod grade;
pub mod levels;
pub mod profile;
mod weights;

pub use grade::{EcoLetter, SCORE_CAP};
pub use levels::{ChemicalUsage, ImpactLevel, RecyclabilityLevel, SustainabilityLevel};
pub use profile::{
    parse_measurement, EnvironmentalProfile, MeasurementInput, RawEnvironmentalProfile,
};
pub use weights::{EcoFactor, ScoreWeights};

use serde::{Deserialize, Serialize};

/// Composite score and letter. Both are `None` when no attribute was usable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EcoScoreResult {
    pub score: Option<f64>,
    pub letter: Option<EcoLetter>,
}

impl EcoScoreResult {
    pub const fn unscored() -> Self {
        Self {
            score: None,
            letter: None,
        }
    }

    /// Cap an already rounded composite and band it.
    pub fn from_composite(raw_score: f64) -> Self {
        let score = grade::cap(raw_score);
        Self {
            score: Some(score),
            letter: Some(EcoLetter::from_score(score)),
        }
    }

    pub const fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Weighted contribution of a single attribute, kept for audits and admin previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub factor: EcoFactor,
    pub score: f64,
    pub weight: u32,
    pub notes: String,
}

/// Full computation trail behind an [`EcoScoreResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoAssessment {
    #[serde(flatten)]
    pub result: EcoScoreResult,
    /// Weighted average before the cap.
    pub raw_score: Option<f64>,
    pub components: Vec<SubScore>,
    pub dropped: Vec<EcoFactor>,
}

/// Stateless engine applying a weight table to a typed profile.
#[derive(Debug, Clone, Default)]
pub struct EcoScoreEngine {
    weights: ScoreWeights,
}

impl EcoScoreEngine {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn standard() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn score(&self, profile: &EnvironmentalProfile) -> EcoScoreResult {
        self.assess(profile).result
    }

    pub fn assess(&self, profile: &EnvironmentalProfile) -> EcoAssessment {
        let mut components = Vec::new();
        let mut dropped = Vec::new();

        for factor in EcoFactor::ordered() {
            match sub_score(profile, factor) {
                Some((score, notes)) => components.push(SubScore {
                    factor,
                    score,
                    weight: self.weights.weight(factor),
                    notes,
                }),
                None => dropped.push(factor),
            }
        }

        let total_weight: u32 = components.iter().map(|component| component.weight).sum();
        if total_weight == 0 {
            return EcoAssessment {
                result: EcoScoreResult::unscored(),
                raw_score: None,
                components,
                dropped,
            };
        }

        let weighted: f64 = components
            .iter()
            .map(|component| component.score * f64::from(component.weight))
            .sum();
        let raw_score = grade::round_to_hundredths(weighted / f64::from(total_weight));

        EcoAssessment {
            result: EcoScoreResult::from_composite(raw_score),
            raw_score: Some(raw_score),
            components,
            dropped,
        }
    }
}

/// Score a legacy attribute bag with the standard weights.
pub fn compute_eco_score(raw: &RawEnvironmentalProfile) -> EcoScoreResult {
    EcoScoreEngine::standard().score(&raw.normalize())
}

fn sub_score(profile: &EnvironmentalProfile, factor: EcoFactor) -> Option<(f64, String)> {
    match factor {
        EcoFactor::CarbonFootprint => profile.carbon_footprint_kg.and_then(|kg| {
            curves::carbon(kg).map(|score| (score, format!("{kg} kg CO2e per unit")))
        }),
        EcoFactor::EnergyUsage => profile.energy_usage_kwh.and_then(|kwh| {
            curves::energy(kwh).map(|score| (score, format!("{kwh} kWh per unit")))
        }),
        EcoFactor::WaterConsumption => profile.water_consumption_liters.and_then(|liters| {
            curves::water(liters).map(|score| (score, format!("{liters} L per unit")))
        }),
        EcoFactor::Recyclability => profile
            .recyclability
            .map(|level| (level.sub_score(), format!("{} recyclability", level.label()))),
        EcoFactor::WastePollution => profile.waste_pollution.map(|level| {
            (
                level.sub_score(),
                format!("{} waste & pollution", level.label()),
            )
        }),
        EcoFactor::ChemicalUsage => profile
            .chemical_usage
            .map(|level| (level.sub_score(), format!("{} chemical usage", level.label()))),
        EcoFactor::EnvironmentalImpact => profile.environmental_impact.map(|level| {
            (
                level.sub_score(),
                format!("{} environmental impact", level.label()),
            )
        }),
        EcoFactor::Sustainability => profile
            .sustainability
            .map(|level| (level.sub_score(), format!("{} sustainability", level.label()))),
    }
}
