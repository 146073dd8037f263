use serde::{Deserialize, Serialize};

/// Attributes contributing to the composite eco-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EcoFactor {
    CarbonFootprint,
    EnergyUsage,
    WaterConsumption,
    Recyclability,
    WastePollution,
    ChemicalUsage,
    EnvironmentalImpact,
    Sustainability,
}

impl EcoFactor {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::CarbonFootprint,
            Self::EnergyUsage,
            Self::WaterConsumption,
            Self::Recyclability,
            Self::WastePollution,
            Self::ChemicalUsage,
            Self::EnvironmentalImpact,
            Self::Sustainability,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CarbonFootprint => "Carbon footprint",
            Self::EnergyUsage => "Energy usage",
            Self::WaterConsumption => "Water consumption",
            Self::Recyclability => "Recyclability",
            Self::WastePollution => "Waste & pollution",
            Self::ChemicalUsage => "Chemical usage",
            Self::EnvironmentalImpact => "Environmental impact",
            Self::Sustainability => "Sustainability",
        }
    }
}

/// Nominal weights; a factor's weight only counts when its sub-score is usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub carbon_footprint: u32,
    pub energy_usage: u32,
    pub water_consumption: u32,
    pub recyclability: u32,
    pub waste_pollution: u32,
    pub chemical_usage: u32,
    pub environmental_impact: u32,
    pub sustainability: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            carbon_footprint: 30,
            energy_usage: 20,
            water_consumption: 15,
            recyclability: 10,
            waste_pollution: 10,
            chemical_usage: 10,
            environmental_impact: 3,
            sustainability: 2,
        }
    }
}

impl ScoreWeights {
    pub const fn weight(&self, factor: EcoFactor) -> u32 {
        match factor {
            EcoFactor::CarbonFootprint => self.carbon_footprint,
            EcoFactor::EnergyUsage => self.energy_usage,
            EcoFactor::WaterConsumption => self.water_consumption,
            EcoFactor::Recyclability => self.recyclability,
            EcoFactor::WastePollution => self.waste_pollution,
            EcoFactor::ChemicalUsage => self.chemical_usage,
            EcoFactor::EnvironmentalImpact => self.environmental_impact,
            EcoFactor::Sustainability => self.sustainability,
        }
    }

    pub fn nominal_total(&self) -> u32 {
        EcoFactor::ordered()
            .into_iter()
            .map(|factor| self.weight(factor))
            .sum()
    }
}
