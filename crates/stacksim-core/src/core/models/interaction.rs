use crate::core::utils::ratings::{RatingDisplay, display_for};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Qualitative compatibility rating for a compound pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynergyRating {
    Excellent,
    Good,
    Compatible,
    Caution,
    Dangerous,
    Forbidden,
}

impl SynergyRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynergyRating::Excellent => "excellent",
            SynergyRating::Good => "good",
            SynergyRating::Compatible => "compatible",
            SynergyRating::Caution => "caution",
            SynergyRating::Dangerous => "dangerous",
            SynergyRating::Forbidden => "forbidden",
        }
    }

    pub(crate) fn display(&self) -> &'static RatingDisplay {
        display_for(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown synergy rating '{0}'")]
pub struct UnknownRating(pub String);

impl FromStr for SynergyRating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(SynergyRating::Excellent),
            "good" => Ok(SynergyRating::Good),
            "compatible" => Ok(SynergyRating::Compatible),
            "caution" => Ok(SynergyRating::Caution),
            "dangerous" => Ok(SynergyRating::Dangerous),
            "forbidden" => Ok(SynergyRating::Forbidden),
            other => Err(UnknownRating(other.to_string())),
        }
    }
}

/// Pairwise synergy record for an unordered compound pair.
///
/// Both synergies are fractions in [-1, 1], interpreted as adjustments
/// relative to the pair's combined base contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub benefit_synergy: f64,
    pub risk_synergy: f64,
    pub rating: SynergyRating,
}

/// A displayable projection of a pair's interaction, never absent: pairs
/// without a record project to the neutral "compatible" score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayScore {
    pub rating: SynergyRating,
    pub symbol: &'static str,
    pub label: &'static str,
    pub weight: i8,
    pub benefit_synergy: f64,
    pub risk_synergy: f64,
}

impl DisplayScore {
    pub fn from_record(record: &InteractionRecord) -> Self {
        let display = record.rating.display();
        Self {
            rating: record.rating,
            symbol: display.symbol,
            label: display.label,
            weight: display.weight,
            benefit_synergy: record.benefit_synergy,
            risk_synergy: record.risk_synergy,
        }
    }

    pub fn neutral() -> Self {
        let display = SynergyRating::Compatible.display();
        Self {
            rating: SynergyRating::Compatible,
            symbol: display.symbol,
            label: display.label,
            weight: display.weight,
            benefit_synergy: 0.0,
            risk_synergy: 0.0,
        }
    }
}
