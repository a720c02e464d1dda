use serde::{Deserialize, Serialize};

/// Categorical intensity of a physiological tendency (aromatization rate,
/// anxiety sensitivity). An enum rather than a string key, so an
/// unrecognized category is a deserialization error instead of a silent
/// missing-lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tendency {
    Low,
    Moderate,
    High,
}

impl Tendency {
    /// Signed shift applied to estrogenic risk bands.
    pub fn aromatase_shift(&self) -> f64 {
        match self {
            Tendency::Low => -0.2,
            Tendency::Moderate => 0.0,
            Tendency::High => 0.35,
        }
    }

    /// Signed shift applied to neurological risk ramp.
    pub fn anxiety_shift(&self) -> f64 {
        match self {
            Tendency::Low => -0.1,
            Tendency::Moderate => 0.0,
            Tendency::High => 0.35,
        }
    }
}

/// Prior compound exposure, from complete novice to long-term veteran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    None,
    SingleCompound,
    MultiCompound,
    Veteran,
}

/// Fractional benefit/risk adjustment attached to an experience tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperienceImpact {
    pub benefit: f64,
    pub risk: f64,
}

impl Experience {
    /// Novices respond harder but carry more risk; veterans are partially
    /// desensitized with near-neutral risk.
    pub fn impact(&self) -> ExperienceImpact {
        match self {
            Experience::None => ExperienceImpact {
                benefit: 0.18,
                risk: 0.35,
            },
            Experience::SingleCompound => ExperienceImpact {
                benefit: 0.08,
                risk: 0.15,
            },
            Experience::MultiCompound => ExperienceImpact {
                benefit: -0.05,
                risk: -0.05,
            },
            Experience::Veteran => ExperienceImpact {
                benefit: -0.12,
                risk: 0.0,
            },
        }
    }
}

/// The named personalization factors a lab-mode override can scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleFactor {
    Age,
    Training,
    Shbg,
    Aromatase,
    Anxiety,
    Experience,
    Uncertainty,
}

/// Multiplicative coefficients, one per personalization factor.
///
/// Each defaults to 1.0 (the factor's documented effect applies unscaled);
/// 0.0 disables a factor entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabScales {
    pub age: f64,
    pub training: f64,
    pub shbg: f64,
    pub aromatase: f64,
    pub anxiety: f64,
    pub experience: f64,
    pub uncertainty: f64,
}

impl Default for LabScales {
    fn default() -> Self {
        Self {
            age: 1.0,
            training: 1.0,
            shbg: 1.0,
            aromatase: 1.0,
            anxiety: 1.0,
            experience: 1.0,
            uncertainty: 1.0,
        }
    }
}

impl LabScales {
    pub fn get(&self, factor: ScaleFactor) -> f64 {
        match factor {
            ScaleFactor::Age => self.age,
            ScaleFactor::Training => self.training,
            ScaleFactor::Shbg => self.shbg,
            ScaleFactor::Aromatase => self.aromatase,
            ScaleFactor::Anxiety => self.anxiety,
            ScaleFactor::Experience => self.experience,
            ScaleFactor::Uncertainty => self.uncertainty,
        }
    }
}

/// Optional manual coefficient overrides. When disabled, every factor scales
/// at the 1.0 default regardless of the stored coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabMode {
    pub enabled: bool,
    pub scales: LabScales,
}

/// Physiological and behavioral inputs to personalization.
///
/// Owned and persisted by an external profile-management collaborator; the
/// engine only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserProfile {
    pub age: f64,
    pub bodyweight: f64,
    pub years_training: f64,
    pub shbg: Option<f64>,
    pub aromatase: Tendency,
    pub anxiety: Tendency,
    pub experience: Experience,
    pub lab_mode: LabMode,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 30.0,
            bodyweight: 90.0,
            years_training: 5.0,
            shbg: Some(30.0),
            aromatase: Tendency::Moderate,
            anxiety: Tendency::Moderate,
            experience: Experience::SingleCompound,
            lab_mode: LabMode::default(),
        }
    }
}

impl UserProfile {
    /// The effective coefficient for a personalization factor: the lab-mode
    /// override when enabled, otherwise 1.0.
    pub fn scale(&self, factor: ScaleFactor) -> f64 {
        if self.lab_mode.enabled {
            self.lab_mode.scales.get(factor)
        } else {
            1.0
        }
    }
}
