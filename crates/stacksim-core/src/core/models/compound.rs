use super::curve::ResponseCurve;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Route of administration, which also fixes the native dose unit:
/// injectables are dosed in mg/week, orals and ancillaries in mg/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrationType {
    Injectable,
    Oral,
    Ancillary,
}

impl AdministrationType {
    /// Factor converting a native-unit dose to a weekly equivalent.
    pub fn weekly_factor(&self) -> f64 {
        match self {
            AdministrationType::Injectable => 1.0,
            AdministrationType::Oral | AdministrationType::Ancillary => 7.0,
        }
    }

    /// Factor converting a native-unit dose to a daily equivalent.
    pub fn daily_factor(&self) -> f64 {
        match self {
            AdministrationType::Injectable => 1.0 / 7.0,
            AdministrationType::Oral | AdministrationType::Ancillary => 1.0,
        }
    }
}

/// Ester variant of an injectable compound.
///
/// `weight` is the active-hormone mass fraction of the esterified total;
/// `blend` marks multi-ester products whose release profile is volatile
/// under infrequent administration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EsterProfile {
    pub label: String,
    pub half_life_hours: f64,
    pub weight: f64,
    #[serde(default)]
    pub bioavailability: Option<f64>,
    #[serde(default)]
    pub blend: bool,
}

/// Behavior gates consumed by personalization, load metrics, and warnings.
///
/// `aromatization` is a fractional estrogen-conversion factor (0 means the
/// compound does not aromatize). The boolean gates replace the original
/// dataset's hard-coded compound-id lists so the engine depends only on
/// injected catalog data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompoundFlags {
    pub aromatization: f64,
    pub shbg_sensitive: bool,
    pub neuro_sensitive: bool,
    pub suppressive: bool,
    pub renal_toxic: bool,
    pub heavy_bp: bool,
}

/// Immutable reference data for a single compound.
///
/// Created at catalog-load time and never mutated. `binding_affinity` is a
/// dissociation constant relative to the reference binder (lower = stronger);
/// absence means the compound is effectively non-binding at the shared
/// receptor and competes only with a weak default affinity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundDefinition {
    pub name: String,
    pub administration: AdministrationType,
    pub bioavailability: f64,
    pub binding_affinity: Option<f64>,
    pub toxicity_tier: u8,
    pub suppressive_factor: f64,
    pub half_life_hours: Option<f64>,
    pub default_ester: Option<String>,
    pub default_frequency: Option<f64>,
    pub esters: BTreeMap<String, EsterProfile>,
    pub flags: CompoundFlags,
    pub benefit_curve: ResponseCurve,
    pub risk_curve: ResponseCurve,
}

impl CompoundDefinition {
    pub fn is_oral(&self) -> bool {
        self.administration == AdministrationType::Oral
    }

    /// Resolves the ester to use for a stack entry: the requested ester if it
    /// exists, otherwise the compound's default, otherwise none.
    pub fn resolve_ester(&self, requested: Option<&str>) -> Option<&EsterProfile> {
        requested
            .or(self.default_ester.as_deref())
            .and_then(|key| self.esters.get(key))
    }

    /// Where diminishing returns set in on the benefit curve.
    pub fn plateau_dose(&self) -> f64 {
        self.benefit_curve.plateau_dose()
    }

    /// The highest dose any of this compound's evidence covers; requests past
    /// this point are clamped and flagged as beyond evidence.
    pub fn evidence_ceiling(&self) -> f64 {
        self.benefit_curve
            .max_dose()
            .max(self.risk_curve.max_dose())
            .max(self.plateau_dose())
    }
}
