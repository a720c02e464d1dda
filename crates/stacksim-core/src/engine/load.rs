use crate::core::catalog::library::CompoundLibrary;
use crate::core::models::stack::Stack;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

// Weekly systemic load past this threshold drives the toxicity avalanche.
const TOXICITY_THRESHOLD_MG: f64 = 1200.0;
const TOXICITY_SCALE_MG: f64 = 1500.0;

// Receptor-affinity cutoff below which a compound's active mass counts
// double toward genomic load.
const VERY_STRONG_KD: f64 = 0.5;

// Stability penalty tuning: each day the injection interval overshoots the
// ester half-life adds 10% risk instability; volatile blends pinned under
// three times a week take a flat surcharge.
const INTERVAL_PENALTY_PER_DAY: f64 = 0.1;
const BLEND_PENALTY: f64 = 0.2;
const BLEND_MIN_FREQUENCY: f64 = 3.0;
const FALLBACK_HALF_LIFE_HOURS: f64 = 24.0;

/// Dose bookkeeping for one compound in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompoundLoad {
    /// Weekly-equivalent total in mg.
    pub weekly_dose: f64,
    /// Ester- and bioavailability-weighted active mass in mg/week.
    pub active_dose: f64,
    /// Mass lost to ester weight and first-pass metabolism.
    pub wasted_mg: f64,
    /// Risk instability multiplier from infrequent administration (1.0 =
    /// stable levels).
    pub stability_penalty: f64,
}

/// Stack-wide dose and toxicity figures feeding the saturation model and
/// the report.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SystemicLoad {
    /// Total weekly-equivalent mass across the stack.
    pub weekly_load: f64,
    /// Total active (ester/bioavailability-weighted) mass.
    pub active_load: f64,
    /// Affinity-weighted active mass: very strong binders count double.
    pub genomic_load: f64,
    pub wasted_mg: f64,
    /// Tier-weighted weekly oral mass (hepatic burden proxy).
    pub oral_toxicity_load: f64,
    /// Multiplier >= 1 once systemic load passes the avalanche threshold.
    pub toxicity_multiplier: f64,
    /// Strongest suppressive factor present in the stack.
    pub max_suppression: f64,
    pub by_compound: BTreeMap<String, CompoundLoad>,
}

/// Derives the stack's systemic-load metrics from catalog data.
///
/// Unknown compounds and malformed doses are skipped, mirroring the stack
/// evaluator's tolerance policy.
pub fn calculate_systemic_load(library: &CompoundLibrary, stack: &Stack) -> SystemicLoad {
    let mut load = SystemicLoad {
        toxicity_multiplier: 1.0,
        ..SystemicLoad::default()
    };

    for entry in stack.entries() {
        if !entry.dose.is_finite() || entry.dose < 0.0 {
            continue;
        }
        let Some(compound) = library.get(&entry.compound) else {
            warn!(
                compound = entry.compound.as_str(),
                "Skipping unknown compound in systemic load."
            );
            continue;
        };

        let weekly_dose = entry.dose * compound.administration.weekly_factor();
        let ester = compound.resolve_ester(entry.ester.as_deref());
        let weight = ester.map(|e| e.weight).unwrap_or(1.0);
        let bioavailability = ester
            .and_then(|e| e.bioavailability)
            .unwrap_or(compound.bioavailability);
        let active_dose = weekly_dose * weight * bioavailability;

        let stability_penalty = if compound.is_oral() {
            // Orals are assumed dosed daily; levels stay stable.
            1.0
        } else {
            let frequency = entry
                .frequency
                .or(compound.default_frequency)
                .filter(|f| *f > 0.0)
                .unwrap_or(1.0);
            let half_life_hours = ester
                .map(|e| e.half_life_hours)
                .or(compound.half_life_hours)
                .unwrap_or(FALLBACK_HALF_LIFE_HOURS);
            let half_life_days = half_life_hours / 24.0;
            let interval_days = 7.0 / frequency;

            let mut penalty = 1.0;
            if interval_days > half_life_days {
                penalty += (interval_days - half_life_days) * INTERVAL_PENALTY_PER_DAY;
            }
            if ester.map(|e| e.blend).unwrap_or(false) && frequency < BLEND_MIN_FREQUENCY {
                penalty += BLEND_PENALTY;
            }
            penalty
        };

        load.weekly_load += weekly_dose;
        load.active_load += active_dose;
        load.wasted_mg += weekly_dose - active_dose;
        if let Some(kd) = compound.binding_affinity {
            let genomic_weight = if kd <= VERY_STRONG_KD { 2.0 } else { 1.0 };
            load.genomic_load += active_dose * genomic_weight;
        }
        if compound.is_oral() {
            load.oral_toxicity_load += weekly_dose * f64::from(compound.toxicity_tier);
        }
        load.max_suppression = load.max_suppression.max(compound.suppressive_factor);

        load.by_compound.insert(
            entry.compound.clone(),
            CompoundLoad {
                weekly_dose,
                active_dose,
                wasted_mg: weekly_dose - active_dose,
                stability_penalty,
            },
        );
    }

    if load.weekly_load > TOXICITY_THRESHOLD_MG {
        let excess = load.weekly_load - TOXICITY_THRESHOLD_MG;
        load.toxicity_multiplier = 1.0 + (excess / TOXICITY_SCALE_MG).powf(1.5);
    }

    load
}
