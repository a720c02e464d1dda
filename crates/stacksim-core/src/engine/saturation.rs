use serde::Serialize;

// Adaptation phase boundaries as percentages of baseline capacity.
const SURGE_THRESHOLD_PCT: f64 = 100.0;
const STRAIN_THRESHOLD_PCT: f64 = 150.0;
const CEILING_THRESHOLD_PCT: f64 = 200.0;

// Phase 1 upregulates fast; phase 2 crawls; phase 3 is pinned.
const SURGE_RATE_PCT_PER_WEEK: f64 = 5.0;
const SURGE_MAX_UPREGULATION_PCT: f64 = 50.0;
const STRAIN_RATE_PCT_PER_WEEK: f64 = 1.5;
const STRAIN_MAX_UPREGULATION_PCT: f64 = 20.0;
const CEILING_RESIDUAL_RATE: f64 = 0.2;
const HARD_CEILING_FACTOR: f64 = 1.7;

// Spillover routing shares. The toxicity bucket is amplified because unbound
// hormone is disproportionately harmful, not because mass is created.
const IMMEDIATE_SHARE: f64 = 0.40;
const TOXICITY_SHARE: f64 = 0.35;
const TOXICITY_AMPLIFIER: f64 = 1.5;
const RETENTION_SHARE: f64 = 0.25;

/// The three regimes of capacity adaptation under sustained load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationPhase {
    /// 100-150% load: capacity upregulates fast.
    Surge,
    /// 150-200% load: upregulation continues at a crawl.
    Strain,
    /// >= 200% load: the hard ceiling; capacity is pinned.
    Ceiling,
}

impl AdaptationPhase {
    pub fn index(&self) -> u8 {
        match self {
            AdaptationPhase::Surge => 1,
            AdaptationPhase::Strain => 2,
            AdaptationPhase::Ceiling => 3,
        }
    }
}

/// Fixed-proportion decomposition of the spillover mass.
///
/// `immediate` is fast-acting overflow, `toxicity` the accumulative bucket
/// (already amplified), `retention` the anti-catabolic remainder. Removing
/// the amplification, the three buckets sum back to the spillover total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SpilloverRouting {
    pub immediate: f64,
    pub toxicity: f64,
    pub retention: f64,
}

/// Complete saturation metrics for one combined active dose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SaturationState {
    pub active_dose: f64,
    pub base_capacity: f64,
    pub capacity: f64,
    pub bound: f64,
    pub spillover: f64,
    pub efficiency_pct: f64,
    pub adaptation_phase: AdaptationPhase,
    pub adaptation_rate: f64,
    pub is_saturated: bool,
    pub is_hard_ceiling: bool,
    pub routed: SpilloverRouting,
}

/// Models diminishing returns as a capacity-vs-demand problem with
/// three adaptation phases.
///
/// Capacity upregulates with time under sustained above-baseline load:
/// +5%/week in the surge band (cumulative cap +50%), then +1.5%/week in the
/// strain band for weeks beyond the ten needed to complete the surge
/// (additional cap +20%). At or past 200% load the capacity is pinned at
/// 1.7x baseline regardless of dose or time. With zero weeks elapsed in the
/// first two bands, capacity stays at baseline.
///
/// Invariant: `bound + spillover == active_dose` and `bound <= capacity`.
pub fn calculate_saturation(
    active_dose: f64,
    base_capacity: f64,
    weeks_elapsed: f64,
) -> SaturationState {
    let active_dose = if active_dose.is_finite() {
        active_dose.max(0.0)
    } else {
        0.0
    };
    let weeks_elapsed = if weeks_elapsed.is_finite() {
        weeks_elapsed.max(0.0)
    } else {
        0.0
    };

    let load_pct = if base_capacity > 0.0 {
        active_dose / base_capacity * 100.0
    } else {
        0.0
    };

    let mut capacity = base_capacity;
    let mut adaptation_rate = 0.0;
    let mut adaptation_phase = AdaptationPhase::Surge;

    if active_dose > base_capacity {
        if (SURGE_THRESHOLD_PCT..STRAIN_THRESHOLD_PCT).contains(&load_pct) {
            adaptation_phase = AdaptationPhase::Surge;
            if weeks_elapsed > 0.0 {
                adaptation_rate = SURGE_RATE_PCT_PER_WEEK;
                let upregulation = (weeks_elapsed * SURGE_RATE_PCT_PER_WEEK)
                    .min(SURGE_MAX_UPREGULATION_PCT);
                capacity = base_capacity * (1.0 + upregulation / 100.0);
            }
        } else if (STRAIN_THRESHOLD_PCT..CEILING_THRESHOLD_PCT).contains(&load_pct) {
            adaptation_phase = AdaptationPhase::Strain;
            if weeks_elapsed > 0.0 {
                adaptation_rate = STRAIN_RATE_PCT_PER_WEEK;
                // The surge phase takes 10 weeks to deliver its full +50%;
                // only time past that contributes at the strain rate.
                let surge_weeks = SURGE_MAX_UPREGULATION_PCT / SURGE_RATE_PCT_PER_WEEK;
                let strain_weeks = (weeks_elapsed - surge_weeks).max(0.0);
                let upregulation =
                    (strain_weeks * STRAIN_RATE_PCT_PER_WEEK).min(STRAIN_MAX_UPREGULATION_PCT);
                capacity = base_capacity
                    * (1.0 + SURGE_MAX_UPREGULATION_PCT / 100.0 + upregulation / 100.0);
            }
        } else if load_pct >= CEILING_THRESHOLD_PCT {
            adaptation_phase = AdaptationPhase::Ceiling;
            adaptation_rate = CEILING_RESIDUAL_RATE;
            capacity = base_capacity * HARD_CEILING_FACTOR;
        }
    }

    let bound = active_dose.min(capacity);
    let spillover = (active_dose - capacity).max(0.0);
    let efficiency_pct = if active_dose > 0.0 {
        (capacity / active_dose * 100.0).round()
    } else {
        100.0
    };

    let is_hard_ceiling = adaptation_phase == AdaptationPhase::Ceiling;

    SaturationState {
        active_dose,
        base_capacity,
        capacity,
        bound,
        spillover,
        efficiency_pct,
        adaptation_phase,
        adaptation_rate,
        is_saturated: active_dose > capacity,
        is_hard_ceiling,
        routed: route_spillover(spillover),
    }
}

/// Splits spillover into its three weighted, mutually-exclusive buckets.
fn route_spillover(spillover: f64) -> SpilloverRouting {
    if spillover <= 0.0 {
        return SpilloverRouting::default();
    }
    SpilloverRouting {
        immediate: spillover * IMMEDIATE_SHARE,
        toxicity: spillover * TOXICITY_SHARE * TOXICITY_AMPLIFIER,
        retention: spillover * RETENTION_SHARE,
    }
}
