use crate::core::catalog::library::CompoundLibrary;
use crate::core::models::stack::Stack;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::warn;

/// Affinity assumed for compounds with no measured dissociation constant:
/// they still occupy capacity, but bind an order of magnitude weaker than
/// the reference compound.
const WEAK_DEFAULT_KD: f64 = 10.0;

/// Dissociation constant of the reference binder; binding efficiency is
/// expressed relative to it, so no compound can exceed 100%.
const REFERENCE_KD: f64 = 1.0;

const CAPACITY_EPSILON: f64 = 1e-9;

/// One compound's share of the contested capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceptorSegment {
    pub compound: String,
    pub name: String,
    /// Daily-equivalent demand in mg.
    pub demand: f64,
    pub bound: f64,
    pub spill: f64,
    /// Dissociation constant used for this compound.
    pub affinity: f64,
    /// 1 / affinity; higher binds first.
    pub binding_score: f64,
    /// True when capacity pressure (not intrinsic weakness) cost this
    /// compound binding it could otherwise have achieved.
    pub is_displaced: bool,
}

/// The competitive allocation of one finite capacity across a stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplacementState {
    /// Segments in service order: strongest binder first.
    pub segments: Vec<ReceptorSegment>,
    pub total_bound: f64,
    pub total_spill: f64,
    pub total_capacity: f64,
    pub is_saturated: bool,
    /// Human-readable summary naming the dominant and displaced compounds;
    /// present only when capacity was exhausted.
    pub displacement_note: Option<String>,
}

/// Allocates a finite daily binding capacity across competing compounds,
/// servicing the strongest binders first.
///
/// Doses are normalized to daily equivalents, compounds ranked descending by
/// binding score (ties broken by lexical compound id, so the ordering is
/// stable and deterministic), and capacity is consumed in a single fold that
/// threads the remaining amount forward. Binding efficiency is capped at the
/// reference binder's: a weak binder spills part of its demand even with
/// capacity to spare, and that alone does not count as displacement.
///
/// Invariants: the sum of bound amounts never exceeds `daily_capacity`, and
/// bound + spill equals demand for every compound.
pub fn calculate_receptor_state(
    library: &CompoundLibrary,
    stack: &Stack,
    daily_capacity: f64,
) -> DisplacementState {
    let mut contestants: Vec<ReceptorSegment> = Vec::with_capacity(stack.len());
    for entry in stack.entries() {
        if !entry.dose.is_finite() || entry.dose < 0.0 {
            continue;
        }
        let Some(compound) = library.get(&entry.compound) else {
            warn!(
                compound = entry.compound.as_str(),
                "Skipping unknown compound in receptor competition."
            );
            continue;
        };
        let demand = entry.dose * compound.administration.daily_factor();
        let affinity = compound
            .binding_affinity
            .filter(|kd| *kd > 0.0)
            .unwrap_or(WEAK_DEFAULT_KD);

        contestants.push(ReceptorSegment {
            compound: entry.compound.clone(),
            name: compound.name.clone(),
            demand,
            bound: 0.0,
            spill: 0.0,
            affinity,
            binding_score: 1.0 / affinity,
            is_displaced: false,
        });
    }

    // Strongest binder first; equal scores fall back to id order.
    contestants.sort_by(|a, b| {
        b.binding_score
            .partial_cmp(&a.binding_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.compound.cmp(&b.compound))
    });

    // Single linear scan threading the remaining capacity forward.
    let (segments, remaining) = contestants.into_iter().fold(
        (Vec::new(), daily_capacity),
        |(mut segments, remaining), mut segment| {
            let efficiency = (REFERENCE_KD / segment.affinity).min(1.0);
            let potential = segment.demand * efficiency;
            let bound = potential.min(remaining);

            segment.bound = bound;
            segment.spill = segment.demand - bound;
            segment.is_displaced = segment.spill > 0.0 && bound < potential;
            segments.push(segment);
            (segments, (remaining - bound).max(0.0))
        },
    );
    let total_bound: f64 = segments.iter().map(|s| s.bound).sum();
    let total_spill: f64 = segments.iter().map(|s| s.spill).sum();

    let is_saturated = remaining <= CAPACITY_EPSILON && !segments.is_empty();
    let displacement_note = if is_saturated {
        build_displacement_note(&segments)
    } else {
        None
    };

    DisplacementState {
        segments,
        total_bound,
        total_spill,
        total_capacity: daily_capacity,
        is_saturated,
        displacement_note,
    }
}

/// Names the strongest fully-bound competitor and the weakest displaced one.
fn build_displacement_note(segments: &[ReceptorSegment]) -> Option<String> {
    let victim = segments.iter().rev().find(|s| s.is_displaced)?;
    let bully = segments.iter().find(|s| {
        (s.bound - s.demand).abs() <= CAPACITY_EPSILON && s.binding_score > 1.0 / REFERENCE_KD
    });

    match bully {
        Some(bully) if bully.compound != victim.compound => Some(format!(
            "{} is displacing {}",
            bully.name, victim.name
        )),
        _ => Some(format!(
            "{} is being displaced by receptor saturation",
            victim.name
        )),
    }
}
