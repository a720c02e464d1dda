use crate::core::catalog::interactions::InteractionMatrix;
use crate::core::catalog::library::CompoundLibrary;
use crate::core::models::curve::CurveKind;
use crate::core::models::profile::UserProfile;
use crate::core::models::stack::Stack;
use crate::core::response::evaluator::{ResponseMeta, evaluate_response};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use super::synergy::pairwise_deltas;

/// Personalized benefit/risk reading for one compound in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompoundScore {
    pub benefit: f64,
    pub risk: f64,
    pub benefit_ci: f64,
    pub risk_ci: f64,
    pub meta: ResponseMeta,
}

/// Aggregate metrics for a whole stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StackTotals {
    pub total_benefit: f64,
    pub total_risk: f64,
    pub benefit_synergy_delta: f64,
    pub risk_synergy_delta: f64,
    pub adjusted_benefit: f64,
    pub adjusted_risk: f64,
    pub benefit_risk_ratio: f64,
    pub net_score: f64,
}

/// The result of evaluating a stack against a profile.
///
/// Derived fresh on every call; callers that want memoization key it by an
/// explicit input signature (see [`crate::engine::cache`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackEvaluation {
    pub totals: StackTotals,
    pub by_compound: BTreeMap<String, CompoundScore>,
}

/// Evaluates a stack: per-compound personalized responses, totals, synergy
/// deltas, benefit:risk ratio, and the headline net score.
///
/// Unknown compound ids and malformed (negative or non-finite) doses are
/// excluded from aggregation rather than aborting the evaluation; the
/// remaining stack still produces a usable result. An effectively empty
/// stack returns `None` so callers can distinguish "no stack" from "a stack
/// that nets to zero".
///
/// The function is pure: identical `(stack, profile)` inputs always produce
/// bit-identical outputs. Entries are aggregated in compound-id order, so
/// floating-point accumulation does not depend on insertion order.
pub fn evaluate_stack(
    library: &CompoundLibrary,
    matrix: &InteractionMatrix,
    stack: &Stack,
    profile: &UserProfile,
) -> Option<StackEvaluation> {
    let mut by_compound = BTreeMap::new();

    for entry in stack.entries() {
        if !entry.dose.is_finite() || entry.dose < 0.0 {
            warn!(
                compound = entry.compound.as_str(),
                dose = entry.dose,
                "Excluding stack entry with malformed dose from aggregation."
            );
            continue;
        }
        let Some(compound) = library.get(&entry.compound) else {
            warn!(
                compound = entry.compound.as_str(),
                "Skipping unknown compound in stack evaluation."
            );
            continue;
        };

        let benefit = evaluate_response(compound, CurveKind::Benefit, entry.dose, profile);
        let risk = evaluate_response(compound, CurveKind::Risk, entry.dose, profile);
        by_compound.insert(
            entry.compound.clone(),
            CompoundScore {
                benefit: benefit.value,
                risk: risk.value,
                benefit_ci: benefit.ci,
                risk_ci: risk.ci,
                meta: benefit.meta,
            },
        );
    }

    if by_compound.is_empty() {
        return None;
    }

    let total_benefit: f64 = by_compound.values().map(|s| s.benefit).sum();
    let total_risk: f64 = by_compound.values().map(|s| s.risk).sum();

    let deltas = pairwise_deltas(matrix, &by_compound);
    let adjusted_benefit = (total_benefit + deltas.benefit).max(0.0);
    let adjusted_risk = (total_risk + deltas.risk).max(0.0);

    let benefit_risk_ratio = if adjusted_risk > 0.0 {
        adjusted_benefit / adjusted_risk
    } else {
        adjusted_benefit
    };

    Some(StackEvaluation {
        totals: StackTotals {
            total_benefit,
            total_risk,
            benefit_synergy_delta: deltas.benefit,
            risk_synergy_delta: deltas.risk,
            adjusted_benefit,
            adjusted_risk,
            benefit_risk_ratio,
            net_score: adjusted_benefit - adjusted_risk,
        },
        by_compound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::compound::{
        AdministrationType, CompoundDefinition, CompoundFlags,
    };
    use crate::core::models::curve::{CurveSample, ResponseCurve};
    use crate::core::models::interaction::{InteractionRecord, SynergyRating};
    use crate::core::models::profile::{Experience, LabMode, LabScales, Tendency};
    use crate::core::models::stack::StackEntry;
    use std::collections::BTreeMap as Map;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn curve(points: &[(f64, f64, f64)]) -> ResponseCurve {
        ResponseCurve::new(
            points
                .iter()
                .map(|&(dose, value, ci)| CurveSample { dose, value, ci })
                .collect(),
        )
        .unwrap()
    }

    fn compound(name: &str, benefit: &[(f64, f64, f64)], risk: &[(f64, f64, f64)]) -> CompoundDefinition {
        CompoundDefinition {
            name: name.to_string(),
            administration: AdministrationType::Injectable,
            bioavailability: 1.0,
            binding_affinity: Some(1.0),
            toxicity_tier: 1,
            suppressive_factor: 0.0,
            half_life_hours: None,
            default_ester: None,
            default_frequency: None,
            esters: Map::new(),
            flags: CompoundFlags::default(),
            benefit_curve: curve(benefit),
            risk_curve: curve(risk),
        }
    }

    fn library() -> CompoundLibrary {
        CompoundLibrary::from_definitions(vec![
            (
                "alpha".to_string(),
                compound(
                    "Alpha",
                    &[(0.0, 0.0, 0.0), (500.0, 3.0, 0.2), (1000.0, 4.0, 0.4)],
                    &[(0.0, 0.0, 0.0), (500.0, 1.0, 0.2), (1000.0, 2.5, 0.4)],
                ),
            ),
            (
                "beta".to_string(),
                compound(
                    "Beta",
                    &[(0.0, 0.0, 0.0), (400.0, 2.0, 0.2), (800.0, 3.0, 0.4)],
                    &[(0.0, 0.0, 0.0), (400.0, 0.5, 0.2), (800.0, 1.5, 0.4)],
                ),
            ),
        ])
    }

    fn synergy_matrix() -> InteractionMatrix {
        InteractionMatrix::from_records(vec![(
            "alpha".to_string(),
            "beta".to_string(),
            InteractionRecord {
                benefit_synergy: 0.1,
                risk_synergy: 0.1,
                rating: SynergyRating::Good,
            },
        )])
        .unwrap()
    }

    fn neutral_profile() -> UserProfile {
        UserProfile {
            age: 35.0,
            bodyweight: 85.0,
            years_training: 3.0,
            shbg: Some(30.0),
            aromatase: Tendency::Moderate,
            anxiety: Tendency::Moderate,
            experience: Experience::MultiCompound,
            lab_mode: LabMode {
                enabled: true,
                scales: LabScales {
                    age: 0.0,
                    training: 0.0,
                    shbg: 0.0,
                    aromatase: 0.0,
                    anxiety: 0.0,
                    experience: 0.0,
                    uncertainty: 1.0,
                },
            },
        }
    }

    fn stack(entries: Vec<StackEntry>) -> Stack {
        Stack::from_entries(entries).unwrap()
    }

    #[test]
    fn empty_stack_yields_no_result() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &Stack::new(),
            &neutral_profile(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn single_compound_baseline_matches_the_curve_sample() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &stack(vec![StackEntry::new("alpha", 500.0)]),
            &neutral_profile(),
        )
        .unwrap();

        assert!(f64_approx_equal(result.totals.total_benefit, 3.0));
        assert!(f64_approx_equal(result.totals.benefit_synergy_delta, 0.0));
        assert!(f64_approx_equal(result.totals.risk_synergy_delta, 0.0));
        assert!(f64_approx_equal(result.totals.net_score, 2.0));
    }

    #[test]
    fn synergistic_pair_adjusts_by_the_fractional_amount() {
        let result = evaluate_stack(
            &library(),
            &synergy_matrix(),
            &stack(vec![
                StackEntry::new("alpha", 500.0),
                StackEntry::new("beta", 400.0),
            ]),
            &neutral_profile(),
        )
        .unwrap();

        let totals = result.totals;
        assert!(f64_approx_equal(totals.total_benefit, 5.0));
        assert!(f64_approx_equal(totals.total_risk, 1.5));
        // 10% of the pair's combined contribution, in each dimension.
        assert!(f64_approx_equal(totals.benefit_synergy_delta, 0.5));
        assert!(f64_approx_equal(totals.risk_synergy_delta, 0.15));
        assert!(totals.adjusted_benefit > totals.total_benefit);
        assert!(totals.adjusted_risk > totals.total_risk);
        assert!(f64_approx_equal(totals.adjusted_benefit, 5.5));
        assert!(f64_approx_equal(totals.adjusted_risk, 1.65));
    }

    #[test]
    fn unknown_compound_is_skipped_not_fatal() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &stack(vec![
                StackEntry::new("alpha", 500.0),
                StackEntry::new("ghost", 500.0),
            ]),
            &neutral_profile(),
        )
        .unwrap();

        assert_eq!(result.by_compound.len(), 1);
        assert!(f64_approx_equal(result.totals.total_benefit, 3.0));
    }

    #[test]
    fn malformed_doses_are_excluded() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &stack(vec![
                StackEntry::new("alpha", f64::NAN),
                StackEntry::new("beta", -100.0),
            ]),
            &neutral_profile(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn totals_never_contain_nan() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &stack(vec![
                StackEntry::new("alpha", f64::INFINITY),
                StackEntry::new("beta", 400.0),
            ]),
            &neutral_profile(),
        )
        .unwrap();
        assert!(result.totals.total_benefit.is_finite());
        assert!(result.totals.net_score.is_finite());
    }

    #[test]
    fn zero_risk_ratio_falls_back_to_the_numerator() {
        let lib = CompoundLibrary::from_definitions(vec![(
            "safe".to_string(),
            compound(
                "Safe",
                &[(0.0, 0.0, 0.0), (100.0, 2.0, 0.1)],
                &[(0.0, 0.0, 0.0), (100.0, 0.0, 0.1)],
            ),
        )]);
        let result = evaluate_stack(
            &lib,
            &InteractionMatrix::default(),
            &stack(vec![StackEntry::new("safe", 100.0)]),
            &neutral_profile(),
        )
        .unwrap();
        assert!(f64_approx_equal(result.totals.benefit_risk_ratio, 2.0));
    }

    #[test]
    fn evaluation_is_deterministic_and_order_independent() {
        let lib = library();
        let matrix = synergy_matrix();
        let profile = UserProfile::default();

        let forward = evaluate_stack(
            &lib,
            &matrix,
            &stack(vec![
                StackEntry::new("alpha", 500.0),
                StackEntry::new("beta", 400.0),
            ]),
            &profile,
        )
        .unwrap();
        let reversed = evaluate_stack(
            &lib,
            &matrix,
            &stack(vec![
                StackEntry::new("beta", 400.0),
                StackEntry::new("alpha", 500.0),
            ]),
            &profile,
        )
        .unwrap();
        let repeated = evaluate_stack(
            &lib,
            &matrix,
            &stack(vec![
                StackEntry::new("alpha", 500.0),
                StackEntry::new("beta", 400.0),
            ]),
            &profile,
        )
        .unwrap();

        assert_eq!(forward, reversed);
        assert_eq!(forward, repeated);
        assert_eq!(
            forward.totals.net_score.to_bits(),
            repeated.totals.net_score.to_bits()
        );
    }

    #[test]
    fn beyond_evidence_doses_are_flagged_per_compound() {
        let result = evaluate_stack(
            &library(),
            &InteractionMatrix::default(),
            &stack(vec![StackEntry::new("alpha", 5000.0)]),
            &neutral_profile(),
        )
        .unwrap();
        let score = &result.by_compound["alpha"];
        assert!(score.meta.beyond_evidence);
        assert!(score.meta.nearing_plateau);
    }

    #[test]
    fn negative_risk_synergy_floors_at_zero() {
        let matrix = InteractionMatrix::from_records(vec![(
            "alpha".to_string(),
            "beta".to_string(),
            InteractionRecord {
                benefit_synergy: 0.0,
                risk_synergy: -1.0,
                rating: SynergyRating::Excellent,
            },
        )])
        .unwrap();
        let lib = CompoundLibrary::from_definitions(vec![
            (
                "alpha".to_string(),
                compound(
                    "Alpha",
                    &[(0.0, 0.0, 0.0), (500.0, 3.0, 0.2)],
                    &[(0.0, 0.5, 0.0), (500.0, 0.5, 0.2)],
                ),
            ),
            (
                "beta".to_string(),
                compound(
                    "Beta",
                    &[(0.0, 0.0, 0.0), (400.0, 2.0, 0.2)],
                    &[(0.0, 0.5, 0.0), (400.0, 0.5, 0.2)],
                ),
            ),
        ]);
        let result = evaluate_stack(
            &lib,
            &matrix,
            &stack(vec![
                StackEntry::new("alpha", 500.0),
                StackEntry::new("beta", 400.0),
            ]),
            &neutral_profile(),
        )
        .unwrap();
        // risk delta -1.0 * (0.5 + 0.5) = -1.0 fully cancels the 1.0 total.
        assert!(f64_approx_equal(result.totals.adjusted_risk, 0.0));
        assert!(result.totals.adjusted_risk >= 0.0);
    }
}
