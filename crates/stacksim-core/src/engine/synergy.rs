use crate::core::catalog::interactions::InteractionMatrix;
use serde::Serialize;
use std::collections::BTreeMap;

use super::evaluator::CompoundScore;

/// Absolute synergy adjustments to a stack's benefit and risk totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SynergyDeltas {
    pub benefit: f64,
    pub risk: f64,
}

/// Converts each pair's stored synergy fractions into absolute deltas.
///
/// A record's fractions scale the pair's own combined base contribution, not
/// the aggregate stack totals: a +0.10 benefit synergy between A and B adds
/// 10% of (benefit_A + benefit_B). Pairs without a record contribute zero.
/// Iteration follows the id-sorted score map, so accumulation order (and
/// with it the floating-point result) is deterministic.
pub fn pairwise_deltas(
    matrix: &InteractionMatrix,
    scores: &BTreeMap<String, CompoundScore>,
) -> SynergyDeltas {
    let mut deltas = SynergyDeltas::default();
    let ids: Vec<&str> = scores.keys().map(String::as_str).collect();

    for i in 0..ids.len() {
        for j in i + 1..ids.len() {
            let (a, b) = (ids[i], ids[j]);
            let Some(record) = matrix.get(a, b) else {
                continue;
            };
            let (score_a, score_b) = (&scores[a], &scores[b]);
            deltas.benefit += record.benefit_synergy * (score_a.benefit + score_b.benefit);
            deltas.risk += record.risk_synergy * (score_a.risk + score_b.risk);
        }
    }
    deltas
}
