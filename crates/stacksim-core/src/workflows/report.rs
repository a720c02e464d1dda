use crate::core::catalog::interactions::InteractionMatrix;
use crate::core::catalog::library::CompoundLibrary;
use crate::core::models::profile::UserProfile;
use crate::core::models::stack::Stack;
use crate::engine::cache::{SignatureCache, signature};
use crate::engine::config::EvaluationConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::{StackEvaluation, evaluate_stack};
use crate::engine::load::{SystemicLoad, calculate_systemic_load};
use crate::engine::receptor::{DisplacementState, calculate_receptor_state};
use crate::engine::saturation::{SaturationState, calculate_saturation};
use crate::engine::warnings::{StackWarning, collect_warnings};
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// The complete analysis of one stack against one profile.
///
/// Plain serializable data with no embedded behavior, so report and export
/// collaborators can render it without calling back into the engine.
/// `evaluation` is absent for an effectively empty stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackReport {
    pub evaluation: Option<StackEvaluation>,
    pub load: SystemicLoad,
    pub saturation: SaturationState,
    pub receptor: DisplacementState,
    pub warnings: Vec<StackWarning>,
}

/// Loads both reference-data files, failing fast on any configuration error.
pub fn load_reference_data(
    catalog_path: &Path,
    interactions_path: &Path,
) -> Result<(CompoundLibrary, InteractionMatrix), EngineError> {
    let library = CompoundLibrary::load(catalog_path)?;
    let matrix = InteractionMatrix::load(interactions_path)?;
    info!(
        compounds = library.len(),
        pairs = matrix.len(),
        "Reference data loaded."
    );
    Ok((library, matrix))
}

/// Produces the full stack report: evaluation, load metrics, saturation,
/// receptor competition, and warnings.
///
/// Pure given its inputs; identical arguments always produce identical
/// reports.
#[instrument(skip_all, name = "stack_report")]
pub fn run(
    library: &CompoundLibrary,
    matrix: &InteractionMatrix,
    stack: &Stack,
    profile: &UserProfile,
    config: &EvaluationConfig,
) -> StackReport {
    info!(entries = stack.len(), "Evaluating stack.");
    let evaluation = evaluate_stack(library, matrix, stack, profile);

    let load = calculate_systemic_load(library, stack);
    let saturation = calculate_saturation(
        load.active_load,
        config.saturation.base_capacity,
        config.saturation.weeks_elapsed,
    );
    let receptor = calculate_receptor_state(library, stack, config.receptor.daily_capacity);
    let warnings = collect_warnings(library, stack);

    info!(
        net_score = evaluation.as_ref().map(|e| e.totals.net_score),
        spillover = saturation.spillover,
        warnings = warnings.len(),
        "Report complete."
    );

    StackReport {
        evaluation,
        load,
        saturation,
        receptor,
        warnings,
    }
}

/// A memoizing wrapper around [`run`] for rapid UI-driven re-evaluation.
///
/// Reports are cached under the canonical `(stack, profile, config)`
/// signature; identical inputs are served from the cache, and the bounded
/// evict-oldest policy keeps the store small across a scrubbing session.
#[derive(Debug)]
pub struct ReportSession {
    config: EvaluationConfig,
    cache: SignatureCache<StackReport>,
}

impl ReportSession {
    pub fn new(config: EvaluationConfig) -> Self {
        let cache = SignatureCache::with_capacity(config.cache_capacity);
        Self { config, cache }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluates through the cache. The first call for a given input triple
    /// computes the report; repeats are served without recomputation.
    pub fn evaluate(
        &mut self,
        library: &CompoundLibrary,
        matrix: &InteractionMatrix,
        stack: &Stack,
        profile: &UserProfile,
    ) -> StackReport {
        let key = signature(stack, profile, &self.config);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let report = run(library, matrix, stack, profile, &self.config);
        self.cache.insert(key, report.clone());
        report
    }

    pub fn cached_reports(&self) -> usize {
        self.cache.len()
    }
}
