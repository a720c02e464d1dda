use super::personalization::personalize;
use crate::core::models::compound::CompoundDefinition;
use crate::core::models::curve::CurveKind;
use crate::core::models::profile::UserProfile;
use serde::Serialize;

/// Evidence metadata attached to a response evaluation.
///
/// `nearing_plateau` marks doses at or past the flat region of the benefit
/// curve; `beyond_evidence` marks requests past the highest sampled dose
/// (the flat-extrapolation regime).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponseMeta {
    pub requested_dose: f64,
    pub clamped_dose: f64,
    pub plateau_dose: f64,
    pub evidence_ceiling: f64,
    pub nearing_plateau: bool,
    pub beyond_evidence: bool,
}

/// A fully evaluated, personalized response reading for one compound/dose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredResponse {
    pub value: f64,
    pub ci: f64,
    pub meta: ResponseMeta,
}

/// Evaluates a compound's response curve at `dose` and personalizes the
/// result for `profile`.
///
/// The requested dose is clamped into the compound's evidenced range before
/// interpolation; the metadata records both the request and the clamp so
/// presentation layers can flag extrapolation honestly.
pub fn evaluate_response(
    compound: &CompoundDefinition,
    kind: CurveKind,
    dose: f64,
    profile: &UserProfile,
) -> ScoredResponse {
    let plateau_dose = compound.plateau_dose();
    let evidence_ceiling = compound.evidence_ceiling();
    let clamped_dose = dose.clamp(0.0, evidence_ceiling);

    let curve = match kind {
        CurveKind::Benefit => &compound.benefit_curve,
        CurveKind::Risk => &compound.risk_curve,
    };
    let point = curve.value_at(clamped_dose);
    let personalized = personalize(
        &compound.flags,
        kind,
        clamped_dose,
        point.value,
        point.ci,
        profile,
    );

    ScoredResponse {
        value: personalized.value,
        ci: personalized.ci,
        meta: ResponseMeta {
            requested_dose: dose,
            clamped_dose,
            plateau_dose,
            evidence_ceiling,
            nearing_plateau: clamped_dose >= plateau_dose,
            beyond_evidence: dose > evidence_ceiling,
        },
    }
}
