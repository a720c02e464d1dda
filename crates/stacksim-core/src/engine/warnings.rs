use crate::core::catalog::library::CompoundLibrary;
use crate::core::models::stack::Stack;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    HepaticSynergy,
    EstrogenCrash,
    RenalStress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Notice,
    High,
    Critical,
}

/// A structured combination alert derived from catalog flags.
///
/// The engine emits plain records; presentation collaborators decide how to
/// render them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StackWarning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
}

/// Inspects the stack's catalog flags for known dangerous combinations.
///
/// Unknown compounds contribute nothing; dose magnitudes are not considered
/// here (the load metrics carry those).
pub fn collect_warnings(library: &CompoundLibrary, stack: &Stack) -> Vec<StackWarning> {
    let compounds: Vec<_> = stack
        .entries()
        .iter()
        .filter_map(|entry| library.get(&entry.compound))
        .collect();

    let mut warnings = Vec::new();

    let oral_count = compounds.iter().filter(|c| c.is_oral()).count();
    if oral_count > 1 {
        warnings.push(StackWarning {
            kind: WarningKind::HepaticSynergy,
            severity: Severity::High,
            message: format!(
                "{oral_count} hepatotoxic orals compete for the same hepatic enzymes; \
                 toxicity compounds multiplicatively, not additively."
            ),
        });
    }

    let has_suppressive = compounds.iter().any(|c| c.flags.suppressive);
    let has_aromatizing_base = compounds.iter().any(|c| c.flags.aromatization > 0.0);
    if has_suppressive && !has_aromatizing_base {
        warnings.push(StackWarning {
            kind: WarningKind::EstrogenCrash,
            severity: Severity::Critical,
            message: "Suppressive stack without an aromatizing base; endogenous estrogen \
                      will crash with no exogenous replacement."
                .to_string(),
        });
    }

    let has_renal_toxic = compounds.iter().any(|c| c.flags.renal_toxic);
    let has_heavy_bp = compounds.iter().any(|c| c.flags.heavy_bp);
    if has_renal_toxic && has_heavy_bp {
        warnings.push(StackWarning {
            kind: WarningKind::RenalStress,
            severity: Severity::Critical,
            message: "Renal-toxic compound stacked with a heavy blood-pressure driver; \
                      elevated pressure forces perfusion through inflamed kidneys."
                .to_string(),
        });
    }

    warnings
}
