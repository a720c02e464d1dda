use crate::core::models::compound::{
    AdministrationType, CompoundDefinition, CompoundFlags, EsterProfile,
};
use crate::core::models::curve::{CurveError, CurveKind, CurveSample, ResponseCurve};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Raw compound entry as deserialized from the catalog TOML file.
///
/// This is the on-disk shape before validation; curves arrive as plain sample
/// vectors and are promoted to validated [`ResponseCurve`]s during loading.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCompound {
    name: String,
    administration: AdministrationType,
    #[serde(default = "default_bioavailability")]
    bioavailability: f64,
    #[serde(default)]
    binding_affinity: Option<f64>,
    #[serde(default = "default_toxicity_tier")]
    toxicity_tier: u8,
    #[serde(default)]
    suppressive_factor: f64,
    #[serde(default)]
    half_life_hours: Option<f64>,
    #[serde(default)]
    default_ester: Option<String>,
    #[serde(default)]
    default_frequency: Option<f64>,
    #[serde(default)]
    esters: BTreeMap<String, EsterProfile>,
    #[serde(default)]
    flags: CompoundFlags,
    benefit_curve: Vec<CurveSample>,
    risk_curve: Vec<CurveSample>,
}

fn default_bioavailability() -> f64 {
    1.0
}

fn default_toxicity_tier() -> u8 {
    2
}

/// Represents errors that can occur while loading and validating the compound
/// catalog.
///
/// Catalog problems are configuration errors: they fail loudly at load time
/// so the evaluators never have to tolerate malformed reference data.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: Box<toml::de::Error>,
    },
    #[error("Invalid {kind:?} curve for compound '{compound}': {source}")]
    Curve {
        compound: String,
        kind: CurveKind,
        source: CurveError,
    },
    #[error("Compound '{compound}' declares default ester '{ester}' which is not in its ester table")]
    UnknownDefaultEster { compound: String, ester: String },
    #[error("Compound '{compound}' has bioavailability {value}, expected a value in (0, 1]")]
    InvalidBioavailability { compound: String, value: f64 },
    #[error("Compound '{compound}' has non-positive binding affinity {value}")]
    InvalidBindingAffinity { compound: String, value: f64 },
    #[error("Ester '{ester}' of compound '{compound}' has weight {value}, expected a value in (0, 1]")]
    InvalidEsterWeight {
        compound: String,
        ester: String,
        value: f64,
    },
}

/// The immutable compound catalog: id → definition.
///
/// Explicitly constructed and injected into the engine's entry points rather
/// than living behind a global, so tests can substitute a small synthetic
/// catalog instead of depending on the full production dataset.
#[derive(Debug, Clone, Default)]
pub struct CompoundLibrary {
    compounds: BTreeMap<String, CompoundDefinition>,
}

impl CompoundLibrary {
    /// Loads and validates a compound catalog from a TOML file.
    ///
    /// The file maps compound ids to definitions; see `data/compounds.toml`
    /// for the production catalog. Validation covers curve integrity (empty
    /// curves, non-monotonic doses, non-finite numbers), ester consistency,
    /// and parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError::Io` if the file cannot be read.
    /// Returns `CatalogLoadError::Toml` if the file is not valid TOML.
    /// Returns `CatalogLoadError::Curve` if a curve violates its invariants.
    /// Returns `CatalogLoadError::UnknownDefaultEster`,
    /// `InvalidBioavailability`, `InvalidBindingAffinity`, or
    /// `InvalidEsterWeight` for inconsistent compound parameters.
    pub fn load(path: &Path) -> Result<Self, CatalogLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let raw: BTreeMap<String, RawCompound> =
            toml::from_str(&content).map_err(|e| CatalogLoadError::Toml {
                path: path.to_string_lossy().to_string(),
                source: Box::new(e),
            })?;

        let mut compounds = BTreeMap::new();
        for (id, raw_compound) in raw {
            let definition = Self::validate_compound(&id, raw_compound)?;
            compounds.insert(id, definition);
        }
        Ok(Self { compounds })
    }

    fn validate_compound(
        id: &str,
        raw: RawCompound,
    ) -> Result<CompoundDefinition, CatalogLoadError> {
        if !(raw.bioavailability > 0.0 && raw.bioavailability <= 1.0) {
            return Err(CatalogLoadError::InvalidBioavailability {
                compound: id.to_string(),
                value: raw.bioavailability,
            });
        }
        if let Some(kd) = raw.binding_affinity {
            if !(kd > 0.0) || !kd.is_finite() {
                return Err(CatalogLoadError::InvalidBindingAffinity {
                    compound: id.to_string(),
                    value: kd,
                });
            }
        }
        if let Some(ester) = &raw.default_ester {
            if !raw.esters.contains_key(ester) {
                return Err(CatalogLoadError::UnknownDefaultEster {
                    compound: id.to_string(),
                    ester: ester.clone(),
                });
            }
        }
        for (ester_key, ester) in &raw.esters {
            if !(ester.weight > 0.0 && ester.weight <= 1.0) {
                return Err(CatalogLoadError::InvalidEsterWeight {
                    compound: id.to_string(),
                    ester: ester_key.clone(),
                    value: ester.weight,
                });
            }
        }

        let benefit_curve =
            ResponseCurve::new(raw.benefit_curve).map_err(|e| CatalogLoadError::Curve {
                compound: id.to_string(),
                kind: CurveKind::Benefit,
                source: e,
            })?;
        let risk_curve =
            ResponseCurve::new(raw.risk_curve).map_err(|e| CatalogLoadError::Curve {
                compound: id.to_string(),
                kind: CurveKind::Risk,
                source: e,
            })?;

        Ok(CompoundDefinition {
            name: raw.name,
            administration: raw.administration,
            bioavailability: raw.bioavailability,
            binding_affinity: raw.binding_affinity,
            toxicity_tier: raw.toxicity_tier,
            suppressive_factor: raw.suppressive_factor,
            half_life_hours: raw.half_life_hours,
            default_ester: raw.default_ester,
            default_frequency: raw.default_frequency,
            esters: raw.esters,
            flags: raw.flags,
            benefit_curve,
            risk_curve,
        })
    }

    /// Builds a library from already-validated definitions (the path tests
    /// take when constructing synthetic catalogs).
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = (String, CompoundDefinition)>,
    ) -> Self {
        Self {
            compounds: definitions.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CompoundDefinition> {
        self.compounds.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.compounds.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CompoundDefinition)> {
        self.compounds.iter().map(|(id, def)| (id.as_str(), def))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.compounds.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.compounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const VALID_CATALOG: &str = r#"
[testosterone]
name = "Testosterone"
administration = "injectable"
binding_affinity = 1.0
suppressive_factor = 2.0
default_ester = "enanthate"
default_frequency = 2.0
benefit_curve = [
    { dose = 0.0, value = 0.0, ci = 0.0 },
    { dose = 300.0, value = 2.5, ci = 0.15 },
    { dose = 600.0, value = 5.0, ci = 0.15 },
]
risk_curve = [
    { dose = 0.0, value = 0.0, ci = 0.0 },
    { dose = 600.0, value = 2.1, ci = 0.25 },
]

[testosterone.flags]
aromatization = 1.0
shbg_sensitive = true
suppressive = true

[testosterone.esters.enanthate]
label = "Enanthate"
half_life_hours = 108.0
weight = 0.72

[anavar]
name = "Anavar"
administration = "oral"
toxicity_tier = 1
benefit_curve = [
    { dose = 0.0, value = 0.0 },
    { dose = 50.0, value = 2.0, ci = 0.2 },
]
risk_curve = [
    { dose = 0.0, value = 0.0 },
    { dose = 50.0, value = 0.8, ci = 0.2 },
]
"#;

    fn write_catalog(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("compounds.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn load_succeeds_with_valid_catalog() {
        let (_dir, path) = write_catalog(VALID_CATALOG);
        let library = CompoundLibrary::load(&path).unwrap();

        assert_eq!(library.len(), 2);
        let test = library.get("testosterone").unwrap();
        assert_eq!(test.administration, AdministrationType::Injectable);
        assert!(test.flags.shbg_sensitive);
        assert_eq!(test.resolve_ester(None).unwrap().label, "Enanthate");
        let anavar = library.get("anavar").unwrap();
        assert_eq!(anavar.toxicity_tier, 1);
        assert_eq!(anavar.bioavailability, 1.0);
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = CompoundLibrary::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let (_dir, path) = write_catalog("this is not toml");
        let result = CompoundLibrary::load(&path);
        assert!(matches!(result, Err(CatalogLoadError::Toml { .. })));
    }

    #[test]
    fn load_fails_for_empty_curve() {
        let (_dir, path) = write_catalog(
            r#"
[ghost]
name = "Ghost"
administration = "oral"
benefit_curve = []
risk_curve = [ { dose = 0.0, value = 0.0 } ]
"#,
        );
        let result = CompoundLibrary::load(&path);
        assert!(matches!(
            result,
            Err(CatalogLoadError::Curve {
                kind: CurveKind::Benefit,
                source: CurveError::Empty,
                ..
            })
        ));
    }

    #[test]
    fn load_fails_for_non_monotonic_curve() {
        let (_dir, path) = write_catalog(
            r#"
[ghost]
name = "Ghost"
administration = "oral"
benefit_curve = [
    { dose = 100.0, value = 1.0 },
    { dose = 50.0, value = 2.0 },
]
risk_curve = [ { dose = 0.0, value = 0.0 } ]
"#,
        );
        let result = CompoundLibrary::load(&path);
        assert!(matches!(
            result,
            Err(CatalogLoadError::Curve {
                source: CurveError::NonMonotonic { index: 1 },
                ..
            })
        ));
    }

    #[test]
    fn load_fails_for_unknown_default_ester() {
        let (_dir, path) = write_catalog(
            r#"
[ghost]
name = "Ghost"
administration = "injectable"
default_ester = "acetate"
benefit_curve = [ { dose = 0.0, value = 0.0 } ]
risk_curve = [ { dose = 0.0, value = 0.0 } ]
"#,
        );
        let result = CompoundLibrary::load(&path);
        assert!(matches!(
            result,
            Err(CatalogLoadError::UnknownDefaultEster { ester, .. }) if ester == "acetate"
        ));
    }

    #[test]
    fn load_fails_for_out_of_range_bioavailability() {
        let (_dir, path) = write_catalog(
            r#"
[ghost]
name = "Ghost"
administration = "oral"
bioavailability = 1.5
benefit_curve = [ { dose = 0.0, value = 0.0 } ]
risk_curve = [ { dose = 0.0, value = 0.0 } ]
"#,
        );
        let result = CompoundLibrary::load(&path);
        assert!(matches!(
            result,
            Err(CatalogLoadError::InvalidBioavailability { value, .. }) if value == 1.5
        ));
    }

    #[test]
    fn load_fails_for_non_positive_binding_affinity() {
        let (_dir, path) = write_catalog(
            r#"
[ghost]
name = "Ghost"
administration = "injectable"
binding_affinity = 0.0
benefit_curve = [ { dose = 0.0, value = 0.0 } ]
risk_curve = [ { dose = 0.0, value = 0.0 } ]
"#,
        );
        let result = CompoundLibrary::load(&path);
        assert!(matches!(
            result,
            Err(CatalogLoadError::InvalidBindingAffinity { .. })
        ));
    }
}
