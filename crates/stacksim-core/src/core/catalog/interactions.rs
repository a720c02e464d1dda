use crate::core::models::interaction::{DisplayScore, InteractionRecord, SynergyRating};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Raw interaction row as deserialized from the matrix CSV file.
#[derive(Debug, Deserialize)]
struct InteractionRow {
    compound_a: String,
    compound_b: String,
    benefit_synergy: f64,
    risk_synergy: f64,
    rating: String,
}

#[derive(Debug, Error)]
pub enum InteractionLoadError {
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("Interaction record pairs '{0}' with itself")]
    SelfPair(String),
    #[error("Duplicate interaction record for pair '{a}' / '{b}'")]
    DuplicatePair { a: String, b: String },
    #[error("Unknown rating '{rating}' for pair '{a}' / '{b}'")]
    UnknownRating {
        a: String,
        b: String,
        rating: String,
    },
    #[error("{field} synergy {value} for pair '{a}' / '{b}' is outside [-1, 1]")]
    SynergyOutOfRange {
        a: String,
        b: String,
        field: &'static str,
        value: f64,
    },
}

/// Combined synergy contributions across a set of compound pairs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SynergyTotals {
    pub benefit_synergy: f64,
    pub risk_synergy: f64,
}

/// Symmetric lookup table of pairwise interaction records.
///
/// Keys are canonicalized by lexical ordering, so the record for (A, B) is
/// identical to the record for (B, A) by construction. Absence of a record
/// means a neutral interaction.
#[derive(Debug, Clone, Default)]
pub struct InteractionMatrix {
    records: HashMap<(String, String), InteractionRecord>,
}

fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

fn validate_synergy(
    a: &str,
    b: &str,
    field: &'static str,
    value: f64,
) -> Result<(), InteractionLoadError> {
    if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
        return Err(InteractionLoadError::SynergyOutOfRange {
            a: a.to_string(),
            b: b.to_string(),
            field,
            value,
        });
    }
    Ok(())
}

impl InteractionMatrix {
    /// Loads the interaction matrix from a CSV file with columns
    /// `compound_a,compound_b,benefit_synergy,risk_synergy,rating`.
    ///
    /// # Errors
    ///
    /// Returns `InteractionLoadError::Csv` if the file cannot be opened or a
    /// row fails to parse; `SelfPair`, `DuplicatePair`, `UnknownRating`, or
    /// `SynergyOutOfRange` for semantically invalid rows.
    pub fn load(path: &Path) -> Result<Self, InteractionLoadError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| InteractionLoadError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let mut matrix = Self::default();
        for result in reader.deserialize::<InteractionRow>() {
            let row = result.map_err(|e| InteractionLoadError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            let rating: SynergyRating = row.rating.parse().map_err(|_| {
                InteractionLoadError::UnknownRating {
                    a: row.compound_a.clone(),
                    b: row.compound_b.clone(),
                    rating: row.rating.clone(),
                }
            })?;
            matrix.insert(
                &row.compound_a,
                &row.compound_b,
                InteractionRecord {
                    benefit_synergy: row.benefit_synergy,
                    risk_synergy: row.risk_synergy,
                    rating,
                },
            )?;
        }
        Ok(matrix)
    }

    /// Builds a matrix from in-memory records, applying the same validation
    /// as the CSV loader (the path tests take for synthetic matrices).
    pub fn from_records(
        records: impl IntoIterator<Item = (String, String, InteractionRecord)>,
    ) -> Result<Self, InteractionLoadError> {
        let mut matrix = Self::default();
        for (a, b, record) in records {
            matrix.insert(&a, &b, record)?;
        }
        Ok(matrix)
    }

    fn insert(
        &mut self,
        a: &str,
        b: &str,
        record: InteractionRecord,
    ) -> Result<(), InteractionLoadError> {
        if a == b {
            return Err(InteractionLoadError::SelfPair(a.to_string()));
        }
        validate_synergy(a, b, "benefit", record.benefit_synergy)?;
        validate_synergy(a, b, "risk", record.risk_synergy)?;
        let key = canonical_pair(a, b);
        if self.records.contains_key(&key) {
            return Err(InteractionLoadError::DuplicatePair {
                a: key.0,
                b: key.1,
            });
        }
        self.records.insert(key, record);
        Ok(())
    }

    /// Symmetric record lookup. Returns `None` for a self-pair or when no
    /// record exists for the unordered pair.
    pub fn get(&self, a: &str, b: &str) -> Option<&InteractionRecord> {
        if a == b {
            return None;
        }
        self.records.get(&canonical_pair(a, b))
    }

    /// Displayable score for any pair; falls back to the neutral
    /// "compatible" rating when no record exists. Never absent.
    pub fn score(&self, a: &str, b: &str) -> DisplayScore {
        match self.get(a, b) {
            Some(record) => DisplayScore::from_record(record),
            None => DisplayScore::neutral(),
        }
    }

    /// Sums raw synergy fractions over every unordered pair in `ids`.
    ///
    /// Pairs without a record contribute zero; an empty or single-compound
    /// list yields zero in both dimensions. Stacks are small, so the O(n²)
    /// pair walk is never a concern.
    pub fn stack_synergy<S: AsRef<str>>(&self, ids: &[S]) -> SynergyTotals {
        let mut totals = SynergyTotals::default();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if let Some(record) = self.get(a.as_ref(), b.as_ref()) {
                    totals.benefit_synergy += record.benefit_synergy;
                    totals.risk_synergy += record.risk_synergy;
                }
            }
        }
        totals
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &InteractionRecord)> {
        self.records.iter()
    }
}
