use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    #[error("compound '{0}' is already present in the stack")]
    DuplicateCompound(String),
}

/// One compound at one dose within a stack.
///
/// `dose` is in the compound's native unit (mg/week for injectables, mg/day
/// for orals and ancillaries). `frequency` is administrations per week for
/// injectables; `ester` selects a variant from the compound's ester table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackEntry {
    pub compound: String,
    pub dose: f64,
    #[serde(default)]
    pub frequency: Option<f64>,
    #[serde(default)]
    pub ester: Option<String>,
}

impl StackEntry {
    pub fn new(compound: impl Into<String>, dose: f64) -> Self {
        Self {
            compound: compound.into(),
            dose,
            frequency: None,
            ester: None,
        }
    }
}

/// An order-irrelevant set of stack entries with unique compound ids.
///
/// Duplicates are rejected at insertion, never silently merged, so every
/// downstream consumer can assume one entry per compound.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Stack {
    entries: Vec<StackEntry>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<StackEntry>) -> Result<Self, StackError> {
        let mut stack = Self::new();
        for entry in entries {
            stack.push(entry)?;
        }
        Ok(stack)
    }

    pub fn push(&mut self, entry: StackEntry) -> Result<(), StackError> {
        if self.contains(&entry.compound) {
            return Err(StackError::DuplicateCompound(entry.compound));
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn contains(&self, compound: &str) -> bool {
        self.entries.iter().any(|e| e.compound == compound)
    }

    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub fn compound_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.compound.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<StackEntry>> for Stack {
    type Error = StackError;

    fn try_from(entries: Vec<StackEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}
