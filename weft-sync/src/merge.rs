//! Ordered associative merge of variable sequences.
//!
//! The merge is non-destructive: an existing entry whose name is absent from
//! the fetched set survives unchanged, in place. Fetched entries update
//! their existing counterpart in place or append at the end, in fetch order.
//! Duplicate names within the fetched set resolve last-write-wins.

use std::collections::HashMap;

use weft_core::types::Variable;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// How a merged entry ended up in the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Appended — the name was new to the library.
    Added,
    /// Replaced in place by a fetched entry with the same name.
    Updated,
    /// Carried over untouched — absent from the fetched set.
    Kept,
}

impl Disposition {
    pub fn label(self) -> &'static str {
        match self {
            Disposition::Added => "added",
            Disposition::Updated => "updated",
            Disposition::Kept => "kept",
        }
    }
}

/// A merged entry with its disposition, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedVariable {
    pub variable: Variable,
    pub disposition: Disposition,
}

/// Counts derived from the merge, floor-clamped. Reporting only — nothing
/// downstream depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub total: usize,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Full result of [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub entries: Vec<MergedVariable>,
    pub stats: MergeStats,
}

impl MergeOutcome {
    /// The merged sequence, dispositions stripped.
    pub fn variables(&self) -> Vec<Variable> {
        self.entries.iter().map(|e| e.variable.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge `fetched` into `existing`, preserving order per the contract above.
pub fn merge(existing: &[Variable], fetched: &[Variable]) -> MergeOutcome {
    let mut entries: Vec<MergedVariable> = existing
        .iter()
        .cloned()
        .map(|variable| MergedVariable {
            variable,
            disposition: Disposition::Kept,
        })
        .collect();
    let mut index: HashMap<String, usize> = existing
        .iter()
        .enumerate()
        .map(|(i, v)| (v.name.clone(), i))
        .collect();

    for variable in fetched {
        match index.get(&variable.name) {
            Some(&slot) => {
                // Last write wins, also for duplicates within `fetched`;
                // an appended entry stays Added when overwritten again.
                let disposition = if slot < existing.len() {
                    Disposition::Updated
                } else {
                    Disposition::Added
                };
                entries[slot] = MergedVariable {
                    variable: variable.clone(),
                    disposition,
                };
            }
            None => {
                index.insert(variable.name.clone(), entries.len());
                entries.push(MergedVariable {
                    variable: variable.clone(),
                    disposition: Disposition::Added,
                });
            }
        }
    }

    let total = entries.len();
    let added = total.saturating_sub(existing.len());
    let updated = fetched.len().saturating_sub(added);
    let unchanged = existing.len().saturating_sub(updated);

    MergeOutcome {
        entries,
        stats: MergeStats {
            total,
            added,
            updated,
            unchanged,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
