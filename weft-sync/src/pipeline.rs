//! Read-merge-write pipeline for one variable-library file.
//!
//! The cycle is not protected against concurrent runs targeting the same
//! file; the CI pipeline serializes invocations.

use std::path::{Path, PathBuf};

use weft_core::types::{Variable, VariableLibrary};

use crate::error::SyncError;
use crate::library;
use crate::merge::{self, MergeStats, MergedVariable};
use crate::writer::{self, WriteResult};

/// Outcome of syncing one library file.
#[derive(Debug)]
pub struct SyncReport {
    pub path: PathBuf,
    pub write: WriteResult,
    pub stats: MergeStats,
    /// Merged entries with dispositions, in result order. Empty when the
    /// run was an empty-fetch no-op.
    pub entries: Vec<MergedVariable>,
    /// Number of fetched variables that entered the merge.
    pub fetched: usize,
}

/// Run the read-merge-write cycle for `path`.
///
/// An empty `fetched` set is not an error: an existing file is left
/// untouched, a missing one is materialized as an empty library so first
/// runs produce the document.
pub fn run(path: &Path, fetched: Vec<Variable>, dry_run: bool) -> Result<SyncReport, SyncError> {
    if fetched.is_empty() {
        if path.exists() {
            tracing::info!("no variables matched; leaving {} untouched", path.display());
            return Ok(SyncReport {
                path: path.to_path_buf(),
                write: WriteResult::Unchanged {
                    path: path.to_path_buf(),
                },
                stats: MergeStats::default(),
                entries: Vec::new(),
                fetched: 0,
            });
        }
        let write = writer::write_if_changed(path, &library::render(&VariableLibrary::default())?, dry_run)?;
        return Ok(SyncReport {
            path: path.to_path_buf(),
            write,
            stats: MergeStats::default(),
            entries: Vec::new(),
            fetched: 0,
        });
    }

    let existing = library::load_at(path)?;
    let outcome = merge::merge(&existing.variables, &fetched);
    let merged = VariableLibrary {
        // Keep whatever schema tag the document already carries.
        schema: existing.schema,
        variables: outcome.variables(),
    };
    let write = writer::write_if_changed(path, &library::render(&merged)?, dry_run)?;

    Ok(SyncReport {
        path: path.to_path_buf(),
        write,
        stats: outcome.stats,
        entries: outcome.entries,
        fetched: fetched.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
