//! # weft-sync
//!
//! Variable reconciliation and library-file maintenance.
//!
//! Call [`pipeline::run`] with the filtered fetch result to execute the
//! read-merge-write cycle against one variable-library document.

pub mod error;
pub mod escape;
pub mod filter;
pub mod library;
pub mod merge;
pub mod pipeline;
pub mod writer;

pub use error::SyncError;
pub use merge::{merge, Disposition, MergeOutcome, MergeStats, MergedVariable};
pub use pipeline::SyncReport;
pub use writer::WriteResult;
