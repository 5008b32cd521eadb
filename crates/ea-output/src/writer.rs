//! The `OutputWriter` trait implemented by all backend writers.

use crate::{Metadata, RecordRow, OutputResult};

/// Trait implemented by the CSV and SQLite writers.
///
/// The logger calls `write_records`, then `write_metadata`, then `finish`,
/// once each, at the end of a run.
pub trait OutputWriter: Send {
    fn write_records(&mut self, rows: &[RecordRow]) -> OutputResult<()>;

    fn write_metadata(&mut self, metadata: &Metadata) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
