//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `records.csv` — `data_point, source_id, timestamp, value`
//! - `metadata.csv` — `key, value`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{Metadata, OutputResult, RecordRow};

/// Writes simulation results to two CSV files.
pub struct CsvWriter {
    records:  Writer<File>,
    metadata: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut records = Writer::from_path(dir.join("records.csv"))?;
        records.write_record(["data_point", "source_id", "timestamp", "value"])?;

        let mut metadata = Writer::from_path(dir.join("metadata.csv"))?;
        metadata.write_record(["key", "value"])?;

        Ok(Self { records, metadata, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_records(&mut self, rows: &[RecordRow]) -> OutputResult<()> {
        for row in rows {
            self.records.write_record(&[
                row.data_point.clone(),
                row.source_id.to_string(),
                row.unix_secs.to_string(),
                row.value.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_metadata(&mut self, metadata: &Metadata) -> OutputResult<()> {
        for (key, value) in metadata {
            self.metadata.write_record([key, value])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.records.flush()?;
        self.metadata.flush()?;
        Ok(())
    }
}
