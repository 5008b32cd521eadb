//! `ea-output` — recording simulation results.
//!
//! The [`DataLogger`] is an entity like any other: it lives behind a
//! [`LoggerHandle`] and is stepped once per tick, after everything else.
//! Each [`DataPoint`] names a quantity (`temperature`, `thermalPower`, ...)
//! and lists its sources, each with a [`Probe`] that reads the current value
//! through the source entity's handle.
//!
//! Results are kept in memory until the run ends, then written once by an
//! [`OutputWriter`]:
//!
//! | Feature   | Backend | Files created                     |
//! |-----------|---------|-----------------------------------|
//! | *(none)*  | CSV     | `records.csv`, `metadata.csv`     |
//! | `sqlite`  | SQLite  | `output.db`                       |

pub mod csv;
pub mod error;
pub mod logger;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use logger::{DataLogger, DataPoint, LoggerHandle, Probe, probe};
pub use row::{Metadata, RecordRow, Value, ValueKind};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
