//! The data logger entity and its handle.
//!
//! # Per-tick protocol
//!
//! ```text
//! LoggerHandle::step(ts)
//!   1. logger lane:  hand out the probes of every source      (call)
//!   2. caller:       read all sources concurrently, wait all
//!   3. logger lane:  record one row per source at `ts`         (call)
//! ```
//!
//! The reads in step 2 run on the sources' own contexts; the logger's lane
//! never waits on them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use ea_actor::{Actor, ActorResult, Pending, PoolHandle};
use ea_core::EntityKey;
use futures::future::{BoxFuture, FutureExt, try_join_all};
use tracing::{debug, info};

use crate::{Metadata, OutputError, OutputResult, OutputWriter, RecordRow, Value, ValueKind};

/// Reads the current value of one source through the source's handle.
pub type Probe = Arc<dyn Fn() -> BoxFuture<'static, ActorResult<Value>> + Send + Sync>;

/// Build a [`Probe`] from a function returning a handle call.
///
/// ```rust,ignore
/// let temperature = probe({
///     let dwelling = dwelling.clone();
///     move || dwelling.temperature()
/// });
/// ```
pub fn probe<F, Fut, V>(read: F) -> Probe
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActorResult<V>> + Send + 'static,
    V: Into<Value>,
{
    Arc::new(move || {
        let reading = read();
        async move { reading.await.map(Into::into) }.boxed()
    })
}

// ── DataPoint ─────────────────────────────────────────────────────────────────

/// One recorded quantity and the sources it is sampled from.
pub struct DataPoint {
    name:    String,
    kind:    ValueKind,
    /// `(external id, probe)`, in recording order.
    sources: Vec<(u32, Probe)>,
}

impl DataPoint {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { name: name.into(), kind, sources: Vec::new() }
    }

    pub fn add_source(&mut self, id: u32, probe: Probe) {
        self.sources.push((id, probe));
    }

    pub fn with_source(mut self, id: u32, probe: Probe) -> Self {
        self.add_source(id, probe);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn source_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.sources.iter().map(|(id, _)| *id)
    }
}

impl fmt::Debug for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPoint")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("sources", &self.source_ids().collect::<Vec<_>>())
            .finish()
    }
}

// ── DataLogger ────────────────────────────────────────────────────────────────

/// Collects one row per source per step and writes everything once at the
/// end of the run.
pub struct DataLogger {
    points:     Vec<DataPoint>,
    records:    Vec<RecordRow>,
    timestamps: Vec<i64>,
    /// `None` keeps results in memory only.
    writer:     Option<Box<dyn OutputWriter>>,
    written:    bool,
}

impl DataLogger {
    pub fn new(points: Vec<DataPoint>, writer: Box<dyn OutputWriter>) -> Self {
        Self::build(points, Some(writer))
    }

    /// A logger that records but never writes anywhere.
    pub fn in_memory(points: Vec<DataPoint>) -> Self {
        Self::build(points, None)
    }

    fn build(points: Vec<DataPoint>, writer: Option<Box<dyn OutputWriter>>) -> Self {
        Self { points, records: Vec::new(), timestamps: Vec::new(), writer, written: false }
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn source_count(&self) -> usize {
        self.points.iter().map(|p| p.sources.len()).sum()
    }

    /// Every probe, data point by data point, sources in order.
    pub fn probes(&self) -> Vec<Probe> {
        self.points
            .iter()
            .flat_map(|p| p.sources.iter().map(|(_, probe)| Arc::clone(probe)))
            .collect()
    }

    /// Record one step: `values` holds one value per probe, in the order of
    /// [`probes`](Self::probes).  Nothing is recorded if any value is
    /// rejected.
    pub fn record(&mut self, unix_secs: i64, values: Vec<Value>) -> OutputResult<()> {
        let expected = self.source_count();
        if values.len() != expected {
            return Err(OutputError::ValueCount { expected, actual: values.len() });
        }
        let slots = self
            .points
            .iter()
            .flat_map(|p| p.sources.iter().map(move |(id, _)| (p, *id)));
        let mut rows = Vec::with_capacity(expected);
        for ((point, source_id), value) in slots.zip(values) {
            if value.kind() != point.kind {
                return Err(OutputError::TypeMismatch {
                    data_point: point.name.clone(),
                    expected:   point.kind,
                });
            }
            rows.push(RecordRow { data_point: point.name.clone(), source_id, unix_secs, value });
        }
        self.records.append(&mut rows);
        self.timestamps.push(unix_secs);
        debug!(unix_secs, rows = expected, "logger recorded step");
        Ok(())
    }

    pub fn records(&self) -> &[RecordRow] {
        &self.records
    }

    /// Timestamps of the recorded steps, in order.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Write all records and `metadata`.  Succeeds at most once.
    pub fn flush(&mut self, metadata: &Metadata) -> OutputResult<()> {
        if self.written {
            return Err(OutputError::AlreadyWritten);
        }
        self.written = true;
        if let Some(writer) = self.writer.as_mut() {
            writer.write_records(&self.records)?;
            writer.write_metadata(metadata)?;
            writer.finish()?;
        }
        info!(rows = self.records.len(), steps = self.timestamps.len(), "results written");
        Ok(())
    }

    pub fn is_written(&self) -> bool {
        self.written
    }
}

impl fmt::Debug for DataLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLogger")
            .field("points", &self.points)
            .field("records", &self.records.len())
            .field("written", &self.written)
            .finish()
    }
}

// ── LoggerHandle ──────────────────────────────────────────────────────────────

/// The only way to reach the [`DataLogger`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoggerHandle {
    actor: Actor<DataLogger>,
}

impl LoggerHandle {
    pub fn spawn(pool: &PoolHandle, logger: DataLogger) -> Self {
        Self { actor: Actor::spawn(pool, EntityKey::Logger, logger) }
    }

    pub fn actor(&self) -> &Actor<DataLogger> {
        &self.actor
    }

    /// Sample every source and record the values at `unix_secs`.
    pub fn step(&self, unix_secs: i64) -> impl Future<Output = OutputResult<()>> + Send + 'static {
        let probes = self.actor.call(|l: &mut DataLogger| l.probes());
        let actor = self.actor.clone();
        async move {
            let probes = probes.await?;
            let values = try_join_all(probes.iter().map(|read| read())).await?;
            actor
                .try_call(move |l: &mut DataLogger| l.record(unix_secs, values))
                .await
        }
    }

    /// Write everything recorded so far, once.
    pub fn flush(&self, metadata: Metadata) -> impl Future<Output = OutputResult<()>> + Send + 'static {
        self.actor.try_call(move |l: &mut DataLogger| l.flush(&metadata))
    }

    pub fn records(&self) -> Pending<Vec<RecordRow>> {
        self.actor.call(|l: &mut DataLogger| l.records().to_vec())
    }

    pub fn timestamps(&self) -> Pending<Vec<i64>> {
        self.actor.call(|l: &mut DataLogger| l.timestamps().to_vec())
    }
}
