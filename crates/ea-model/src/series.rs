//! Timestamped values.

/// Values indexed by Unix timestamps (UTC seconds), in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries<T> {
    index:  Vec<i64>,
    values: Vec<T>,
}

impl<T> TimeSeries<T> {
    pub fn new() -> Self {
        Self { index: Vec::new(), values: Vec::new() }
    }

    /// Build a series with a constant step from `start_unix_secs`.
    pub fn from_values(start_unix_secs: i64, step_secs: u32, values: Vec<T>) -> Self {
        let index = (0..values.len() as i64)
            .map(|i| start_unix_secs + i * step_secs as i64)
            .collect();
        Self { index, values }
    }

    pub fn push(&mut self, unix_secs: i64, value: T) {
        self.index.push(unix_secs);
        self.values.push(value);
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The step between consecutive timestamps if it is the same everywhere.
    ///
    /// `None` for fewer than two entries or an irregular index.
    pub fn constant_step(&self) -> Option<i64> {
        let mut steps = self.index.windows(2).map(|w| w[1] - w[0]);
        let first = steps.next()?;
        steps.all(|s| s == first).then_some(first)
    }
}
