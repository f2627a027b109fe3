//! Named build statistics and their log report.

use core::fmt;
use std::time::Duration;

/// A single recorded measurement.
#[derive(Clone, Debug, PartialEq)]
pub enum StatValue {
    /// A plain count (number of nodes, number of curves, ...).
    Count(u64),
    /// A size or alignment in bytes.
    Size(usize),
    /// A wall-clock duration.
    Time(Duration),
    /// A dimensionless scalar (configuration echo, ratios, ...).
    Scalar(f64),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{}", n),
            StatValue::Size(bytes) => write!(f, "{} bytes", bytes),
            StatValue::Time(duration) => write!(f, "{:.3} ms", duration.as_secs_f64() * 1.0e3),
            StatValue::Scalar(x) => write!(f, "{}", x),
        }
    }
}

/// An insertion-ordered accumulator of named measurements.
///
/// Write-only during the build; rendered and logged once afterwards.
/// Reporting is never fatal: this type only formats and hands the text to
/// the `log` facade.
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    title: String,
    entries: Vec<(String, StatValue)>,
}

impl Statistics {
    /// Creates an empty statistics bundle with the given report title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Records a count measurement.
    pub fn insert_count(&mut self, name: impl Into<String>, value: u64) {
        self.entries.push((name.into(), StatValue::Count(value)));
    }

    /// Records a size measurement, in bytes.
    pub fn insert_size(&mut self, name: impl Into<String>, value: usize) {
        self.entries.push((name.into(), StatValue::Size(value)));
    }

    /// Records a duration measurement.
    pub fn insert_time(&mut self, name: impl Into<String>, value: Duration) {
        self.entries.push((name.into(), StatValue::Time(value)));
    }

    /// Records a dimensionless scalar.
    pub fn insert_scalar(&mut self, name: impl Into<String>, value: f64) {
        self.entries.push((name.into(), StatValue::Scalar(value)));
    }

    /// The recorded entries, in insertion order.
    pub fn entries(&self) -> &[(String, StatValue)] {
        &self.entries
    }

    /// Emits the report through the `log` facade at the given level.
    pub fn report(&self, level: log::Level) {
        log::log!(level, "{}", self);
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.title)?;
        for (name, value) in &self.entries {
            write!(f, "\n  {} {}", name, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Statistics;
    use std::time::Duration;

    #[test]
    fn report_is_insertion_ordered() {
        let mut stats = Statistics::new("curve tree #0 statistics");
        stats.insert_count("nodes", 7);
        stats.insert_size("nodes alignment", 64);
        stats.insert_time("total time", Duration::from_millis(12));

        let text = stats.to_string();
        let nodes = text.find("nodes 7").unwrap();
        let alignment = text.find("nodes alignment 64 bytes").unwrap();
        let time = text.find("total time 12.000 ms").unwrap();
        assert!(nodes < alignment && alignment < time);
    }
}
