//! Column-to-metric submission mapping for system-status query results
//!
//! Introspection queries against a database's system tables return rows whose
//! columns map to zero or more metrics, each submitted with a fixed method.
//! The mapping is declared up front and validated at registration time, so an
//! unknown submission method fails when the table is built rather than on the
//! first matching row.

use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

/// Errors raised while building a column map.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Submission method name matches no known kind
    #[error("unknown submission method `{name}`")]
    UnknownKind { name: String },

    /// Column registered twice in the same map
    #[error("duplicate column `{column}`")]
    DuplicateColumn { column: String },
}

/// How a metric value is handed to the collection agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Gauge,
    Rate,
    MonotonicCount,
    TemporalPercent,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Gauge => "gauge",
            SubmissionKind::Rate => "rate",
            SubmissionKind::MonotonicCount => "monotonic_count",
            SubmissionKind::TemporalPercent => "temporal_percent",
        }
    }
}

impl FromStr for SubmissionKind {
    type Err = SubmissionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "gauge" => Ok(SubmissionKind::Gauge),
            "rate" => Ok(SubmissionKind::Rate),
            "monotonic_count" => Ok(SubmissionKind::MonotonicCount),
            "temporal_percent" => Ok(SubmissionKind::TemporalPercent),
            _ => Err(SubmissionError::UnknownKind {
                name: name.to_string(),
            }),
        }
    }
}

/// One metric emitted for a column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub name: String,
    pub kind: SubmissionKind,
}

/// Ordered map from result-set column name to the metrics it produces.
///
/// A column registered with an empty metric list is tracked but submits
/// nothing; a column absent from the map is unexpected output.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    columns: IndexMap<String, Vec<MetricSpec>>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column with its `(metric name, submission method)` pairs.
    ///
    /// Method names are validated here; an unknown name rejects the whole
    /// registration.
    pub fn register(
        &mut self,
        column: &str,
        metrics: &[(&str, &str)],
    ) -> Result<(), SubmissionError> {
        if self.columns.contains_key(column) {
            return Err(SubmissionError::DuplicateColumn {
                column: column.to_string(),
            });
        }

        let specs = metrics
            .iter()
            .map(|(name, kind)| {
                Ok(MetricSpec {
                    name: (*name).to_string(),
                    kind: kind.parse()?,
                })
            })
            .collect::<Result<Vec<_>, SubmissionError>>()?;

        self.columns.insert(column.to_string(), specs);
        Ok(())
    }

    /// Register a column whose value is consumed but never submitted
    pub fn ignore(&mut self, column: &str) -> Result<(), SubmissionError> {
        self.register(column, &[])
    }

    /// Metrics produced by a column, or `None` for an unknown column
    pub fn metrics(&self, column: &str) -> Option<&[MetricSpec]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    /// Column names in registration order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
