//! Audit log of rewrite invocations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;

/// One successfully derived rewrite, preview or commit.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransformRecord {
    pub operation: String,
    pub parameters: Value,
    /// Candidate text, truncated
    pub result_preview: String,
    pub committed: bool,
    pub timestamp: DateTime<Utc>,
}

/// Append-only storage for [`TransformRecord`]s.
pub trait TransformLog: Send {
    fn append(&mut self, record: TransformRecord);

    /// Records oldest first.
    fn records(&self) -> Vec<TransformRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps every record for the life of the process.
#[derive(Debug, Default)]
pub struct UnboundedLog {
    records: Vec<TransformRecord>,
}

impl TransformLog for UnboundedLog {
    fn append(&mut self, record: TransformRecord) {
        self.records.push(record);
    }

    fn records(&self) -> Vec<TransformRecord> {
        self.records.clone()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Keeps only the newest `capacity` records.
#[derive(Debug)]
pub struct RingLog {
    capacity: usize,
    records: VecDeque<TransformRecord>,
}

impl RingLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity.max(1)),
        }
    }
}

impl TransformLog for RingLog {
    fn append(&mut self, record: TransformRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    fn records(&self) -> Vec<TransformRecord> {
        self.records.iter().cloned().collect()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Log implementation for a configured limit; 0 means unbounded.
pub fn log_for_limit(limit: usize) -> Box<dyn TransformLog> {
    if limit == 0 {
        Box::new(UnboundedLog::default())
    } else {
        Box::new(RingLog::new(limit))
    }
}
