//! The immutable in-memory dataset the dashboard explores.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DashError;

/// One row of the dataset. `revenue` drives the filter, the x axis and the
/// bubble size; `population` is the y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    pub revenue: f64,
    pub population: f64,
}

impl Record {
    pub fn new(id: u64, name: impl Into<String>, revenue: f64, population: f64) -> Self {
        Self {
            id,
            name: name.into(),
            revenue,
            population,
        }
    }
}

/// Ordered, immutable collection of records. Cloning is cheap (shared).
///
/// Insertion order is the canonical display order when no sort is applied.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate record ids.
    pub fn new(records: Vec<Record>) -> Result<Self, DashError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(DashError::DuplicateRecordId(record.id));
            }
        }
        Ok(Self {
            records: records.into(),
        })
    }

    /// The built-in dataset shown when the dashboard starts.
    pub fn sample() -> Self {
        Self {
            records: vec![
                Record::new(1, "Item 1", 5000.0, 300.0),
                Record::new(2, "Item 2", 7000.0, 500.0),
                Record::new(3, "Item 3", 2000.0, 150.0),
                Record::new(4, "Item 4", 2500.0, 180.0),
                Record::new(5, "Item 5", 3500.0, 220.0),
            ]
            .into(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl Deref for Dataset {
    type Target = [Record];

    fn deref(&self) -> &[Record] {
        &self.records
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::sample()
    }
}
