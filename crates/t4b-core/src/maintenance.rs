//! Client-side filtering and ordering of maintenance records.

use std::cmp::Ordering;

use crate::api::types::Maintenance;

/// Filter applied to a fetched maintenance list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaintenanceFilter {
    pub bike_id: Option<i64>,
    /// Case-insensitive substring of `service_type`.
    pub service_type: Option<String>,
}

impl MaintenanceFilter {
    pub fn matches(&self, record: &Maintenance) -> bool {
        if self.bike_id.is_some_and(|id| record.bike_id != id) {
            return false;
        }
        match self.service_type.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => record
                .service_type
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Keeps matching records, newest first.
    pub fn apply(&self, records: Vec<Maintenance>) -> Vec<Maintenance> {
        let mut kept: Vec<Maintenance> = records.into_iter().filter(|m| self.matches(m)).collect();
        sort_newest_first(&mut kept);
        kept
    }
}

/// Sorts by `service_date` descending. Records whose date cannot be parsed
/// go last, keeping their relative order.
pub fn sort_newest_first(records: &mut [Maintenance]) {
    records.sort_by(|a, b| match (a.service_datetime(), b.service_datetime()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
