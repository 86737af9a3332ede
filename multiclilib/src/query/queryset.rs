//! Record query: the filter stage between reports and tables.
//!
//! A query narrows a record set with one criterion per field, then orders
//! it. The data pipeline is:
//! 1. DeviceState (host snapshot)
//! 2. StateRecords (built by a report)
//! 3. RecordQuery (filtered, sorted)
//! 4. RenderedTable (fixed-width lines)

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::data::StateRecord;

use super::filter::FilterCriterion;
use super::options::{OrderDirection, Ordering};

/// Filters and ordering applied to a record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    /// (field, criterion) pairs; a record must satisfy all of them
    pub filters: Vec<(String, FilterCriterion)>,
    pub ordering: Ordering,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: restrict a field. `Any` criteria are dropped.
    pub fn filter(mut self, field: &str, criterion: FilterCriterion) -> Self {
        if !criterion.is_any() {
            self.filters.push((field.to_string(), criterion));
        }
        self
    }

    /// Builder: set ordering.
    pub fn order(mut self, ordering: Ordering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Whether a single record passes every filter.
    pub fn accepts(&self, record: &StateRecord) -> bool {
        self.filters
            .iter()
            .all(|(field, criterion)| criterion.matches_record(record, field))
    }

    /// Apply filters and ordering. Sorting is stable, so ties keep source
    /// order.
    pub fn apply(&self, records: Vec<StateRecord>) -> Vec<StateRecord> {
        let before = records.len();
        let mut kept: Vec<StateRecord> = records.into_iter().filter(|r| self.accepts(r)).collect();

        if let Some(field) = &self.ordering.by {
            kept.sort_by(|a, b| {
                let ord = match (a.get(field), b.get(field)) {
                    (Some(x), Some(y)) => x.compare(y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match self.ordering.direction {
                    OrderDirection::Ascending => ord,
                    OrderDirection::Descending => ord.reverse(),
                }
            });
        }

        trace!(before, after = kept.len(), "record query applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tunnels() -> Vec<StateRecord> {
        vec![
            StateRecord::new()
                .with("tep_address", "10.0.1.4")
                .with("mcast", "bum"),
            StateRecord::new()
                .with("tep_address", "10.0.0.4")
                .with("mcast", "bum"),
            StateRecord::new()
                .with("tep_address", "10.0.1.3")
                .with("mcast", "None"),
        ]
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let out = RecordQuery::new().apply(tunnels());
        assert_eq!(out, tunnels());
    }

    #[test]
    fn test_filter_and_order() {
        let out = RecordQuery::new()
            .filter("mcast", FilterCriterion::parse(Some("bum")))
            .order(Ordering::by_field("tep_address"))
            .apply(tunnels());

        let teps: Vec<String> = out.iter().filter_map(|r| r.text("tep_address")).collect();
        assert_eq!(teps, vec!["10.0.0.4", "10.0.1.4"]);
    }

    #[test]
    fn test_descending_order() {
        let out = RecordQuery::new()
            .order(Ordering::by_field("tep_address").descending())
            .apply(tunnels());
        assert_eq!(out[0].text("tep_address").as_deref(), Some("10.0.1.4"));
    }

    #[test]
    fn test_no_match_yields_empty() {
        let out = RecordQuery::new()
            .filter("tep_address", FilterCriterion::parse(Some("192.0.2.1")))
            .apply(tunnels());
        assert!(out.is_empty());
    }

    #[test]
    fn test_any_filters_are_dropped() {
        let query = RecordQuery::new().filter("vlan", FilterCriterion::Any);
        assert!(query.filters.is_empty());
    }
}
