//! Filter criteria for the identifier argument of a show command.
//!
//! Vendor show commands take at most one identifier (an interface, a
//! network instance, a VLAN, a VNI). The criterion decides which records
//! survive; an identifier that matches nothing simply yields an empty
//! table.

use serde::{Deserialize, Serialize};

use crate::data::StateRecord;

/// How a user-supplied identifier restricts records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterCriterion {
    /// No restriction
    #[default]
    Any,
    /// Field must equal the identifier
    Exact(String),
    /// Field must start with the given text
    Prefix(String),
    /// Interface name without `.index`: matches itself and all subinterfaces
    Parent(String),
}

impl FilterCriterion {
    /// Parse a generic identifier argument.
    ///
    /// No argument or `*` means any; a trailing `*` makes a prefix match;
    /// anything else is exact.
    pub fn parse(arg: Option<&str>) -> Self {
        match arg.map(str::trim) {
            None | Some("") | Some("*") => FilterCriterion::Any,
            Some(s) => match s.strip_suffix('*') {
                Some(prefix) => FilterCriterion::Prefix(prefix.to_string()),
                None => FilterCriterion::Exact(s.to_string()),
            },
        }
    }

    /// Parse an interface argument: `ethernet-1/1.10` is exact, while
    /// `ethernet-1/1` selects the interface and every subinterface of it.
    pub fn interface(arg: Option<&str>) -> Self {
        match Self::parse(arg) {
            FilterCriterion::Exact(name) if !name.contains('.') => FilterCriterion::Parent(name),
            other => other,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, FilterCriterion::Any)
    }

    /// Check a single value against the criterion.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FilterCriterion::Any => true,
            FilterCriterion::Exact(id) => value == id,
            FilterCriterion::Prefix(prefix) => value.starts_with(prefix.as_str()),
            FilterCriterion::Parent(parent) => {
                value == parent
                    || value
                        .split_once('.')
                        .is_some_and(|(interface, _)| interface == parent)
            }
        }
    }

    /// Check a record's field. A missing field only passes `Any`.
    pub fn matches_record(&self, record: &StateRecord, field: &str) -> bool {
        match record.text(field) {
            Some(value) => self.matches(&value),
            None => self.is_any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_any() {
        assert_eq!(FilterCriterion::parse(None), FilterCriterion::Any);
        assert_eq!(FilterCriterion::parse(Some("*")), FilterCriterion::Any);
        assert_eq!(FilterCriterion::parse(Some("")), FilterCriterion::Any);
    }

    #[test]
    fn test_parse_prefix_and_exact() {
        assert_eq!(
            FilterCriterion::parse(Some("ethernet-1/*")),
            FilterCriterion::Prefix("ethernet-1/".to_string())
        );
        assert_eq!(
            FilterCriterion::parse(Some("mac-vrf-1")),
            FilterCriterion::Exact("mac-vrf-1".to_string())
        );
    }

    #[test]
    fn test_interface_parent_matching() {
        let parent = FilterCriterion::interface(Some("ethernet-1/1"));
        assert_eq!(parent, FilterCriterion::Parent("ethernet-1/1".to_string()));
        assert!(parent.matches("ethernet-1/1"));
        assert!(parent.matches("ethernet-1/1.10"));
        assert!(!parent.matches("ethernet-1/10.0"));
        assert!(!parent.matches("ethernet-1/11"));

        let exact = FilterCriterion::interface(Some("ethernet-1/1.10"));
        assert!(exact.matches("ethernet-1/1.10"));
        assert!(!exact.matches("ethernet-1/1.100"));
    }

    #[test]
    fn test_missing_field_only_passes_any() {
        let record = StateRecord::new().with("vlan", "10");
        assert!(FilterCriterion::Any.matches_record(&record, "vni"));
        assert!(!FilterCriterion::parse(Some("10")).matches_record(&record, "vni"));
        assert!(FilterCriterion::parse(Some("10")).matches_record(&record, "vlan"));
    }
}
