//! Ordering options for record queries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

/// Which field a record set is sorted on.
///
/// With no field set, records keep the order the report produced them in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ordering {
    pub by: Option<String>,
    pub direction: OrderDirection,
}

impl Ordering {
    /// Sort ascending on `field`
    pub fn by_field(field: &str) -> Self {
        Self {
            by: Some(field.to_string()),
            direction: OrderDirection::Ascending,
        }
    }

    pub fn descending(mut self) -> Self {
        self.direction = OrderDirection::Descending;
        self
    }
}
