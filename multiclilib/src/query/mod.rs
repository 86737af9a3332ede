//! Query processing: filter and sort records.
//!
//! This module handles the third stage of the pipeline - narrowing the
//! records a report built down to what the user asked for. It provides:
//!
//! - **FilterCriterion**: how the command's identifier argument matches
//! - **Ordering**: which field to sort by, and in which direction
//! - **RecordQuery**: filters plus ordering, applied to a record set
//!
//! ## Example
//!
//! ```rust
//! use multiclilib::data::StateRecord;
//! use multiclilib::query::{FilterCriterion, Ordering, RecordQuery};
//!
//! let records = vec![
//!     StateRecord::new().with("interface", "ethernet-1/1.10"),
//!     StateRecord::new().with("interface", "ethernet-1/2.10"),
//! ];
//! let kept = RecordQuery::new()
//!     .filter("interface", FilterCriterion::interface(Some("ethernet-1/1")))
//!     .order(Ordering::by_field("interface"))
//!     .apply(records);
//! assert_eq!(kept.len(), 1);
//! ```

pub mod filter;
pub mod options;
pub mod queryset;

pub use filter::FilterCriterion;
pub use options::{OrderDirection, Ordering};
pub use queryset::RecordQuery;
