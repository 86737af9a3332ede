//! Data: host state flattened into records.
//!
//! This module handles the second stage of the pipeline - the record
//! representation every report produces and every table consumes. It
//! provides:
//!
//! - **StateRecord**: a flat, immutable field-name to value map
//! - **FieldValue**: text, integer or timestamp, with display and ordering
//!
//! ## Example
//!
//! ```rust
//! use multiclilib::data::StateRecord;
//!
//! let record = StateRecord::new()
//!     .with("tep_address", "10.0.0.4")
//!     .with("egress_label", 103u32);
//! assert_eq!(record.text("egress_label").as_deref(), Some("103"));
//! ```

pub mod record;

pub use record::{FieldValue, StateRecord, TIMESTAMP_FORMAT};
