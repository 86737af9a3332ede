//! # multiclilib
//!
//! Render the state of an SR Linux host the way other vendors' CLIs print
//! it: SR OS service and BGP tables, the NX-OS MAC address table, Junos
//! ethernet-switching and interface listings.
//!
//! ## Overview
//!
//! The library is a pure pipeline with no terminal I/O:
//!
//! - **source**: the host state snapshot model and the [`StateSource`]
//!   accessors that load it
//! - **data**: [`StateRecord`], one flat row of state
//! - **query**: [`FilterCriterion`] and [`RecordQuery`], narrowing and
//!   ordering records by the command's identifier argument
//! - **output**: [`TableLayout`] and [`Report`], fixed-width vendor tables
//! - **reports**: the show commands built from the stages above
//!
//! An identifier that matches nothing is not an error: the table renders
//! with the `No Matching Entries` sentinel. Errors are reserved for state
//! that cannot be loaded or commands the device cannot answer.
//!
//! ## Example
//!
//! ```rust
//! use multiclilib::{parse_snapshot, ReportOptions, ShowCommand};
//!
//! let state = parse_snapshot(r#"{
//!     "interfaces": [{"name": "ethernet-1/1", "admin_state": "enable", "oper_state": "up"}]
//! }"#.as_bytes()).unwrap();
//!
//! let command = ShowCommand::Interfaces {
//!     name: None,
//!     format: multiclilib::InterfaceFormat::Terse,
//! };
//! let report = command.run(&state, &ReportOptions::default().hints(false)).unwrap();
//! assert_eq!(report.entries(), 1);
//! assert!(report.to_text(false).contains("ethernet-1/1            up    up"));
//! ```

pub mod data;
pub mod error;
pub mod options;
pub mod output;
pub mod query;
pub mod reports;
pub mod source;

pub use data::{FieldValue, StateRecord};
pub use error::MulticliError;
pub use options::ReportOptions;
pub use output::{Align, RenderedTable, Report, TableLayout, NO_MATCHING_ENTRIES};
pub use query::{FilterCriterion, Ordering, RecordQuery};
pub use reports::{InterfaceFormat, MacFilter, ShowCommand};
pub use source::{parse_snapshot, DeviceState, JsonFileSource, JsonReaderSource, StateSource};

/// Result type for multiclilib operations
pub type Result<T> = std::result::Result<T, MulticliError>;
