//! Output formatting: present records as vendor tables.
//!
//! This module handles the fourth and final stage of the pipeline -
//! formatting query results for display. It provides:
//!
//! - **TableLayout**: columns, header lines, frame and summary label
//! - **RenderedTable**: the fixed-width lines plus the cell values behind them
//! - **Report**: text blocks and tables in print order, serializable to JSON
//!
//! Tables are a pure presentation layer - they only format records into
//! strings. All filtering and sorting happens in the query stage.
//!
//! ## Example
//!
//! ```rust
//! use multiclilib::data::StateRecord;
//! use multiclilib::output::{Align, TableLayout};
//!
//! let layout = TableLayout::boxed("Egress VTEP, VNI (Instance 1)")
//!     .column("vtep", 52, Align::Left)
//!     .column("vni", 11, Align::Left)
//!     .header(&["VTEP Address", "Egress VNI"]);
//! let table = layout.render(&[StateRecord::new().with("vtep", "10.0.0.2").with("vni", 110u32)]);
//! assert!(table.lines.contains(&"Number of entries: 1".to_string()));
//!
//! let empty = layout.render(&[]);
//! assert!(empty.lines.contains(&"No Matching Entries".to_string()));
//! ```

pub mod report;
pub mod table;

pub use report::{Report, Section};
pub use table::{
    Align, Column, Frame, RenderedTable, TableLayout, DEFAULT_PLACEHOLDER, DEFAULT_WIDTH,
    NO_MATCHING_ENTRIES,
};
