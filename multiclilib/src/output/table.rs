//! Fixed-width table rendering.
//!
//! A [`TableLayout`] describes a vendor table: its columns (field, width,
//! alignment), the literal header lines, the frame and the summary label.
//! Rendering a record set produces a [`RenderedTable`], whose lines are
//! ready to print and whose cell values can be serialized.
//!
//! The data flow is:
//! 1. StateRecords (built by a report)
//! 2. RecordQuery (filtered, sorted)
//! 3. RenderedTable (formatted strings for display)
//!
//! Column widths come from the layout only, so two renders of the same
//! records are identical line for line.

use std::collections::BTreeSet;

use console::{measure_text_width, pad_str, Alignment};
use serde::{Deserialize, Serialize};

use crate::data::StateRecord;

/// Emitted in place of rows when nothing matched.
pub const NO_MATCHING_ENTRIES: &str = "No Matching Entries";

/// Default summary label of SR OS tables.
pub const DEFAULT_SUMMARY_LABEL: &str = "Number of entries: ";

/// Default rule width of SR OS tables.
pub const DEFAULT_WIDTH: usize = 79;

/// Default text for a missing field.
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Cell alignment within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

/// One column: which record field it shows, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub field: String,
    pub width: usize,
    pub align: Align,
}

impl Column {
    pub fn new(field: &str, width: usize, align: Align) -> Self {
        Self {
            field: field.to_string(),
            width,
            align,
        }
    }

    /// Pad or truncate a value to the column width.
    pub fn format(&self, value: &str) -> String {
        pad_str(value, self.width, self.align.into(), Some("")).into_owned()
    }
}

/// Border style around the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frame {
    /// SR OS: `=` rules around the title, `-` rules around rows and summary.
    Boxed,
    /// NX-OS / Junos: header lines, an optional literal separator, rows and
    /// a closing `-` rule.
    Open { separator: Option<String> },
}

/// Everything needed to turn records into fixed-width lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub title: Option<String>,
    pub columns: Vec<Column>,
    /// Header lines, printed in order above the rows
    pub headers: Vec<String>,
    /// Width of the `=` and `-` rules
    pub width: usize,
    pub summary_label: String,
    pub placeholder: String,
    pub frame: Frame,
    /// Spaces between adjacent cells
    pub gap: usize,
    /// Spaces before the first cell
    pub indent: usize,
}

impl TableLayout {
    /// A titled SR OS table.
    pub fn boxed(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            columns: Vec::new(),
            headers: Vec::new(),
            width: DEFAULT_WIDTH,
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            frame: Frame::Boxed,
            gap: 0,
            indent: 0,
        }
    }

    /// An untitled NX-OS / Junos table.
    pub fn open() -> Self {
        Self {
            title: None,
            columns: Vec::new(),
            headers: Vec::new(),
            width: DEFAULT_WIDTH,
            summary_label: DEFAULT_SUMMARY_LABEL.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            frame: Frame::Open { separator: None },
            gap: 1,
            indent: 0,
        }
    }

    /// Builder: append a column.
    pub fn column(mut self, field: &str, width: usize, align: Align) -> Self {
        self.columns.push(Column::new(field, width, align));
        self
    }

    /// Builder: append a header line built from one label per column.
    pub fn header(mut self, labels: &[&str]) -> Self {
        let line = self.join_cells(
            self.columns
                .iter()
                .zip(labels.iter().chain(std::iter::repeat(&"")))
                .map(|(column, label)| pad_str(label, column.width, Alignment::Left, Some("")).into_owned()),
        );
        self.headers.push(line);
        self
    }

    /// Builder: append a literal header line.
    pub fn header_line(mut self, line: &str) -> Self {
        self.headers.push(line.to_string());
        self
    }

    /// Builder: literal separator line under the headers of an open table.
    pub fn separator(mut self, line: &str) -> Self {
        self.frame = Frame::Open {
            separator: Some(line.to_string()),
        };
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn summary_label(mut self, label: &str) -> Self {
        self.summary_label = label.to_string();
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    fn rule(&self, c: char) -> String {
        c.to_string().repeat(self.width)
    }

    fn join_cells(&self, cells: impl Iterator<Item = String>) -> String {
        let line = cells.collect::<Vec<_>>().join(&" ".repeat(self.gap));
        format!("{}{}", " ".repeat(self.indent), line)
            .trim_end()
            .to_string()
    }

    /// Text of every column for one record, before padding.
    fn cell_values(&self, record: &StateRecord) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                record
                    .text(&column.field)
                    .unwrap_or_else(|| self.placeholder.clone())
            })
            .collect()
    }

    /// Render records into lines. Every record becomes exactly one row.
    pub fn render(&self, records: &[StateRecord]) -> RenderedTable {
        let rows: Vec<Vec<String>> = records.iter().map(|r| self.cell_values(r)).collect();
        let mut lines = Vec::new();
        let mut title_index = None;

        if let Frame::Boxed = self.frame {
            lines.push(String::new());
            lines.push(self.rule('='));
            if let Some(title) = &self.title {
                title_index = Some(lines.len());
                lines.push(title.clone());
            }
            lines.push(self.rule('='));
        }

        lines.extend(self.headers.iter().map(|h| h.trim_end().to_string()));

        match &self.frame {
            Frame::Boxed => lines.push(self.rule('-')),
            Frame::Open {
                separator: Some(separator),
            } => lines.push(separator.clone()),
            Frame::Open { separator: None } => {}
        }

        if rows.is_empty() {
            lines.push(NO_MATCHING_ENTRIES.to_string());
            match self.frame {
                Frame::Boxed => lines.push(self.rule('=')),
                Frame::Open { .. } => lines.push(self.rule('-')),
            }
        } else {
            for row in &rows {
                lines.push(self.join_cells(
                    self.columns
                        .iter()
                        .zip(row)
                        .map(|(column, value)| column.format(value)),
                ));
            }
            lines.push(self.rule('-'));
            lines.push(format!("{}{}", self.summary_label, rows.len()));
            if let Frame::Boxed = self.frame {
                lines.push(self.rule('-'));
                lines.push(self.rule('='));
            }
        }

        RenderedTable {
            title: self.title.clone(),
            columns: self.columns.iter().map(|c| c.field.clone()).collect(),
            entries: rows.len(),
            rows,
            lines,
            title_index,
        }
    }

    /// Display width of the widest data line this layout can produce.
    pub fn row_width(&self) -> usize {
        let cells: usize = self.columns.iter().map(|c| c.width).sum();
        self.indent + cells + self.gap * self.columns.len().saturating_sub(1)
    }
}

/// A rendered table: printable lines plus the cell values behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Field name of each column
    pub columns: Vec<String>,
    /// Untruncated cell values, one row per matching record
    pub rows: Vec<Vec<String>>,
    /// Number of data rows
    pub entries: usize,
    #[serde(skip)]
    pub lines: Vec<String>,
    /// Position of the title within `lines`
    #[serde(skip)]
    pub title_index: Option<usize>,
}

impl RenderedTable {
    /// A table whose lines the caller laid out, for entries that span more
    /// than one line. Columns are every field any record carries, sorted;
    /// a record without one gets an empty cell.
    pub fn block(title: Option<String>, records: &[StateRecord], lines: Vec<String>) -> Self {
        let columns: Vec<String> = records
            .iter()
            .flat_map(|r| r.fields().map(|(name, _)| name.to_string()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let rows = records
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.text(c).unwrap_or_default())
                    .collect()
            })
            .collect();
        RenderedTable {
            title,
            columns,
            rows,
            entries: records.len(),
            lines: lines.into_iter().map(|l| l.trim_end().to_string()).collect(),
            title_index: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Widest line, in terminal columns.
    pub fn display_width(&self) -> usize {
        self.lines
            .iter()
            .map(|l| measure_text_width(l))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mpls_layout() -> TableLayout {
        TableLayout::boxed("BGP EVPN-MPLS Dest (Instance 1)")
            .column("tep_address", 32, Align::Left)
            .column("transport_tunnel", 18, Align::Left)
            .column("egress_label", 11, Align::Left)
            .column("oper_state", 6, Align::Left)
            .column("mcast", 7, Align::Left)
            .column("num_macs", 4, Align::Left)
            .header(&["TEP Address", "Transpor:Tnl", "Egr Label", "Oper", "Mcast", "Num"])
            .header(&["", "", "", "State", "", "MACs"])
    }

    fn tunnel(tep: &str, label: u32, mcast: &str, macs: Option<u64>) -> StateRecord {
        StateRecord::new()
            .with("tep_address", tep)
            .with("transport_tunnel", "sr-isis:20004")
            .with("egress_label", label)
            .with("oper_state", "Up")
            .with("mcast", mcast)
            .with_opt("num_macs", macs)
    }

    #[test]
    fn test_empty_boxed_table_shows_sentinel() {
        let table = mpls_layout().render(&[]);
        let rule_eq = "=".repeat(79);
        let rule_dash = "-".repeat(79);
        assert_eq!(
            table.lines,
            vec![
                "".to_string(),
                rule_eq.clone(),
                "BGP EVPN-MPLS Dest (Instance 1)".to_string(),
                rule_eq.clone(),
                "TEP Address                     Transpor:Tnl      Egr Label  Oper  Mcast  Num".to_string(),
                "                                                             State        MACs".to_string(),
                rule_dash,
                NO_MATCHING_ENTRIES.to_string(),
                rule_eq,
            ]
        );
        assert!(table.is_empty());
        assert_eq!(table.title_index, Some(2));
    }

    #[test]
    fn test_summary_count_matches_rows() {
        let records = vec![
            tunnel("10.0.0.4", 103, "bum", None),
            tunnel("10.0.1.3", 524287, "None", Some(10)),
        ];
        let table = mpls_layout().render(&records);

        assert_eq!(table.entries, 2);
        assert_eq!(table.rows.len(), 2);
        assert!(table.lines.contains(&"Number of entries: 2".to_string()));
        assert!(table.lines.contains(
            &"10.0.0.4                        sr-isis:20004     103        Up    bum    N/A"
                .to_string()
        ));
        assert!(table.lines.contains(
            &"10.0.1.3                        sr-isis:20004     524287     Up    None   10"
                .to_string()
        ));
        let n = table.lines.len();
        assert_eq!(table.lines[n - 1], "=".repeat(79));
        assert_eq!(table.lines[n - 2], "-".repeat(79));
    }

    #[test]
    fn test_render_is_idempotent() {
        let records = vec![tunnel("10.0.0.4", 103, "bum", None)];
        let layout = mpls_layout();
        assert_eq!(layout.render(&records), layout.render(&records));
    }

    #[test]
    fn test_cells_truncate_to_width() {
        let layout = TableLayout::open()
            .column("name", 4, Align::Left)
            .column("state", 4, Align::Right);
        let record = StateRecord::new()
            .with("name", "ethernet-1/1")
            .with("state", "up");
        let table = layout.render(&[record]);
        assert_eq!(table.lines[0], "ethe   up");
        // The serialized value keeps the full text
        assert_eq!(table.rows[0][0], "ethernet-1/1");
    }

    #[test]
    fn test_custom_placeholder_and_center() {
        let layout = TableLayout::open()
            .column("flag", 3, Align::Center)
            .column("age", 4, Align::Left)
            .placeholder("NA");
        let table = layout.render(&[StateRecord::new().with("flag", "*")]);
        assert_eq!(table.lines[0], " *  NA");
    }

    #[test]
    fn test_open_table_with_separator() {
        let layout = TableLayout::open()
            .header_line("  VLAN  MAC")
            .separator("------+-----")
            .column("vlan", 6, Align::Right)
            .column("mac", 5, Align::Left)
            .width(12)
            .summary_label("Total MAC Addresses: ");

        let empty = layout.render(&[]);
        assert_eq!(
            empty.lines,
            vec!["  VLAN  MAC", "------+-----", NO_MATCHING_ENTRIES, "------------"]
        );

        let table = layout.render(&[StateRecord::new().with("vlan", 10u32).with("mac", "aa")]);
        assert_eq!(
            table.lines,
            vec![
                "  VLAN  MAC",
                "------+-----",
                "    10 aa",
                "------------",
                "Total MAC Addresses: 1"
            ]
        );
    }

    #[test]
    fn test_block_table() {
        let records = vec![
            StateRecord::new().with("peer", "10.0.0.1").with("as", 65001u32),
            StateRecord::new().with("peer", "10.0.0.2"),
        ];
        let lines = vec!["10.0.0.1   ".to_string(), "   65001".to_string()];
        let table = RenderedTable::block(None, &records, lines);
        assert_eq!(table.columns, vec!["as", "peer"]);
        assert_eq!(table.rows[1], vec!["".to_string(), "10.0.0.2".to_string()]);
        assert_eq!(table.lines[0], "10.0.0.1");
        assert_eq!(table.entries, 2);
    }

    #[test]
    fn test_block_columns_cover_every_record() {
        let records = vec![
            StateRecord::new().with("peer", "10.0.0.1"),
            StateRecord::new().with("peer", "10.0.0.2").with("as", 65200u32),
        ];
        let table = RenderedTable::block(None, &records, Vec::new());
        assert_eq!(table.columns, vec!["as", "peer"]);
        assert_eq!(table.rows[0], vec!["".to_string(), "10.0.0.1".to_string()]);
        assert_eq!(table.rows[1], vec!["65200".to_string(), "10.0.0.2".to_string()]);
    }

    #[test]
    fn test_row_width() {
        assert_eq!(mpls_layout().row_width(), 78);
        let open = TableLayout::open()
            .gap(3)
            .column("a", 9, Align::Left)
            .column("b", 18, Align::Left);
        assert_eq!(open.row_width(), 30);
        assert_eq!(open.indent(1).row_width(), 31);
    }
}
