//! A complete command output: text blocks and tables, in print order.

use console::Style;
use serde::Serialize;

use super::table::RenderedTable;

/// One block of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    /// Free-form lines (legends, header blocks, hints)
    Text { lines: Vec<String> },
    Table(RenderedTable),
}

/// The output of one show command.
///
/// Reports are built completely before anything is printed, so a failing
/// command never leaves partial output behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub command: String,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            sections: Vec::new(),
        }
    }

    /// Append text lines. Consecutive text blocks stay separate.
    pub fn push_text<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.push(Section::Text {
            lines: lines.into_iter().map(Into::into).collect(),
        });
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.push_text([line.into()]);
    }

    pub fn push_table(&mut self, table: RenderedTable) {
        self.sections.push(Section::Table(table));
    }

    pub fn tables(&self) -> impl Iterator<Item = &RenderedTable> {
        self.sections.iter().filter_map(|s| match s {
            Section::Table(t) => Some(t),
            Section::Text { .. } => None,
        })
    }

    /// Total data rows across all tables.
    pub fn entries(&self) -> usize {
        self.tables().map(|t| t.entries).sum()
    }

    /// All printable lines. With `styled`, table titles are bold.
    pub fn lines(&self, styled: bool) -> Vec<String> {
        let title_style = Style::new().bold().force_styling(true);
        let mut out = Vec::new();
        for section in &self.sections {
            match section {
                Section::Text { lines } => out.extend(lines.iter().cloned()),
                Section::Table(table) => {
                    for (i, line) in table.lines.iter().enumerate() {
                        if styled && table.title_index == Some(i) {
                            out.push(title_style.apply_to(line).to_string());
                        } else {
                            out.push(line.clone());
                        }
                    }
                }
            }
        }
        out
    }

    /// The report as one newline-terminated string.
    pub fn to_text(&self, styled: bool) -> String {
        let mut text = self.lines(styled).join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StateRecord;
    use crate::output::table::{Align, TableLayout};

    fn sample() -> Report {
        let table = TableLayout::boxed("Title")
            .column("a", 4, Align::Left)
            .header(&["A"])
            .render(&[StateRecord::new().with("a", "x")]);
        let mut report = Report::new("show test");
        report.push_line("Legend");
        report.push_table(table);
        report
    }

    #[test]
    fn test_plain_text_has_no_escapes() {
        let text = sample().to_text(false);
        assert!(text.starts_with("Legend\n\n"));
        assert!(text.contains("\nTitle\n"));
        assert!(!text.contains('\u{1b}'));
        assert!(text.ends_with("=\n"));
    }

    #[test]
    fn test_styled_title_is_bold() {
        let lines = sample().lines(true);
        let title = lines.iter().find(|l| l.contains("Title")).unwrap();
        assert!(title.starts_with("\u{1b}[1m"));
        assert_eq!(console::strip_ansi_codes(title), "Title");
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["command"], "show test");
        assert_eq!(json["sections"][0]["kind"], "text");
        assert_eq!(json["sections"][1]["kind"], "table");
        assert_eq!(json["sections"][1]["entries"], 1);
        assert_eq!(json["sections"][1]["rows"][0][0], "x");
        assert!(json["sections"][1].get("lines").is_none());
    }

    #[test]
    fn test_entries_sum_tables() {
        assert_eq!(sample().entries(), 1);
    }
}
