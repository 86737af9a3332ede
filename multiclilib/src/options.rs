//! Input options for report rendering.
//!
//! These control presentation only; which records a report shows is decided
//! by the command arguments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::output::DEFAULT_WIDTH;

/// Options shared by every report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Reference time for uptimes and "ago" values
    pub now: DateTime<Utc>,
    /// Text for missing fields; each report has its own vendor default
    pub placeholder: Option<String>,
    /// Append the native command suggestion
    pub hints: bool,
    /// Rule width of SR OS tables
    pub width: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            placeholder: None,
            hints: true,
            width: DEFAULT_WIDTH,
        }
    }
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: fix the clock (tests, reproducible output)
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Builder: set placeholder text for every report
    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    /// Placeholder to use, given the report's own default.
    pub fn placeholder_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.placeholder.as_deref().unwrap_or(default)
    }

    /// Builder: enable or disable the suggestion footer
    pub fn hints(mut self, hints: bool) -> Self {
        self.hints = hints;
        self
    }

    /// Builder: set rule width
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DEFAULT_PLACEHOLDER;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let options = ReportOptions::default();
        assert!(options.hints);
        assert_eq!(options.placeholder, None);
        assert_eq!(options.placeholder_or(DEFAULT_PLACEHOLDER), "N/A");
        assert_eq!(options.width, 79);
    }

    #[test]
    fn test_builder_chain() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 8, 48, 34).unwrap();
        let options = ReportOptions::new()
            .at(now)
            .placeholder("-")
            .hints(false)
            .width(100);
        assert_eq!(options.now, now);
        assert_eq!(options.placeholder_or("NA"), "-");
        assert!(!options.hints);
        assert_eq!(options.width, 100);
    }
}
