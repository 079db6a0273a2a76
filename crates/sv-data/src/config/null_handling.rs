//! Missing value detection for raw table cells

use serde::{Serialize, Deserialize};

/// Cell values treated as missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NullConfig {
    pub patterns: Vec<String>,

    /// Trim cells before matching; kept values are returned trimmed too
    pub trim_whitespace: bool,

    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            trim_whitespace: true,
            case_sensitive: true,
        }
    }
}

impl NullConfig {
    /// The cell value, or `None` when it matches a null pattern
    pub fn value_of<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let cell = if self.trim_whitespace { raw.trim() } else { raw };
        let is_pattern = |pattern: &String| {
            if self.case_sensitive {
                cell == pattern.as_str()
            } else {
                cell.eq_ignore_ascii_case(pattern)
            }
        };
        (!self.patterns.iter().any(is_pattern)).then_some(cell)
    }

    pub fn is_null(&self, raw: &str) -> bool {
        self.value_of(raw).is_none()
    }

    /// Register another missing-value marker, ignoring duplicates
    pub fn add_pattern(&mut self, pattern: String) {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
    }
}
