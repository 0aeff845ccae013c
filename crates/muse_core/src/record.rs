use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format used for [`Record::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One generation cycle: the prompt the user typed and the blended text it produced.
///
/// Records carry no identifier; their position in the store is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub prompt: String,
    pub output: String,
    pub timestamp: String,
}

impl Record {
    /// Create a record stamped with the current local time.
    pub fn new(prompt: impl Into<String>, output: impl Into<String>) -> Self {
        Self::at(prompt, output, Local::now())
    }

    /// Create a record stamped with an explicit time.
    pub fn at(prompt: impl Into<String>, output: impl Into<String>, when: DateTime<Local>) -> Self {
        Self {
            prompt: prompt.into(),
            output: output.into(),
            timestamp: when.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Prompt and output joined, lower-cased. This is the text the matcher scans.
    pub fn haystack(&self) -> String {
        format!("{} {}", self.prompt, self.output).to_lowercase()
    }
}
