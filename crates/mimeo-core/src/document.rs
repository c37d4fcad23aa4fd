//! Macro document format
//!
//! A persisted macro is `{"version": 1, "steps": [...]}`, written as
//! pretty-printed JSON. Older files were a bare step array; loading
//! still accepts those.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::step::Step;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// An ordered step sequence plus its format version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl MacroDocument {
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(steps: Vec<Step>) -> Self {
        Self {
            version: FORMAT_VERSION,
            steps,
        }
    }

    /// Parse a document. A bare JSON array is accepted as a step list.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(raw).context("macro file is not valid JSON")?;
        if value.is_array() {
            let steps = serde_json::from_value(value).context("invalid step list")?;
            return Ok(Self::with_steps(steps));
        }
        serde_json::from_value(value).context("invalid macro document")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize macro document")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl Default for MacroDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::MouseButton;

    #[test]
    fn round_trips() {
        let doc = MacroDocument::with_steps(vec![
            Step::wait(500),
            Step::click_here(MouseButton::Left, 0),
        ]);
        let back = MacroDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn bare_array_is_a_step_list() {
        let doc = MacroDocument::from_json(
            r#"[{"id":"a","type":"wait","delayMs":100},{"id":"b","type":"click","button":"right","position":"current","x":0,"y":0,"delayMs":0}]"#,
        )
        .unwrap();
        assert_eq!(doc.version, FORMAT_VERSION);
        assert_eq!(doc.steps.len(), 2);
    }

    #[test]
    fn version_defaults_when_missing() {
        let doc = MacroDocument::from_json(r#"{"steps":[]}"#).unwrap();
        assert_eq!(doc.version, FORMAT_VERSION);
        assert!(doc.steps.is_empty());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(MacroDocument::from_json("not json").is_err());
    }
}
