//! Factory options

use serde::{Deserialize, Serialize};

/// Options accepted by [`create`](crate::create).
///
/// Every field is optional; `Options::default()` gives the stock behavior:
/// the built-in stage allow-list, `<stage>.conf.json` file names, the
/// `development` fallback stage, and `_` as the environment separator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Overrides the built-in stage allow-list.
    pub allowed_stages: Option<Vec<String>>,

    /// File-name template containing the stage placeholder exactly once.
    pub file_name_template: Option<String>,

    /// Stage used when the stage environment variable is absent.
    pub default_stage: Option<String>,

    /// Separator splitting environment variable names into nested keys.
    pub env_separator: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stage allow-list.
    pub fn allowed_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_stages = Some(stages.into_iter().map(Into::into).collect());
        self
    }

    /// Set the per-stage file-name template.
    pub fn file_name_template(mut self, template: impl Into<String>) -> Self {
        self.file_name_template = Some(template.into());
        self
    }

    /// Set the fallback stage.
    pub fn default_stage(mut self, stage: impl Into<String>) -> Self {
        self.default_stage = Some(stage.into());
        self
    }

    /// Set the environment variable name separator.
    pub fn env_separator(mut self, separator: impl Into<String>) -> Self {
        self.env_separator = Some(separator.into());
        self
    }
}
