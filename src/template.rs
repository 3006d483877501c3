//! Stage file-name templating
//!
//! A file-name template embeds the active stage through a placeholder token,
//! e.g. `%%STAGE%%_settings.json` becomes `production_settings.json`.

use crate::errors::{ConfigError, Result};
use tracing::debug;

/// Placeholder token replaced with the active stage name.
///
/// Matching is case-insensitive (`%%stage%%` works too); the replacement is
/// the stage string verbatim.
pub const STAGE_PLACEHOLDER: &str = "%%STAGE%%";

/// Render a per-stage file name from a template.
///
/// Returns `Ok(None)` when the template or stage is absent/empty, letting the
/// caller fall back to its own default file name. The placeholder must occur
/// exactly once; zero or repeated occurrences are a configuration error.
pub fn stage_file_name(template: Option<&str>, stage: &str) -> Result<Option<String>> {
    let template = match template {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };
    if stage.is_empty() {
        return Ok(None);
    }

    let offsets = placeholder_offsets(template);
    if offsets.len() != 1 {
        debug!(
            "Template '{}' contains {} stage placeholders, expected 1",
            template,
            offsets.len()
        );
        return Err(ConfigError::Template);
    }

    let start = offsets[0];
    let mut name = String::with_capacity(template.len() + stage.len());
    name.push_str(&template[..start]);
    name.push_str(stage);
    name.push_str(&template[start + STAGE_PLACEHOLDER.len()..]);
    Ok(Some(name))
}

/// Byte offsets of every case-insensitive placeholder occurrence.
fn placeholder_offsets(template: &str) -> Vec<usize> {
    let haystack = template.to_ascii_lowercase();
    let needle = STAGE_PLACEHOLDER.to_ascii_lowercase();
    let mut offsets = Vec::new();
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        offsets.push(from + pos);
        from += pos + needle.len();
    }
    offsets
}
