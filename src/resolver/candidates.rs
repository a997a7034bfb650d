//! Which archive entries are worth scanning, and in what order.
//!
//! 1. consolidated slice summaries (name contains a summary marker)
//! 2. per-plate G-code
//! 3. remaining config/metadata entries, minus model and relationship parts
//!
//! All name matching is case-insensitive.

use std::path::Path;

use crate::config::ResolverConfig;

/// Lower-cased text after the last dot of the final path segment.
///
/// Unlike [`Path::extension`], a bare dot-name such as `.gcode` counts as
/// having the extension `gcode`.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_lowercase())
}

fn has_extension(name: &str, extensions: &[String]) -> bool {
    extension_of(name).is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

fn contains_any(name_lower: &str, markers: &[String]) -> bool {
    markers
        .iter()
        .any(|m| name_lower.contains(&m.to_lowercase()))
}

/// Order `names` into the scan list. Entries matching no rule are dropped.
pub fn select_candidates(names: &[String], config: &ResolverConfig) -> Vec<String> {
    let mut summaries = Vec::new();
    let mut layers = Vec::new();
    let mut metadata = Vec::new();

    for name in names {
        let lower = name.to_lowercase();
        if contains_any(&lower, &config.summary_markers) {
            summaries.push(name.clone());
        } else if has_extension(name, &config.layer_extensions) {
            layers.push(name.clone());
        } else if has_extension(name, &config.metadata_extensions)
            && !contains_any(&lower, &config.excluded_markers)
        {
            metadata.push(name.clone());
        }
    }

    summaries.into_iter().chain(layers).chain(metadata).collect()
}
