//! Output and log filename generation
//!
//! Filenames derive from the metadata source (file path or URL) plus a
//! timestamp, so repeated runs never clobber each other.

use std::path::Path;

/// Derive the base name from a source path or URL
fn base_name(source: &str) -> String {
    if is_url(source) {
        // Last non-empty path segment, without extension
        let without_scheme = source.split("://").nth(1).unwrap_or(source);
        let path = without_scheme.split(['?', '#']).next().unwrap_or("");
        let segment = path
            .split('/')
            .skip(1)
            .filter(|s| !s.is_empty())
            .last()
            .unwrap_or("");
        let stem = Path::new(segment)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        if stem.is_empty() {
            "metadata".to_string()
        } else {
            stem.to_string()
        }
    } else {
        Path::new(source)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("metadata")
            .to_string()
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Generate `(output_filename, log_filename)` for a run
pub fn generate(source: &str, suffix: &str) -> (String, String) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base = base_name(source);
    (
        format!("{base}_{suffix}_{timestamp}.jsonld"),
        format!("{base}_processing_{timestamp}.log"),
    )
}

/// Log filename matching an explicitly chosen output file
pub fn log_for_output(output: &Path) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("metadata");
    format!("{base}_processing_{timestamp}.log")
}
