use std::path::Path;

/// Name used when the client sends a file part without a file name.
pub const FALLBACK_FILENAME: &str = "unnamed";

/// Reduces a client-supplied file name to its final path component.
///
/// Windows separators are treated as separators too, so `C:\clips\a.mp4`
/// becomes `a.mp4`. Control characters are dropped. Never returns an empty
/// string.
pub fn sanitize_filename(filename: &str) -> String {
    let last = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();

    let name = Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path components stripped from upload name: {}", filename);
    }

    let sanitized: String = name.chars().filter(|c| !c.is_control()).collect();
    let sanitized = sanitized.trim();

    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        FALLBACK_FILENAME.to_string()
    } else {
        sanitized.to_string()
    }
}

/// Restricts a name to the characters AWS Transcribe accepts in job names
/// (`[0-9a-zA-Z._-]`), replacing everything else with `_`.
pub fn sanitize_job_component(name: &str) -> String {
    sanitize_filename(name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
