use std::path::Path;

/// Reduces a client-supplied filename to its last path component.
///
/// Browsers on Windows may send the full local path with backslashes, so both
/// separators are stripped. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let last = raw.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    let name = Path::new(last).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Unit identifiers become part of a file name, so only a safe charset is
/// accepted.
pub fn is_valid_unit_id(unit: &str) -> bool {
    !unit.is_empty()
        && unit
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
