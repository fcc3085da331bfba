//! Path utilities

use std::path::Path;

/// Normalize path separators to forward slashes (virtual corpus paths)
pub fn normalize_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().replace('\\', "/")
}

/// Get relative path and normalize separators
pub fn relative_path<P: AsRef<Path>>(path: P, base: P) -> Option<String> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(normalize_path)
}

/// Last component of a virtual path (`a/b/c.ydr` -> `c.ydr`)
pub fn file_name(virtual_path: &str) -> &str {
    virtual_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(virtual_path)
}

/// Name of the directory containing a virtual path (`a/b/c.ydr` -> `b`)
pub fn parent_dir_name(virtual_path: &str) -> Option<&str> {
    let mut parts = virtual_path.rsplit(['/', '\\']);
    parts.next()?;
    parts.next().filter(|p| !p.is_empty())
}

/// Split a file name into (stem, extension) at the last dot.
///
/// The extension is returned without the dot; names without a dot have an empty extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx + 1..]),
        _ => (name, ""),
    }
}
