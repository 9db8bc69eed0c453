//! Collision-free sibling names.

use std::path::Path;

/// Returns a name that does not currently exist in `dir`.
///
/// A parenthesized zero-based counter is inserted before the extension for
/// file names that have one (`report.doc` → `report (0).doc`) and appended
/// otherwise (`archive` → `archive (0)`); directories always get the
/// suffix form. The counter is incremented and retested until a free name
/// is found, so each call performs at least one existence probe and is
/// blocking. Probes use `symlink_metadata`, so dangling symlinks still
/// count as occupied.
pub fn unique_name(dir: &Path, desired: &str, is_directory: bool) -> String {
    let (stem, ext) = if is_directory {
        (desired, None)
    } else {
        split_extension(desired)
    };

    let mut n: u64 = 0;
    loop {
        let candidate = match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        if std::fs::symlink_metadata(dir.join(&candidate)).is_err() {
            return candidate;
        }
        n += 1;
    }
}

/// Splits at the last dot, except a dot in the leading or trailing
/// position (dotfiles and `name.` have no extension).
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => (&name[..idx], Some(&name[idx + 1..])),
        _ => (name, None),
    }
}
