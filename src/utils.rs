use std::path::{Component, Path, PathBuf};

/// Normalize a lesson title into a directory name.
///
/// Inserts a space after every hyphen, drops everything from the first `(`
/// (difficulty tags and the like) and trims the result.
pub fn lesson_name(raw: &str) -> String {
    let spaced = raw.trim().replace('-', "- ");
    let cut = match spaced.find('(') {
        Some(idx) => &spaced[..idx],
        None => &spaced,
    };
    cut.trim().to_string()
}

/// Normalize a challenge title into a directory name by replacing every `?`
pub fn challenge_name(raw: &str) -> String {
    raw.trim().replace('?', " ")
}

/// Extract the level from a label like `Difficulty: Medium`.
///
/// Labels without a colon are used whole.
pub fn level_label(raw: &str) -> String {
    let rest = match raw.find(':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };
    rest.trim().to_string()
}

/// Directory name of a lesson challenge: `[<level>] <name>`
pub fn leveled_dir_name(level: Option<&str>, name: &str) -> String {
    format!("[{}] {}", level.unwrap_or_default(), name)
}

/// Relative directory path for a scraped name.
///
/// Separators inside the name still nest directories, but root, drive
/// prefix, `.` and `..` components are dropped so the result never leaves
/// the directory it is joined onto.
pub fn path_segment(name: &str) -> PathBuf {
    Path::new(name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}

/// Append a path segment to a page URL, e.g. `/writeups`
pub fn sub_page(url: &str, segment: &str) -> String {
    format!("{}/{}", url.trim_end_matches('/'), segment)
}
