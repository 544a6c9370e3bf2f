//! Upload file-name sanitizing.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename regex"));

#[cfg(windows)]
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduce an uploaded file name to something safe to store and serve.
///
/// The name is NFKD-decomposed and whatever is still non-ASCII is dropped,
/// so accents fall away but the base letters stay. Path separators and whitespace runs
/// become `_`, anything outside `[A-Za-z0-9_.-]` is removed and leading or
/// trailing `.`/`_` are stripped. Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let ascii: String = raw
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let stripped = DISALLOWED.replace_all(&joined, "");
    let trimmed = stripped.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        return None;
    }

    // Reserved device names would open the device instead of a file
    #[cfg(windows)]
    {
        let stem = trimmed.split('.').next().unwrap_or_default().to_ascii_uppercase();
        if WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
            return Some(format!("_{}", trimmed));
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(sanitize_filename("hello.txt").as_deref(), Some("hello.txt"));
        assert_eq!(sanitize_filename("report-2024_v2.pdf").as_deref(), Some("report-2024_v2.pdf"));
    }

    #[test]
    fn test_traversal_is_flattened() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("etc_passwd"));
        assert_eq!(sanitize_filename("..\\..\\boot.ini").as_deref(), Some("boot.ini"));
    }

    #[test]
    fn test_whitespace_and_symbols() {
        assert_eq!(sanitize_filename("my  cool file.txt").as_deref(), Some("my_cool_file.txt"));
        assert_eq!(sanitize_filename("a$b%c.txt").as_deref(), Some("abc.txt"));
    }

    #[test]
    fn test_accents_decompose_to_ascii() {
        assert_eq!(sanitize_filename("résumé.pdf").as_deref(), Some("resume.pdf"));
        assert_eq!(sanitize_filename("Ångström naïve.txt").as_deref(), Some("Angstrom_naive.txt"));
        // Compatibility forms fold too
        assert_eq!(sanitize_filename("ﬁle.txt").as_deref(), Some("file.txt"));
    }

    #[test]
    fn test_unusable_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("..."), None);
        assert_eq!(sanitize_filename("///"), None);
        assert_eq!(sanitize_filename("日本語"), None);
    }

    #[cfg(windows)]
    #[test]
    fn test_device_names_prefixed() {
        assert_eq!(sanitize_filename("con.txt").as_deref(), Some("_con.txt"));
        assert_eq!(sanitize_filename("LPT1").as_deref(), Some("_LPT1"));
    }

    #[cfg(not(windows))]
    #[test]
    fn test_device_names_kept_off_windows() {
        assert_eq!(sanitize_filename("con.txt").as_deref(), Some("con.txt"));
        assert_eq!(sanitize_filename("LPT1").as_deref(), Some("LPT1"));
    }

    #[test]
    fn test_output_never_starts_or_ends_with_dot_or_underscore() {
        for raw in ["_a_", ".hidden", "con.txt", "__init__.py", "x."] {
            if let Some(name) = sanitize_filename(raw) {
                assert!(!name.starts_with(['.', '_']), "{raw:?} -> {name:?}");
                assert!(!name.ends_with(['.', '_']), "{raw:?} -> {name:?}");
            }
        }
    }

    #[test]
    fn test_output_never_has_separators() {
        for raw in ["a/b", "a\\b", " / ", "x/../y\\z", "\t.\n/_"] {
            if let Some(name) = sanitize_filename(raw) {
                assert!(!name.is_empty());
                assert!(!name.contains('/') && !name.contains('\\'), "{raw:?} -> {name:?}");
            }
        }
    }
}
