//! Name rules shared by scenes, sub-projects, categories and user initials.

use regex_lite::Regex;

use crate::error::{LedgerError, Result};

/// Names end up inside file names on a shared drive, so the alphabet is
/// restricted to ASCII letters, digits, `_` and `-`.
fn name_pattern() -> &'static Regex {
    static NAME_RE: once_cell::sync::OnceCell<Regex> = once_cell::sync::OnceCell::new();
    #[allow(clippy::expect_used)]
    NAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid name regex"))
}

/// Replace spaces with `_` and validate the result.
pub fn normalize_name(text: &str) -> Result<String> {
    let candidate = text.replace(' ', "_");
    if name_pattern().is_match(&candidate) {
        Ok(candidate)
    } else {
        Err(LedgerError::InvalidName {
            name: text.to_string(),
        })
    }
}

pub fn is_valid_name(text: &str) -> bool {
    normalize_name(text).is_ok()
}

/// `v001`-style label for a 1-based version number.
pub fn version_label(version: usize, padding: usize) -> String {
    format!("v{version:0padding$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_allowed_alphabet() {
        for name in ["ShotA", "shot_010", "char-rig", "A", "0", "__", "Bob-2_x"] {
            assert_eq!(normalize_name(name).expect(name), name);
        }
    }

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(normalize_name("Shot A 01").expect("valid"), "Shot_A_01");
    }

    #[test]
    fn rejects_everything_else() {
        for name in [
            "",
            "a/b",
            "a\\b",
            "mail@host",
            "Şahin",
            "shot.01",
            "tab\there",
            "new\nline",
            "..",
            "ümlaut",
        ] {
            let err = normalize_name(name).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidName { .. }), "{name:?}");
        }
    }

    #[test]
    fn invalid_name_keeps_original_text() {
        let err = normalize_name("bad name/").unwrap_err();
        match err {
            LedgerError::InvalidName { name } => assert_eq!(name, "bad name/"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn labels_are_zero_padded() {
        assert_eq!(version_label(1, 3), "v001");
        assert_eq!(version_label(42, 3), "v042");
        assert_eq!(version_label(1234, 3), "v1234");
        assert_eq!(version_label(7, 4), "v0007");
    }
}
