//! Canonical folder path rules.
//!
//! A folder path is the `/`-joined chain of slugs from a case root down to
//! the folder itself, e.g. `financial-statements/2023`. Slugs are derived
//! from the display names advisors type, so `"Financial  Statements"` and
//! `"financial statements"` collide on purpose. Every function here is pure
//! and deterministic; path uniqueness under concurrent writers depends on it.

use crate::error::AppError;
use crate::result::AppResult;

/// Separator between path segments.
pub const SEPARATOR: char = '/';

/// Maximum number of ancestors a folder may have (root folders are depth 0).
pub const MAX_DEPTH: i32 = 5;

/// Maximum length of a single folder name, in characters.
pub const MAX_NAME_LEN: usize = 255;

const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Normalize a display name into its slug.
///
/// Trims, lower-cases, and collapses every run of internal whitespace into a
/// single `-`.
pub fn normalize(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Folder name exceeds {MAX_NAME_LEN} characters"
        )));
    }
    if trimmed == "." || trimmed.contains("..") {
        return Err(AppError::validation(format!(
            "Folder name '{trimmed}' must not contain path traversal"
        )));
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
    {
        return Err(AppError::validation(format!(
            "Folder name contains illegal character {bad:?}"
        )));
    }

    let slug = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    Ok(slug)
}

/// Join a parent path (or `None` for a case root) with a child slug.
pub fn join(parent: Option<&str>, slug: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{parent}{SEPARATOR}{slug}"),
        _ => slug.to_string(),
    }
}

/// Split a canonical path into its ordered slugs.
pub fn split(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// Canonicalize a caller-supplied path.
///
/// Leading, trailing, and doubled separators are ignored and every segment
/// is normalized, so `"/Financial/Statements/"` becomes
/// `"financial/statements"`.
pub fn canonicalize(path: &str) -> AppResult<String> {
    let segments = path
        .split(SEPARATOR)
        .filter(|segment| !segment.trim().is_empty())
        .map(normalize)
        .collect::<AppResult<Vec<_>>>()?;

    if segments.is_empty() {
        return Err(AppError::validation("Folder path cannot be empty"));
    }
    Ok(segments.join("/"))
}

/// Every ancestor prefix of a canonical path, root first, ending with the
/// path itself.
pub fn prefixes(path: &str) -> Vec<String> {
    let segments = split(path);
    (1..=segments.len())
        .map(|n| segments[..n].join("/"))
        .collect()
}

/// Depth of a canonical path (number of ancestors).
pub fn depth(path: &str) -> i32 {
    path.matches(SEPARATOR).count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_normalize_lowercases_and_collapses_whitespace() {
        assert_eq!(
            normalize("  Financial \t Statements ").unwrap(),
            "financial-statements"
        );
        assert_eq!(normalize("2023").unwrap(), "2023");
        assert_eq!(normalize("Correspondence").unwrap(), "correspondence");
    }

    #[test]
    fn test_normalize_is_case_insensitive() {
        assert_eq!(
            normalize("Correspondence").unwrap(),
            normalize("correspondence").unwrap()
        );
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        for bad in [
            "", "   ", "a/b", "a\\b", "..", "x..y", ".", "bad:name", "tab\u{7}bell",
        ] {
            let err = normalize(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "input {bad:?}");
        }
    }

    #[test]
    fn test_normalize_rejects_overlong_name() {
        let long = "a".repeat(MAX_NAME_LEN + 1);
        assert_eq!(normalize(&long).unwrap_err().kind, ErrorKind::Validation);
        assert!(normalize(&"a".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_join_and_split_round_trip() {
        let paths = ["financial", "financial/statements", "a/b/c/d/e/f"];
        for path in paths {
            let mut rebuilt: Option<String> = None;
            for slug in split(path) {
                rebuilt = Some(join(rebuilt.as_deref(), slug));
            }
            assert_eq!(rebuilt.as_deref(), Some(path));
        }
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(
            canonicalize("/Financial/Statements/").unwrap(),
            "financial/statements"
        );
        assert_eq!(canonicalize("a//b").unwrap(), "a/b");
        assert_eq!(canonicalize("/").unwrap_err().kind, ErrorKind::Validation);
        assert_eq!(
            canonicalize("financial/../secrets").unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_prefixes_and_depth() {
        assert_eq!(
            prefixes("financial/statements/2023"),
            vec![
                "financial".to_string(),
                "financial/statements".to_string(),
                "financial/statements/2023".to_string(),
            ]
        );
        assert_eq!(depth("financial"), 0);
        assert_eq!(depth("financial/statements/2023"), 2);
    }
}
