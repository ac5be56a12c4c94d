//! Typed path parameter helpers.

use casefile_core::error::AppError;
use casefile_core::types::{CaseId, FileId};

/// Parses a case id from a path segment.
pub fn parse_case_id(s: &str) -> Result<CaseId, AppError> {
    s.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .map(CaseId)
        .ok_or_else(|| AppError::validation(format!("Invalid case id: {s}")))
}

/// Parses a file id from a path segment.
pub fn parse_file_id(s: &str) -> Result<FileId, AppError> {
    s.parse::<FileId>()
        .map_err(|_| AppError::validation(format!("Invalid file id: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_id() {
        assert_eq!(parse_case_id("42").unwrap(), CaseId(42));
        assert!(parse_case_id("0").is_err());
        assert!(parse_case_id("abc").is_err());
    }
}
