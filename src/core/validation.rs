//! Input validation for version strings
//!
//! Versions end up as directory names under the base dir, so anything that
//! could escape it is rejected before the filesystem is touched.

use super::error::{LvmError, Result};

const MAX_LENGTH: usize = 64;

/// Validate a version string such as `3.12.1`
///
/// Only ASCII digits, letters (for pre-release tags like `3.13.0rc1`) and
/// dots are accepted; the value must start with a digit and cannot contain `..`.
pub fn validate_version(version: &str) -> Result<()> {
    let invalid = |reason: &str| LvmError::InvalidVersion {
        version: version.to_string(),
        reason: reason.to_string(),
    };

    if version.is_empty() {
        return Err(invalid("version cannot be empty"));
    }

    if version.len() > MAX_LENGTH {
        return Err(invalid("version too long"));
    }

    if !version.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid("version must start with a digit"));
    }

    if let Some(c) = version
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '.'))
    {
        return Err(invalid(&format!("invalid character '{c}'")));
    }

    if version.contains("..") {
        return Err(invalid("version cannot contain '..'"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_versions() {
        assert!(validate_version("3.12.1").is_ok());
        assert!(validate_version("3.13.0rc1").is_ok());
        assert!(validate_version("3").is_ok());
    }

    #[test]
    fn test_invalid_versions() {
        assert!(validate_version("").is_err());
        assert!(validate_version("../etc").is_err());
        assert!(validate_version("3..1").is_err());
        assert!(validate_version("3.12/../../x").is_err());
        assert!(validate_version("3.12;rm").is_err());
        assert!(validate_version("v3.12.1").is_err());
        assert!(validate_version(&"1".repeat(65)).is_err());
    }
}
