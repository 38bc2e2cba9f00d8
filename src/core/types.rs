//! Common types shared by the frontend and the backend
//!
//! These are also the wire shapes of the command bridge, so field names
//! follow the protocol (`install_status`, `pageSize`, `keyWord`).

use serde::{Deserialize, Serialize};

use super::error::LvmError;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
}

impl Language {
    /// Get all supported languages
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Python]
    }

    /// Wire/config name of this language
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
        }
    }

    /// Human readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = LvmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "python3" => Ok(Self::Python),
            _ => Err(LvmError::UnsupportedLanguage(s.to_string())),
        }
    }
}

/// One installable runtime version and its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionItem {
    pub version: String,
    pub install_status: bool,
    #[serde(default)]
    pub use_status: bool,
}

/// A page of version records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResult {
    pub total: usize,
    pub list: Vec<VersionItem>,
}

/// Search, pagination and filter state sent with each list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayload {
    pub language: Language,
    pub page: usize,
    pub page_size: usize,
    pub key_word: String,
}

impl SearchPayload {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            page: 0,
            page_size: Self::DEFAULT_PAGE_SIZE,
            key_word: String::new(),
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

/// Reply of `list_versions`: paged when the request carried pagination,
/// a bare list otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListVersionsReply {
    Page(VersionResult),
    Flat(Vec<VersionItem>),
}

/// Number of pages needed to show `total` records
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("Python3".parse::<Language>().unwrap(), Language::Python);
        assert!(matches!(
            "ruby".parse::<Language>(),
            Err(LvmError::UnsupportedLanguage(_))
        ));
    }

    #[test]
    fn test_search_payload_wire_names() {
        let payload = SearchPayload::new(Language::Python);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "language": "python",
                "page": 0,
                "pageSize": 10,
                "keyWord": ""
            })
        );
    }

    #[test]
    fn test_version_item_defaults_use_status() {
        let item: VersionItem =
            serde_json::from_str(r#"{"version":"3.12.0","install_status":true}"#).unwrap();
        assert!(item.install_status);
        assert!(!item.use_status);
    }

    #[test]
    fn test_list_reply_shapes() {
        let page: ListVersionsReply =
            serde_json::from_str(r#"{"total":0,"list":[]}"#).unwrap();
        assert_eq!(page, ListVersionsReply::Page(VersionResult::default()));

        let flat: ListVersionsReply = serde_json::from_str("[]").unwrap();
        assert_eq!(flat, ListVersionsReply::Flat(Vec::new()));
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }
}
