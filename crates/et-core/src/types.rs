//! Core type definitions with validation.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Identifies an open document by its full name at the time of tracking.
///
/// For documents saved to disk the full name is the absolute path; unsaved
/// documents carry whatever name the host assigned (e.g. `Book1`). Keys must
/// be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Creates a new key after validation.
    pub fn new(full_name: impl Into<String>) -> Result<Self, ValidationError> {
        let full_name = full_name.into();
        if full_name.is_empty() {
            return Err(ValidationError::Empty {
                field: "document key",
            });
        }
        Ok(Self(full_name))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The document's file name, i.e. the last path component.
    ///
    /// Both `/` and `\` separate components, so keys recorded on either
    /// platform split the same way.
    pub fn file_name(&self) -> &str {
        self.split().1
    }

    /// The directory containing the document, if the key is a path.
    pub fn directory(&self) -> Option<&Path> {
        self.split().0.map(Path::new)
    }

    fn split(&self) -> (Option<&str>, &str) {
        match self.0.rfind(['/', '\\']) {
            // Keep the root separator for documents directly under it.
            Some(0) => (Some(&self.0[..1]), &self.0[1..]),
            Some(idx) => (Some(&self.0[..idx]), &self.0[idx + 1..]),
            None => (None, &self.0),
        }
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DocumentKey {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_key() {
        let err = DocumentKey::new("").unwrap_err();
        assert_eq!(err.to_string(), "document key cannot be empty");
    }

    #[test]
    fn file_name_and_directory_from_path() {
        let key = DocumentKey::new("/home/ana/reports/Q3.xlsx").unwrap();
        assert_eq!(key.file_name(), "Q3.xlsx");
        assert_eq!(key.directory(), Some(Path::new("/home/ana/reports")));
    }

    #[test]
    fn unsaved_document_has_no_directory() {
        let key = DocumentKey::new("Book1").unwrap();
        assert_eq!(key.file_name(), "Book1");
        assert_eq!(key.directory(), None);
    }

    #[test]
    fn windows_style_key_splits_on_backslash() {
        let key = DocumentKey::new(r"C:\Users\ana\XLSTART\PERSONAL.XLSB").unwrap();
        assert_eq!(key.file_name(), "PERSONAL.XLSB");
        assert_eq!(key.directory(), Some(Path::new(r"C:\Users\ana\XLSTART")));
    }

    #[test]
    fn root_level_document() {
        let key = DocumentKey::new("/a.xlsx").unwrap();
        assert_eq!(key.file_name(), "a.xlsx");
        assert_eq!(key.directory(), Some(Path::new("/")));
    }

    #[test]
    fn deserialize_validates() {
        let key: DocumentKey = serde_json::from_str(r#""/tmp/a.xlsx""#).unwrap();
        assert_eq!(key.as_str(), "/tmp/a.xlsx");

        let result: Result<DocumentKey, _> = serde_json::from_str(r#""""#);
        assert!(result.is_err());
    }
}
