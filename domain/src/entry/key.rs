//! Storage keys: one list per `(service, severity)` pair.

use crate::severity::Severity;
use std::fmt;

/// Key of the list a service's messages of one tag are pushed onto.
///
/// Rendered on the wire as `"{service}:{tag}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Build the key for an arbitrary tag.
    pub fn new(service_name: &str, tag: &str) -> Self {
        Self(format!("{}:{}", service_name, tag))
    }

    /// Build the key for a severity list.
    pub fn for_severity(service_name: &str, severity: Severity) -> Self {
        Self::new(service_name, severity.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = StorageKey::for_severity("billing", Severity::Warn);
        assert_eq!(key.as_str(), "billing:warn");
        assert_eq!(key.to_string(), "billing:warn");
    }

    #[test]
    fn test_raw_tag_key() {
        assert_eq!(StorageKey::new("default", "audit").as_str(), "default:audit");
    }
}
