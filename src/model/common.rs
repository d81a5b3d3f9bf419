use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Language used when the caller states no usable preference.
pub const DEFAULT_LANGUAGE: &str = "da";

/// Path segment every greeting href is expected to live under.
pub const COLLECTION_SEGMENT: &str = "greetings/";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceIdError {
    #[error("resource id is empty")]
    Empty,
    #[error("resource id '{0}' may only contain lowercase letters, digits and '-'")]
    InvalidCharacters(String),
}

/// Lowercase token addressing one greeting, e.g. `hallo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn parse(raw: &str) -> Result<Self, ResourceIdError> {
        if raw.is_empty() {
            return Err(ResourceIdError::Empty);
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ResourceIdError::InvalidCharacters(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Derive the resource id from a link href such as `/greetings/hallo`.
    ///
    /// The segment following `greetings/` is used when present, otherwise the last
    /// non-empty path segment. The segment is taken as is, so `/greetings/Hallo` fails.
    pub fn from_href(href: &str) -> Result<Self, ResourceIdError> {
        let tail = match href.rfind(COLLECTION_SEGMENT) {
            Some(pos) => &href[pos + COLLECTION_SEGMENT.len()..],
            None => href,
        };
        let segment = tail
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .unwrap_or_default();
        Self::parse(segment)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite store key: `<resource id>_<language tag>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(resource: &ResourceId, language: &str) -> Self {
        Self(format!("{}_{}", resource.as_str(), language))
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

/// Resolve the caller's preferred language from an `Accept-Language` style list.
///
/// Entries carrying a weight (`;q=`) are skipped and the first remaining entry wins.
/// Absent, empty or fully weighted lists fall back to `default_language`.
pub fn preferred_language(preference: Option<&str>, default_language: &str) -> String {
    preference
        .unwrap_or_default()
        .split(',')
        .filter(|entry| !entry.contains(';'))
        .map(str::trim)
        .next()
        .filter(|entry| !entry.is_empty())
        .unwrap_or(default_language)
        .to_string()
}

pub fn generate_log_token() -> String {
    Uuid::new_v4().to_string()
}

/// Pass a caller supplied correlation token through, or mint a fresh one.
pub fn resolve_log_token(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => generate_log_token(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_language_defaults() {
        assert_eq!(preferred_language(None, DEFAULT_LANGUAGE), "da");
        assert_eq!(preferred_language(Some(""), DEFAULT_LANGUAGE), "da");
        assert_eq!(preferred_language(Some("en;q=0.8"), DEFAULT_LANGUAGE), "da");
        assert_eq!(preferred_language(Some(" , fr"), DEFAULT_LANGUAGE), "da");
    }

    #[test]
    fn test_preferred_language_first_unweighted_entry() {
        assert_eq!(
            preferred_language(Some("da, en-gb;q=0.9, en;q=0.8, fr;q=0.5"), "da"),
            "da"
        );
        assert_eq!(
            preferred_language(Some("en, da;q=0.9, en-gb;q=0.8"), "da"),
            "en"
        );
        assert_eq!(preferred_language(Some("en-gb;q=0.9, en"), "da"), "en");
        assert_eq!(preferred_language(Some(" en-gb"), "da"), "en-gb");
    }

    #[test]
    fn test_resource_id_from_href() {
        assert_eq!(
            ResourceId::from_href("/greetings/hallo").unwrap().as_str(),
            "hallo"
        );
        // mixed case is not folded into a different id
        assert_eq!(
            ResourceId::from_href("greetings/Allo"),
            Err(ResourceIdError::InvalidCharacters("Allo".to_string()))
        );
        assert!(ResourceId::from_href("/greetings/HALLO").is_err());
        assert_eq!(
            ResourceId::from_href("http://host/greetings/hej-sa/").unwrap().as_str(),
            "hej-sa"
        );
        assert_eq!(ResourceId::from_href("/greetings/"), Err(ResourceIdError::Empty));
        assert!(ResourceId::from_href("/greetings/hæ").is_err());
    }

    #[test]
    fn test_resource_id_parse_rejects_uppercase() {
        assert!(ResourceId::parse("hallo").is_ok());
        assert!(ResourceId::parse("hallo-2").is_ok());
        assert!(matches!(
            ResourceId::parse("Hallo"),
            Err(ResourceIdError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn test_storage_key_format() {
        let id = ResourceId::parse("hallo").unwrap();
        assert_eq!(StorageKey::new(&id, "en").as_str(), "hallo_en");
    }

    #[test]
    fn test_log_token_passthrough_or_generated() {
        assert_eq!(resolve_log_token(Some("abc-123")), "abc-123");
        let generated = resolve_log_token(Some(""));
        assert_eq!(generated.len(), 36);
        assert_ne!(resolve_log_token(None), resolve_log_token(None));
    }
}
