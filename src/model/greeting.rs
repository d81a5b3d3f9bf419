use crate::model::{ResourceId, ResourceIdError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media type carried on the self link of stored greetings.
pub const GREETING_LINK_TYPE: &str = "application/hal+json;concept=greeting";

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("greeting could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("greeting href does not name a resource: {0}")]
    InvalidHref(#[from] ResourceIdError),
}

/// The language and country as named by the people using the greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingNative {
    pub language: String,
    pub country: String,
}

impl GreetingNative {
    pub fn new(language: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
        }
    }
}

/// Canonical location and display title of one greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingLink {
    pub href: String,
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(rename = "hreflang", default, skip_serializing_if = "Option::is_none")]
    pub language_tag: Option<String>,
    #[serde(rename = "seen", default, skip_serializing_if = "Option::is_none")]
    pub seen_at: Option<DateTime<Utc>>,
}

impl GreetingLink {
    pub fn new(href: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            title: title.into(),
            media_type: None,
            language_tag: None,
            seen_at: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_language_tag(mut self, language_tag: impl Into<String>) -> Self {
        self.language_tag = Some(language_tag.into());
        self
    }

    pub fn with_seen_at(mut self, seen_at: DateTime<Utc>) -> Self {
        self.seen_at = Some(seen_at);
        self
    }
}

/// A stored greeting.
///
/// Serializes in the HAL shape of the latest representation version, with the self
/// link nested under `_links.self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreetingRecord {
    pub greeting: String,
    pub language: String,
    pub country: String,
    pub native: GreetingNative,
    #[serde(rename = "_links", with = "self_link")]
    pub self_link: GreetingLink,
}

impl GreetingRecord {
    pub fn new(
        greeting: impl Into<String>,
        language: impl Into<String>,
        country: impl Into<String>,
        native: GreetingNative,
        self_link: GreetingLink,
    ) -> Self {
        Self {
            greeting: greeting.into(),
            language: language.into(),
            country: country.into(),
            native,
            self_link,
        }
    }

    /// Parse a request payload into a record.
    pub fn from_json(body: &[u8]) -> Result<Self, ContentError> {
        let record: GreetingRecord = serde_json::from_slice(body)?;
        record.resource_id()?;
        Ok(record)
    }

    /// The lowercase resource id named by the self link.
    pub fn resource_id(&self) -> Result<ResourceId, ResourceIdError> {
        ResourceId::from_href(&self.self_link.href)
    }
}

/// (De)serializes a bare link as `{"self": link}`.
mod self_link {
    use super::GreetingLink;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct LinksRef<'a> {
        #[serde(rename = "self")]
        self_link: &'a GreetingLink,
    }

    #[derive(Deserialize)]
    struct Links {
        #[serde(rename = "self")]
        self_link: GreetingLink,
    }

    pub fn serialize<S>(link: &GreetingLink, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        LinksRef { self_link: link }.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<GreetingLink, D::Error>
    where
        D: Deserializer<'de>,
    {
        Links::deserialize(deserializer).map(|links| links.self_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALLOJ: &str = r#"{
        "greeting": "Halløj!",
        "language": "Dansk",
        "country": "Danmark",
        "native": {"language": "Dansk", "country": "Danmark"},
        "_links": {"self": {"href": "greetings/halloj", "title": "Dansk Hilsen Halløj"}}
    }"#;

    #[test]
    fn test_parse_payload() {
        let record = GreetingRecord::from_json(HALLOJ.as_bytes()).unwrap();
        assert_eq!(record.greeting, "Halløj!");
        assert_eq!(record.native, GreetingNative::new("Dansk", "Danmark"));
        assert_eq!(record.self_link.href, "greetings/halloj");
        assert_eq!(record.self_link.media_type, None);
        assert_eq!(record.resource_id().unwrap().as_str(), "halloj");
    }

    #[test]
    fn test_serialized_shape_is_hal() {
        let record = GreetingRecord::new(
            "Hello!",
            "English",
            "England",
            GreetingNative::new("English", "England"),
            GreetingLink::new("/greetings/hello", "English Greeting Hello")
                .with_media_type(GREETING_LINK_TYPE)
                .with_language_tag("en"),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            "{\"greeting\":\"Hello!\",\"language\":\"English\",\"country\":\"England\",\
             \"native\":{\"language\":\"English\",\"country\":\"England\"},\
             \"_links\":{\"self\":{\"href\":\"/greetings/hello\",\
             \"title\":\"English Greeting Hello\",\
             \"type\":\"application/hal+json;concept=greeting\",\"hreflang\":\"en\"}}}"
        );
    }

    #[test]
    fn test_seen_at_survives_json() {
        let record = GreetingRecord::new(
            "Hej!",
            "Dansk",
            "Danmark",
            GreetingNative::new("Dansk", "Danmark"),
            GreetingLink::new("/greetings/hej", "Hej").with_seen_at(Utc::now()),
        );
        let json = serde_json::to_vec(&record).unwrap();
        let parsed = GreetingRecord::from_json(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_rejects_missing_links_and_bad_href() {
        let missing_links = r#"{
            "greeting": "x",
            "language": "y",
            "country": "z",
            "native": {"language": "a", "country": "b"}
        }"#;
        assert!(matches!(
            GreetingRecord::from_json(missing_links.as_bytes()),
            Err(ContentError::Malformed(_))
        ));

        let bad_href = HALLOJ.replace("greetings/halloj", "greetings/");
        assert!(matches!(
            GreetingRecord::from_json(bad_href.as_bytes()),
            Err(ContentError::InvalidHref(_))
        ));

        let shouted = HALLOJ.replace("greetings/halloj", "greetings/HALLOJ");
        assert!(matches!(
            GreetingRecord::from_json(shouted.as_bytes()),
            Err(ContentError::InvalidHref(_))
        ));
    }
}
