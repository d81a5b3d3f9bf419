//! Content negotiation across the historical response shapes.
//!
//! Each registry maps the caller's literal `Accept` value onto one version of a
//! concept. Several identifiers may resolve to the same version: unversioned
//! requests get the latest shape. Identifiers that are not registered fall back to
//! `415 Unsupported Media Type`.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::config::ServiceConfig;
use crate::logic::conditional::{entity_tag, evaluate, EntityTag, Evaluation, Safety};
use crate::model::{GreetingRecord, Preconditions, ServiceResponse, Status};

#[derive(Debug, Clone)]
pub struct MediaTypeRegistry<V: Copy> {
    entries: Vec<(&'static str, V)>,
}

/// Result of looking up a negotiated media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<V> {
    Strategy(V),
    Unsupported,
}

impl<V: Copy> MediaTypeRegistry<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(mut self, identifier: &'static str, version: V) -> Self {
        self.entries.push((identifier, version));
        self
    }

    /// Exact-string lookup of the negotiated media type.
    pub fn dispatch(&self, accept: Option<&str>) -> Dispatch<V> {
        accept
            .and_then(|accept| {
                self.entries
                    .iter()
                    .find(|(identifier, _)| *identifier == accept)
            })
            .map_or(Dispatch::Unsupported, |(_, version)| {
                Dispatch::Strategy(*version)
            })
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(identifier, _)| *identifier)
    }
}

impl<V: Copy> Default for MediaTypeRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs shared by every strategy when answering a read.
#[derive(Debug)]
pub struct DeliveryContext<'a> {
    pub preconditions: &'a Preconditions,
    pub config: &'a ServiceConfig,
    /// Store change token, present for collection reads.
    pub change_token: Option<&'a str>,
    pub log_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validators {
    pub tag: EntityTag,
    pub last_modified: Option<DateTime<Utc>>,
}

/// One version's response shape and cache policy.
pub trait RepresentationStrategy {
    type Source: ?Sized;

    fn content_type(&self) -> String;
    fn max_age(&self, config: &ServiceConfig) -> u32;
    fn render(&self, source: &Self::Source) -> Value;
    fn validators(&self, rendered: &str, context: &DeliveryContext<'_>) -> Validators;
}

/// Render, validate against the caller's preconditions, and answer.
pub fn deliver<R: RepresentationStrategy>(
    strategy: &R,
    source: &R::Source,
    context: DeliveryContext<'_>,
) -> ServiceResponse {
    let body = strategy.render(source);
    let validators = strategy.validators(&body.to_string(), &context);
    let response = ServiceResponse::new(Status::Ok, context.log_token)
        .with_etag(validators.tag.clone())
        .with_last_modified(validators.last_modified);

    match evaluate(
        context.preconditions,
        Safety::Safe,
        &validators.tag,
        validators.last_modified,
    ) {
        Evaluation::NotModified => ServiceResponse {
            status: Status::NotModified,
            ..response
        },
        _ => response
            .with_body(body)
            .with_content_type(strategy.content_type())
            .with_max_age(strategy.max_age(context.config)),
    }
}

pub fn unsupported_media_type(log_token: String) -> ServiceResponse {
    ServiceResponse::new(Status::UnsupportedMediaType, log_token)
}

/// Versions of the single greeting concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingVersion {
    /// Greeting, language and country with a flat link; no native information.
    V1,
    /// Adds `native`.
    V2,
    /// Nests the link under `_links.self`.
    V3,
    /// Full record including link type, hreflang and seen.
    V4,
}

impl GreetingVersion {
    pub const LATEST: GreetingVersion = GreetingVersion::V4;

    pub fn number(self) -> u8 {
        match self {
            GreetingVersion::V1 => 1,
            GreetingVersion::V2 => 2,
            GreetingVersion::V3 => 3,
            GreetingVersion::V4 => 4,
        }
    }

    pub fn registry() -> MediaTypeRegistry<Self> {
        MediaTypeRegistry::new()
            .register("application/json", Self::LATEST)
            .register("application/hal+json", Self::LATEST)
            .register("application/hal+json;concept=greeting", Self::LATEST)
            .register("application/hal+json;concept=greeting;v=4", Self::V4)
            .register("application/hal+json;concept=greeting;v=3", Self::V3)
            .register("application/hal+json;concept=greeting;v=2", Self::V2)
            .register("application/hal+json;concept=greeting;v=1", Self::V1)
    }
}

impl RepresentationStrategy for GreetingVersion {
    type Source = GreetingRecord;

    fn content_type(&self) -> String {
        format!("application/hal+json;concept=greeting;v={}", self.number())
    }

    fn max_age(&self, config: &ServiceConfig) -> u32 {
        config.item_max_age
    }

    fn render(&self, record: &GreetingRecord) -> Value {
        let flat_link = json!({
            "href": record.self_link.href,
            "title": record.self_link.title,
        });
        match self {
            GreetingVersion::V1 => json!({
                "greeting": record.greeting,
                "language": record.language,
                "country": record.country,
                "_links": flat_link,
            }),
            GreetingVersion::V2 => json!({
                "greeting": record.greeting,
                "language": record.language,
                "country": record.country,
                "native": record.native,
                "_links": flat_link,
            }),
            GreetingVersion::V3 => json!({
                "greeting": record.greeting,
                "language": record.language,
                "country": record.country,
                "native": record.native,
                "_links": { "self": flat_link },
            }),
            GreetingVersion::V4 => serde_json::to_value(record).unwrap_or(Value::Null),
        }
    }

    fn validators(&self, rendered: &str, context: &DeliveryContext<'_>) -> Validators {
        Validators {
            tag: entity_tag(rendered),
            last_modified: Some(context.config.last_modified()),
        }
    }
}

/// Tag of the latest representation; the lock token writes are checked against.
pub fn canonical_tag(record: &GreetingRecord) -> EntityTag {
    entity_tag(&GreetingVersion::LATEST.render(record).to_string())
}

/// Versions of the greetings collection concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreetingsVersion {
    /// Legacy envelope listing links only.
    V1,
    /// HAL collection with links and embedded greetings.
    V2,
}

impl GreetingsVersion {
    pub const LATEST: GreetingsVersion = GreetingsVersion::V2;

    pub fn number(self) -> u8 {
        match self {
            GreetingsVersion::V1 => 1,
            GreetingsVersion::V2 => 2,
        }
    }

    pub fn registry() -> MediaTypeRegistry<Self> {
        MediaTypeRegistry::new()
            .register("application/json", Self::LATEST)
            .register("application/hal+json", Self::LATEST)
            .register("application/hal+json;concept=greetings", Self::LATEST)
            .register("application/hal+json;concept=greetings;v=2", Self::V2)
            .register("application/hal+json;concept=greetings;v=1", Self::V1)
    }
}

impl RepresentationStrategy for GreetingsVersion {
    type Source = [GreetingRecord];

    fn content_type(&self) -> String {
        format!("application/hal+json;concept=greetings;v={}", self.number())
    }

    fn max_age(&self, config: &ServiceConfig) -> u32 {
        config.list_max_age
    }

    fn render(&self, records: &[GreetingRecord]) -> Value {
        match self {
            GreetingsVersion::V1 => {
                let links: Vec<Value> = records
                    .iter()
                    .map(|r| json!({ "href": r.self_link.href, "title": r.self_link.title }))
                    .collect();
                json!({
                    "greetings": {
                        "info": "a list containing current greetings",
                        "_links": {
                            "self": {
                                "href": "/greetings",
                                "type": "application/hal+json;concept=greetinglist;v=1",
                                "title": "List of Greetings",
                            },
                            "greetings": links,
                        },
                    }
                })
            }
            GreetingsVersion::V2 => {
                let links: Vec<Value> = records
                    .iter()
                    .map(|r| {
                        let mut link = json!({
                            "href": r.self_link.href,
                            "title": r.self_link.title,
                        });
                        if let Some(media_type) = &r.self_link.media_type {
                            link["type"] = json!(media_type);
                        }
                        link
                    })
                    .collect();
                let embedded: Vec<Value> = records
                    .iter()
                    .map(|r| GreetingVersion::LATEST.render(r))
                    .collect();
                json!({
                    "info": "a list containing current greetings",
                    "_links": {
                        "self": {
                            "href": "/greetings",
                            "name": "greetingslist",
                            "title": "A list of greetings",
                            "type": "application/hal+json;concept=greetings",
                        },
                        "greetings": links,
                    },
                    "_embedded": { "greetings": embedded },
                })
            }
        }
    }

    fn validators(&self, rendered: &str, context: &DeliveryContext<'_>) -> Validators {
        // collection freshness follows the store, not the rendered text
        let seed = context.change_token.unwrap_or(rendered);
        Validators {
            tag: entity_tag(seed),
            last_modified: None,
        }
    }
}
