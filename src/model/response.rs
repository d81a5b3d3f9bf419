use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::EntityTag;

/// Outcome classification of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Created,
    Ok,
    NoContent,
    NotFound,
    Conflict,
    BadRequest,
    NotModified,
    UnsupportedMediaType,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NoContent => 204,
            Status::NotModified => 304,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::Conflict => 409,
            Status::UnsupportedMediaType => 415,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Status::Ok | Status::Created | Status::NoContent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageLink {
    pub href: String,
    #[serde(rename = "type")]
    pub media_type: String,
    pub title: String,
}

/// Body of error and patch outcome responses: a message plus a pointer to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBody {
    pub message: String,
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, MessageLink>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            links: BTreeMap::new(),
        }
    }

    pub fn with_link(mut self, rel: &str, link: MessageLink) -> Self {
        self.links.insert(rel.to_string(), link);
        self
    }

    /// Envelope pointing back to the greetings collection.
    pub fn with_collection_link(self) -> Self {
        self.with_link(
            "greetings",
            MessageLink {
                href: "/greetings".to_string(),
                media_type: "application/hal+json".to_string(),
                title: "List of existing greetings".to_string(),
            },
        )
    }

    pub fn into_value(self) -> Value {
        // string keys and string fields only, so conversion cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Everything the transport layer needs to answer one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: Status,
    pub body: Option<Value>,
    pub content_type: Option<String>,
    pub etag: Option<EntityTag>,
    pub last_modified: Option<DateTime<Utc>>,
    pub max_age: Option<u32>,
    pub location: Option<String>,
    pub log_token: String,
}

impl ServiceResponse {
    pub fn new(status: Status, log_token: String) -> Self {
        Self {
            status,
            body: None,
            content_type: None,
            etag: None,
            last_modified: None,
            max_age: None,
            location: None,
            log_token,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_message(self, message: MessageBody) -> Self {
        self.with_body(message.into_value())
            .with_content_type("application/hal+json")
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_etag(mut self, etag: EntityTag) -> Self {
        self.etag = Some(etag);
        self
    }

    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.last_modified = last_modified;
        self
    }

    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// The message of an envelope body, when the body is one.
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_envelope_shape() {
        let body = MessageBody::new("Sorry your greeting does not exist yet!")
            .with_collection_link()
            .into_value();
        assert_eq!(
            body.to_string(),
            "{\"message\":\"Sorry your greeting does not exist yet!\",\"_links\":{\"greetings\":\
             {\"href\":\"/greetings\",\"type\":\"application/hal+json\",\
             \"title\":\"List of existing greetings\"}}}"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Created.code(), 201);
        assert_eq!(Status::NotModified.code(), 304);
        assert_eq!(Status::Conflict.code(), 409);
        assert_eq!(Status::UnsupportedMediaType.code(), 415);
        assert!(Status::NoContent.is_success());
        assert!(!Status::BadRequest.is_success());
    }

    #[test]
    fn test_message_accessor() {
        let response = ServiceResponse::new(Status::BadRequest, "t".to_string())
            .with_message(MessageBody::new("nope"));
        assert_eq!(response.message(), Some("nope"));
        assert_eq!(response.content_type.as_deref(), Some("application/hal+json"));
    }
}
