use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use chrono::{DateTime, Utc};
use std::convert::Infallible;

use crate::model::{Preconditions, RequestContext};

/// Correlation token header, read on requests and echoed on every response.
pub const LOG_TOKEN_HEADER: &str = "x-log-token";

/// Axum extractor for RequestContext from request headers
///
/// - Accept: negotiated media type, taken verbatim
/// - Accept-Language: preference list for the storage key
/// - Content-Type: media type of the request body
/// - X-Log-Token: caller correlation token
/// - If-None-Match / If-Match / If-Modified-Since: preconditions
///
/// Never rejects; unreadable or unparseable headers count as absent.
#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(context_from_headers(&parts.headers))
    }
}

pub fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    let if_modified_since = extract_header_value(headers, header::IF_MODIFIED_SINCE.as_str())
        .and_then(|s| DateTime::parse_from_rfc2822(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    RequestContext {
        accept: extract_header_value(headers, header::ACCEPT.as_str()),
        accept_language: extract_header_value(headers, header::ACCEPT_LANGUAGE.as_str()),
        content_type: extract_header_value(headers, header::CONTENT_TYPE.as_str()),
        log_token: extract_header_value(headers, LOG_TOKEN_HEADER),
        preconditions: Preconditions {
            if_none_match: extract_header_value(headers, header::IF_NONE_MATCH.as_str()),
            if_match: extract_header_value(headers, header::IF_MATCH.as_str()),
            if_modified_since,
        },
    }
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}
