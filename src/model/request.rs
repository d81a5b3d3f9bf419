use chrono::{DateTime, Utc};

/// Caller supplied validators, taken from the conditional request headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    /// Freshness validator on reads, optimistic-lock token on writes.
    pub if_none_match: Option<String>,
    /// Explicit lock token for writes; wins over `if_none_match` when both are sent.
    pub if_match: Option<String>,
    pub if_modified_since: Option<DateTime<Utc>>,
}

impl Preconditions {
    /// The token a write must present to prove the caller's view is current.
    pub fn lock_token(&self) -> Option<&str> {
        self.if_match.as_deref().or(self.if_none_match.as_deref())
    }

    pub fn has_conditions(&self) -> bool {
        self.if_none_match.is_some() || self.if_match.is_some() || self.if_modified_since.is_some()
    }
}

/// Transport-agnostic view of one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Negotiated response media type, matched verbatim against the registries.
    pub accept: Option<String>,
    pub accept_language: Option<String>,
    /// Media type of the request body, if any.
    pub content_type: Option<String>,
    pub log_token: Option<String>,
    pub preconditions: Preconditions,
}

impl RequestContext {
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_language(mut self, accept_language: impl Into<String>) -> Self {
        self.accept_language = Some(accept_language.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_log_token(mut self, log_token: impl Into<String>) -> Self {
        self.log_token = Some(log_token.into());
        self
    }

    pub fn with_if_none_match(mut self, tag: impl Into<String>) -> Self {
        self.preconditions.if_none_match = Some(tag.into());
        self
    }

    pub fn with_if_match(mut self, tag: impl Into<String>) -> Self {
        self.preconditions.if_match = Some(tag.into());
        self
    }

    pub fn with_if_modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.preconditions.if_modified_since = Some(since);
        self
    }
}
