use std::fmt;

/// Short digest of a representation. Displays in quoted header form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityTag(String);

impl EntityTag {
    /// Wraps an already computed opaque value, without quotes.
    pub fn new(opaque: impl Into<String>) -> Self {
        Self(opaque.into())
    }

    /// Accepts `"abc"`, `W/"abc"` or a bare `abc`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_prefix("W/").unwrap_or(raw);
        Self(raw.trim_matches('"').to_string())
    }

    pub fn opaque(&self) -> &str {
        &self.0
    }

    /// True when any entry in a comma separated validator list names this tag.
    pub fn matches_any(&self, header: &str) -> bool {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == "*" || Self::parse(candidate) == *self)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}
