//! Entity tags and precondition evaluation.
//!
//! On safe reads `If-None-Match` and `If-Modified-Since` act as freshness validators.
//! On unsafe operations the caller's lock token (`If-Match`, or `If-None-Match` for
//! existing callers) must equal the tag of the stored representation, otherwise the
//! write is refused as a conflict.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::model::Preconditions;
pub use crate::model::EntityTag;

/// Number of digest bytes kept in a tag.
const TAG_BYTES: usize = 8;

/// Tag for the exact text that is (or would be) sent.
pub fn entity_tag(representation: &str) -> EntityTag {
    let digest = Sha256::digest(representation.as_bytes());
    EntityTag::new(hex::encode(&digest[..TAG_BYTES]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    /// Reads: validators decide whether a body must be sent at all.
    Safe,
    /// Writes, patches and deletes: the lock token must match.
    Unsafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Proceed,
    NotModified,
    PreconditionFailed,
}

pub fn evaluate(
    preconditions: &Preconditions,
    safety: Safety,
    current_tag: &EntityTag,
    last_modified: Option<DateTime<Utc>>,
) -> Evaluation {
    match safety {
        Safety::Safe => evaluate_read(preconditions, current_tag, last_modified),
        Safety::Unsafe => evaluate_write(preconditions, current_tag),
    }
}

fn evaluate_read(
    preconditions: &Preconditions,
    current_tag: &EntityTag,
    last_modified: Option<DateTime<Utc>>,
) -> Evaluation {
    // If-None-Match takes precedence; If-Modified-Since only counts without it
    if let Some(if_none_match) = preconditions.if_none_match.as_deref() {
        return if current_tag.matches_any(if_none_match) {
            Evaluation::NotModified
        } else {
            Evaluation::Proceed
        };
    }
    match (preconditions.if_modified_since, last_modified) {
        (Some(since), Some(modified)) if since.timestamp() >= modified.timestamp() => {
            Evaluation::NotModified
        }
        _ => Evaluation::Proceed,
    }
}

fn evaluate_write(preconditions: &Preconditions, current_tag: &EntityTag) -> Evaluation {
    match preconditions.lock_token() {
        Some(token) if !current_tag.matches_any(token) => Evaluation::PreconditionFailed,
        _ => Evaluation::Proceed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn modified() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_505_500_000_000).unwrap()
    }

    #[test]
    fn test_entity_tag_is_stable_and_short() {
        let a = entity_tag("{\"greeting\":\"Hallo!\"}");
        let b = entity_tag("{\"greeting\":\"Hallo!\"}");
        let c = entity_tag("{\"greeting\":\"Hello!\"}");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.opaque().len(), TAG_BYTES * 2);
        assert_eq!(a.to_string(), format!("\"{}\"", a.opaque()));
        assert_eq!(crate::model::EntityTag::parse(&a.to_string()), a);
    }

    #[test]
    fn test_no_preconditions_always_proceeds() {
        let tag = entity_tag("x");
        let none = Preconditions::default();
        assert_eq!(evaluate(&none, Safety::Safe, &tag, Some(modified())), Evaluation::Proceed);
        assert_eq!(evaluate(&none, Safety::Unsafe, &tag, None), Evaluation::Proceed);
    }

    #[test]
    fn test_read_if_none_match() {
        let tag = entity_tag("x");
        let matching = Preconditions {
            if_none_match: Some(tag.to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate(&matching, Safety::Safe, &tag, None), Evaluation::NotModified);

        let stale = Preconditions {
            if_none_match: Some("\"stale\"".to_string()),
            // ignored while If-None-Match is present
            if_modified_since: Some(modified()),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&stale, Safety::Safe, &tag, Some(modified())),
            Evaluation::Proceed
        );
    }

    #[test]
    fn test_read_if_modified_since() {
        let tag = entity_tag("x");
        let same = Preconditions {
            if_modified_since: Some(modified()),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&same, Safety::Safe, &tag, Some(modified())),
            Evaluation::NotModified
        );

        let older = Preconditions {
            if_modified_since: Some(modified() - chrono::Duration::seconds(10)),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&older, Safety::Safe, &tag, Some(modified())),
            Evaluation::Proceed
        );
        // nothing to compare against
        assert_eq!(evaluate(&same, Safety::Safe, &tag, None), Evaluation::Proceed);
    }

    #[test]
    fn test_write_lock_token() {
        let tag = entity_tag("x");
        let current = Preconditions {
            if_none_match: Some(tag.to_string()),
            ..Default::default()
        };
        assert_eq!(evaluate(&current, Safety::Unsafe, &tag, None), Evaluation::Proceed);

        let stale = Preconditions {
            if_none_match: Some("\"stale\"".to_string()),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&stale, Safety::Unsafe, &tag, None),
            Evaluation::PreconditionFailed
        );

        let if_match_wins = Preconditions {
            if_none_match: Some("\"stale\"".to_string()),
            if_match: Some(tag.to_string()),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&if_match_wins, Safety::Unsafe, &tag, None),
            Evaluation::Proceed
        );
    }
}
