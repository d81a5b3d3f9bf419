use crate::model::{GreetingRecord, PatchInstruction, ResourceId, REPLACE_OPERATION};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("only operation replace is supported, got '{0}'")]
    UnsupportedOperation(String),
    #[error("value at '{0}' could not be replaced")]
    FieldNotReplaceable(String),
    #[error("href '{0}' would move the greeting to another resource")]
    IdentityChange(String),
}

/// Every leaf a patch may replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchableField {
    Greeting,
    Language,
    Country,
    NativeLanguage,
    NativeCountry,
    SelfTitle,
    SelfHref,
}

impl PatchableField {
    /// Resolve normalized path elements to a field. Structured fields, optional link
    /// metadata and unknown names do not resolve.
    pub fn resolve(elements: &[&str]) -> Option<Self> {
        match elements {
            ["greeting"] => Some(Self::Greeting),
            ["language"] => Some(Self::Language),
            ["country"] => Some(Self::Country),
            ["native", "language"] => Some(Self::NativeLanguage),
            ["native", "country"] => Some(Self::NativeCountry),
            ["self", "title"] => Some(Self::SelfTitle),
            ["self", "href"] => Some(Self::SelfHref),
            _ => None,
        }
    }

    fn slot(self, record: &mut GreetingRecord) -> &mut String {
        match self {
            Self::Greeting => &mut record.greeting,
            Self::Language => &mut record.language,
            Self::Country => &mut record.country,
            Self::NativeLanguage => &mut record.native.language,
            Self::NativeCountry => &mut record.native.country,
            Self::SelfTitle => &mut record.self_link.title,
            Self::SelfHref => &mut record.self_link.href,
        }
    }
}

/// Apply a single replace instruction. The record is untouched on error.
pub fn apply_patch(
    record: &mut GreetingRecord,
    instruction: &PatchInstruction,
) -> Result<PatchableField, PatchError> {
    if instruction.op != REPLACE_OPERATION {
        return Err(PatchError::UnsupportedOperation(instruction.op.clone()));
    }

    let field = PatchableField::resolve(&instruction.path_elements())
        .ok_or_else(|| PatchError::FieldNotReplaceable(instruction.path.clone()))?;

    if field == PatchableField::SelfHref {
        let current = record.resource_id().ok();
        let proposed = ResourceId::from_href(&instruction.value).ok();
        if proposed.is_none() || proposed != current {
            return Err(PatchError::IdentityChange(instruction.value.clone()));
        }
    }

    *field.slot(record) = instruction.value.clone();
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GreetingLink, GreetingNative, GREETING_LINK_TYPE};

    fn hallo() -> GreetingRecord {
        GreetingRecord::new(
            "Hallo!",
            "Dansk",
            "Danmark",
            GreetingNative::new("Dansk", "Danmark"),
            GreetingLink::new("/greetings/hallo", "Dansk Hilsen Hallo")
                .with_media_type(GREETING_LINK_TYPE)
                .with_language_tag("da"),
        )
    }

    fn replace(path: &str, value: &str) -> PatchInstruction {
        PatchInstruction::new("replace", path, value)
    }

    #[test]
    fn test_replace_top_level_and_nested() {
        let mut record = hallo();
        assert_eq!(
            apply_patch(&mut record, &replace("language", "Synnejysk")),
            Ok(PatchableField::Language)
        );
        assert_eq!(record.language, "Synnejysk");

        apply_patch(&mut record, &replace("/native/country", "Sønderjylland")).unwrap();
        assert_eq!(record.native.country, "Sønderjylland");

        apply_patch(&mut record, &replace("_links/self/title", "Sønderjysk Hilsen")).unwrap();
        assert_eq!(record.self_link.title, "Sønderjysk Hilsen");
    }

    #[test]
    fn test_rejects_unknown_operation() {
        let mut record = hallo();
        let result = apply_patch(&mut record, &PatchInstruction::new("add", "language", "x"));
        assert_eq!(result, Err(PatchError::UnsupportedOperation("add".to_string())));
        assert_eq!(record, hallo());
    }

    #[test]
    fn test_rejects_structured_and_unknown_fields() {
        let paths = [
            "native",
            "_links/self",
            "self",
            "",
            "/",
            "nonexistent",
            "native/dialect",
            "self/type",
            "self/hreflang",
            "self/seen",
            "greeting/extra",
        ];
        for path in paths {
            let mut record = hallo();
            assert!(
                matches!(
                    apply_patch(&mut record, &replace(path, "x")),
                    Err(PatchError::FieldNotReplaceable(_))
                ),
                "path '{}' should be rejected",
                path
            );
            assert_eq!(record, hallo());
        }
    }

    #[test]
    fn test_href_may_not_change_identity() {
        let mut record = hallo();
        apply_patch(&mut record, &replace("_links/self/href", "greetings/hallo")).unwrap();
        assert_eq!(record.self_link.href, "greetings/hallo");

        let mut record = hallo();
        assert!(matches!(
            apply_patch(&mut record, &replace("self/href", "/greetings/hej")),
            Err(PatchError::IdentityChange(_))
        ));
        assert!(matches!(
            apply_patch(&mut record, &replace("self/href", "")),
            Err(PatchError::IdentityChange(_))
        ));
        assert_eq!(record, hallo());
    }

    #[test]
    fn test_href_case_change_is_identity_change() {
        let mut record = hallo();
        assert_eq!(
            apply_patch(&mut record, &replace("_links/self/href", "/greetings/HALLO")),
            Err(PatchError::IdentityChange("/greetings/HALLO".to_string()))
        );
        assert_eq!(
            apply_patch(&mut record, &replace("self/href", "greetings/Hallo")),
            Err(PatchError::IdentityChange("greetings/Hallo".to_string()))
        );
        assert_eq!(record, hallo());
    }
}
