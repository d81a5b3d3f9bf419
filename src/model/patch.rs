use serde::{Deserialize, Serialize};

/// The only operation the patch engine understands.
pub const REPLACE_OPERATION: &str = "replace";

#[derive(Debug, thiserror::Error)]
pub enum PatchParseError {
    #[error("patch could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("exactly one patch operation is supported, got {0}")]
    OperationCount(usize),
}

/// A single `{"op", "path", "value"}` patch instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchInstruction {
    pub op: String,
    pub path: String,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatchDocument {
    Single(PatchInstruction),
    Many(Vec<PatchInstruction>),
}

impl PatchInstruction {
    pub fn new(op: impl Into<String>, path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            path: path.into(),
            value: value.into(),
        }
    }

    /// Parse a patch body: either one instruction or an array holding exactly one.
    pub fn from_json(body: &[u8]) -> Result<Self, PatchParseError> {
        match serde_json::from_slice(body)? {
            PatchDocument::Single(instruction) => Ok(instruction),
            PatchDocument::Many(mut instructions) => {
                if instructions.len() != 1 {
                    return Err(PatchParseError::OperationCount(instructions.len()));
                }
                Ok(instructions.remove(0))
            }
        }
    }

    /// Field names along the path, without empty segments or a leading links segment.
    pub fn path_elements(&self) -> Vec<&str> {
        let mut elements: Vec<&str> = self.path.split('/').filter(|e| !e.is_empty()).collect();
        if matches!(elements.first(), Some(&"_links") | Some(&"links")) {
            elements.remove(0);
        }
        elements
    }
}
