//! YAML codec for configuration documents.

use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

use crate::document::model::ConfigurationDocument;

/// Errors produced while converting between YAML and documents.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid YAML or does not fit the document shape.
    #[error("Failed to parse YAML: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// The in-memory document could not be serialized.
    #[error("Failed to generate YAML: {0}")]
    Encode(#[source] serde_yaml::Error),
}

/// Decode YAML text into a document.
///
/// Unknown keys are ignored. Empty input, a comment-only document or an
/// explicit `null` all decode to [`ConfigurationDocument::default`]. Merge
/// keys (`<<: *anchor`) are applied, custom tags are dropped in favour of
/// the value they annotate, and only the first document of a multi-document
/// stream is read.
pub fn decode(text: &str) -> Result<ConfigurationDocument, CodecError> {
    if text.trim().is_empty() {
        return Ok(ConfigurationDocument::default());
    }

    let Some(first) = serde_yaml::Deserializer::from_str(text).next() else {
        return Ok(ConfigurationDocument::default());
    };

    let mut value = Value::deserialize(first).map_err(CodecError::Parse)?;
    strip_tags(&mut value);
    value.apply_merge().map_err(CodecError::Parse)?;

    let document: Option<ConfigurationDocument> =
        serde_yaml::from_value(value).map_err(CodecError::Parse)?;
    Ok(document.unwrap_or_default())
}

/// Replace every `!tag value` with its plain value.
fn strip_tags(value: &mut Value) {
    match value {
        Value::Tagged(tagged) => {
            let inner = std::mem::replace(&mut tagged.value, Value::Null);
            *value = inner;
            strip_tags(value);
        }
        Value::Sequence(items) => items.iter_mut().for_each(strip_tags),
        Value::Mapping(mapping) => mapping.values_mut().for_each(strip_tags),
        _ => {}
    }
}

/// Encode a document as YAML text.
pub fn encode(document: &ConfigurationDocument) -> Result<String, CodecError> {
    serde_yaml::to_string(document).map_err(CodecError::Encode)
}
