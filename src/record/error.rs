//! Error types for record normalization.

use thiserror::Error;

/// Errors that can occur while normalizing raw JSON into records.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The source text is not valid JSON.
    #[error("failed to parse JSON source: {source}")]
    Parse {
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an array.
    #[error("expected a top-level JSON array, found {found}")]
    NotAnArray {
        /// Short description of the value that was found.
        found: &'static str,
    },
}

impl NormalizeError {
    /// Creates a parse error from the underlying serde error.
    pub fn parse(source: serde_json::Error) -> Self {
        Self::Parse { source }
    }

    /// Creates a not-an-array error describing the offending value.
    #[must_use]
    pub fn not_an_array(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        Self::NotAnArray { found }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_array_describes_object() {
        let error = NormalizeError::not_an_array(&serde_json::json!({}));
        assert!(error.to_string().contains("an object"), "{error}");
    }

    #[test]
    fn test_parse_error_carries_source_message() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let error = NormalizeError::parse(source);
        assert!(error.to_string().contains("failed to parse"), "{error}");
    }
}
