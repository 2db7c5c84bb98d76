//! Generator errors.

use thiserror::Error;

/// A fatal condition that aborts one generator invocation.
///
/// Nothing is written when a generator fails.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{backend} backend does not support {axis} `{value}`")]
    Unsupported {
        backend: &'static str,
        axis: &'static str,
        value: String,
    },

    #[error(
        "{backend} backend needs a concrete {axis}\n\
         help: every axis except the ones the backend iterates itself must be pinned"
    )]
    UnpinnedAxis {
        backend: &'static str,
        axis: &'static str,
    },

    #[error(
        "template object `{object}` refers to missing object `{target}` through `{key}`\n\
         help: the template is inconsistent; restore it from a known-good copy"
    )]
    DanglingReference {
        object: String,
        key: String,
        target: String,
    },

    #[error("path `{path}` was inserted into the group tree twice")]
    DuplicatePath { path: String },

    #[error("no group in the template can hold `{path}`")]
    Unplaceable { path: String },

    #[error("template is missing `{field}` in {location}")]
    MissingField { field: String, location: String },

    #[error("template field `{field}` in {location} is not a {expected}")]
    UnexpectedValue {
        field: String,
        location: String,
        expected: &'static str,
    },

    #[error("build configuration `{name}` in {location} is not a known configuration type")]
    UnknownConfiguration { name: String, location: String },
}

impl GenerateError {
    pub fn unsupported(backend: &'static str, axis: &'static str, value: impl ToString) -> Self {
        GenerateError::Unsupported {
            backend,
            axis,
            value: value.to_string(),
        }
    }

    pub fn missing(field: impl Into<String>, location: impl Into<String>) -> Self {
        GenerateError::MissingField {
            field: field.into(),
            location: location.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_value() {
        let err = GenerateError::unsupported("xcode", "target operating system", "Windows");
        assert_eq!(
            err.to_string(),
            "xcode backend does not support target operating system `Windows`"
        );

        let err = GenerateError::DanglingReference {
            object: "AAA".into(),
            key: "children".into(),
            target: "BBB".into(),
        };
        assert!(err.to_string().contains("missing object `BBB`"));
        assert!(err.to_string().contains("help:"));
    }
}
