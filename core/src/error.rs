//! Error type shared by every unicorn algorithm crate.
use crate::text::EncodingForm;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by text iteration and the algorithms built on it.
///
/// Reaching the end of the text is not an error: iterators and boundary
/// scanners report it as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The code units at `index` are not well-formed in `form`.
    ///
    /// Scans abort as soon as this is detected and are never retried.
    #[error("malformed {form} sequence at index {index}")]
    MalformedEncoding { form: EncodingForm, index: usize },

    /// An argument was rejected before any work began.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested algorithm or encoding form is switched off in the
    /// active configuration.
    #[error("{0} is disabled")]
    FeatureDisabled(String),

    /// Compiled data is inconsistent (for example a rule table that lets a
    /// position go unmatched). Never recovered from.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::InternalInvariant(msg.into())
    }

    /// True for [`Error::MalformedEncoding`].
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedEncoding { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::MalformedEncoding {
            form: EncodingForm::Utf8,
            index: 3,
        };
        assert_eq!(err.to_string(), "malformed UTF-8 sequence at index 3");
        assert!(err.is_malformed());

        let err = Error::invalid_argument("cursor 9 is past the end of text (4)");
        assert_eq!(
            err.to_string(),
            "invalid argument: cursor 9 is past the end of text (4)"
        );
        assert!(!err.is_malformed());
    }
}
