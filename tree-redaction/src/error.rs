//! Error types for redaction and the JSON boundary.
//!
//! Traversal, matching and cloning are total over well-formed documents. The
//! variants here cover the edges: text that does not parse, trees JSON cannot
//! express, patterns that do not compile, and replacers that fail.

use thiserror::Error;

use crate::document::NodeId;

/// Result type for redaction operations.
pub type Result<T> = std::result::Result<T, RedactError>;

/// Boxed error returned by a failing [`crate::Replacer`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while redacting.
#[derive(Error, Debug)]
pub enum RedactError {
    /// The input text is not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// The redacted document could not be written as JSON text.
    #[error("serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A `matchKeys` pattern is not a valid regular expression.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A configured replacer failed. The call is aborted.
    #[error("replacer failed at `{path}`: {source}")]
    Replacer {
        /// Path of the node being replaced.
        path: String,
        /// Error reported by the replacer.
        #[source]
        source: BoxError,
    },

    /// The document contains a cycle and cannot be expressed as a JSON tree.
    #[error("cycle detected at `{path}`")]
    Cycle {
        /// Path at which the back-reference was found.
        path: String,
    },

    /// A key cannot address a slot of the target container.
    #[error("invalid key `{0}` for a list")]
    InvalidKey(String),

    /// A handle does not refer to a container of this document.
    #[error("dangling node handle {0:?}")]
    DanglingNode(NodeId),
}
