//! Redaction configuration.
//!
//! [`RedactOptions`] is built with `with_*` methods or deserialized from a JSON
//! configuration document. Every field is optional; the defaults mask nothing.
//!
//! ```rust
//! use tree_redaction::{Mode, RedactOptions};
//!
//! let options = RedactOptions::from_json_str(
//!     r#"{"paths": ["users.*.ssn"], "matchKeys": ["pin", {"pattern": "(?i)token"}], "mode": "remove"}"#,
//! )
//! .unwrap();
//! assert_eq!(options.mode(), Mode::Remove);
//! ```

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{
    document::Value,
    error::{BoxError, RedactError, Result},
    mask::DEFAULT_MASK,
    matcher::KeyMatcher,
};

/// What happens to a selected node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Overwrite the node with a substitute value.
    #[default]
    Mask,
    /// Delete map entries; leave a hole in list slots.
    Remove,
}

/// Computes the substitute for a masked node from its value and path.
///
/// The replacement is a JSON tree; it is copied into the document in place of
/// the node. An error aborts the whole redaction call.
pub trait Replacer {
    fn replace(&self, value: &Value, path: &str) -> std::result::Result<JsonValue, BoxError>;
}

/// Adapts a closure into a [`Replacer`].
struct FnReplacer<F>(F);

impl<F> Replacer for FnReplacer<F>
where
    F: Fn(&Value, &str) -> std::result::Result<JsonValue, BoxError>,
{
    fn replace(&self, value: &Value, path: &str) -> std::result::Result<JsonValue, BoxError> {
        (self.0)(value, path)
    }
}

/// Selection rules and substitution settings for one redaction.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct RedactOptions {
    paths: Vec<String>,
    match_keys: Vec<KeyMatcher>,
    auto_detect: bool,
    mode: Mode,
    mask_value: String,
    #[serde(skip)]
    replacer: Option<Arc<dyn Replacer + Send + Sync>>,
    mutate: bool,
    preserve_types: bool,
}

impl Default for RedactOptions {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            match_keys: Vec::new(),
            auto_detect: false,
            mode: Mode::Mask,
            mask_value: DEFAULT_MASK.to_string(),
            replacer: None,
            mutate: false,
            preserve_types: false,
        }
    }
}

impl fmt::Debug for RedactOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactOptions")
            .field("paths", &self.paths)
            .field("match_keys", &self.match_keys)
            .field("auto_detect", &self.auto_detect)
            .field("mode", &self.mode)
            .field("mask_value", &self.mask_value)
            .field("replacer", &self.replacer.as_ref().map(|_| "<replacer>"))
            .field("mutate", &self.mutate)
            .field("preserve_types", &self.preserve_types)
            .finish()
    }
}

impl RedactOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the data fields from JSON (`paths`, `matchKeys`, `autoDetect`,
    /// `mode`, `maskValue`, `mutate`, `preserveTypes`). A replacer cannot be
    /// configured this way.
    pub fn from_json_str(config: &str) -> Result<Self> {
        serde_json::from_str(config).map_err(RedactError::Parse)
    }

    /// Dot-notation patterns; `*` matches exactly one segment.
    #[must_use]
    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Literal key names or [`KeyMatcher::Pattern`]s matched anywhere in the tree.
    #[must_use]
    pub fn with_match_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<KeyMatcher>,
    {
        self.match_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Adds a regular-expression key matcher.
    pub fn with_key_pattern(mut self, pattern: &str) -> Result<Self> {
        self.match_keys.push(KeyMatcher::pattern(pattern)?);
        Ok(self)
    }

    /// Enables matching against [`crate::SENSITIVE_KEYS`].
    #[must_use]
    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect = auto_detect;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_mask_value(mut self, mask_value: impl Into<String>) -> Self {
        self.mask_value = mask_value.into();
        self
    }

    /// Computes substitutes with `replacer` instead of the mask value.
    #[must_use]
    pub fn with_replacer<R>(mut self, replacer: R) -> Self
    where
        R: Replacer + Send + Sync + 'static,
    {
        self.replacer = Some(Arc::new(replacer));
        self
    }

    /// Computes substitutes with a closure.
    #[must_use]
    pub fn with_replacer_fn<F>(self, replacer: F) -> Self
    where
        F: Fn(&Value, &str) -> std::result::Result<JsonValue, BoxError> + Send + Sync + 'static,
    {
        self.with_replacer(FnReplacer(replacer))
    }

    /// Redacts the caller's document in place instead of a private clone.
    #[must_use]
    pub fn with_mutate(mut self, mutate: bool) -> Self {
        self.mutate = mutate;
        self
    }

    /// Without a replacer, masks numbers as `0`, booleans as `false`, lists
    /// and maps as empty containers.
    #[must_use]
    pub fn with_preserve_types(mut self, preserve_types: bool) -> Self {
        self.preserve_types = preserve_types;
        self
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn match_keys(&self) -> &[KeyMatcher] {
        &self.match_keys
    }

    pub fn auto_detect(&self) -> bool {
        self.auto_detect
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mask_value(&self) -> &str {
        &self.mask_value
    }

    pub fn replacer(&self) -> Option<&(dyn Replacer + Send + Sync)> {
        self.replacer.as_deref()
    }

    pub fn mutate(&self) -> bool {
        self.mutate
    }

    pub fn preserve_types(&self) -> bool {
        self.preserve_types
    }
}
