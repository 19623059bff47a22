//! The redaction entrypoints.
//!
//! [`Redactor`] picks the working tree (the caller's document or a private
//! clone), walks it, and rewrites every node selected by the options. The
//! free functions are shorthands for a one-off `Redactor`.

use std::ops::{Deref, DerefMut};

use serde_json::Value as JsonValue;

use crate::{
    clone::clone_document,
    document::{Container, Document, Key, NodeId, Value},
    error::{RedactError, Result},
    matcher::{is_sensitive_key, key_matches, path_matches},
    options::{Mode, RedactOptions},
    traversal::Walker,
};

/// The working tree returned by a redaction.
#[derive(Debug)]
pub enum Redacted<'a> {
    /// The caller's document, rewritten in place (`mutate = true`).
    InPlace(&'a mut Document),
    /// An independent redacted copy; the input is untouched.
    Cloned(Document),
}

impl Redacted<'_> {
    pub fn is_in_place(&self) -> bool {
        matches!(self, Redacted::InPlace(_))
    }

    /// Returns an owned document, cloning the in-place one if necessary.
    pub fn into_owned(self) -> Document {
        match self {
            Redacted::InPlace(document) => document.clone(),
            Redacted::Cloned(document) => document,
        }
    }
}

impl Deref for Redacted<'_> {
    type Target = Document;

    fn deref(&self) -> &Document {
        match self {
            Redacted::InPlace(document) => document,
            Redacted::Cloned(document) => document,
        }
    }
}

impl DerefMut for Redacted<'_> {
    fn deref_mut(&mut self) -> &mut Document {
        match self {
            Redacted::InPlace(document) => document,
            Redacted::Cloned(document) => document,
        }
    }
}

/// Applies one set of [`RedactOptions`] to documents, JSON values and text.
#[derive(Clone, Debug)]
pub struct Redactor {
    options: RedactOptions,
    #[cfg(feature = "slog")]
    logger: slog::Logger,
}

impl Redactor {
    pub fn new(options: RedactOptions) -> Self {
        Self {
            options,
            #[cfg(feature = "slog")]
            logger: slog::Logger::root(slog::Discard, slog::o!()),
        }
    }

    /// Routes debug and trace records to `logger`. Values are never logged,
    /// only paths and counts.
    #[cfg(feature = "slog")]
    #[must_use]
    pub fn with_logger(mut self, logger: slog::Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &RedactOptions {
        &self.options
    }

    /// Redacts `input`, in place when `mutate` is set, otherwise on a clone
    /// that shares no container with `input`.
    ///
    /// Leaf roots pass through untouched.
    pub fn redact<'a>(&self, input: &'a mut Document) -> Result<Redacted<'a>> {
        if self.options.mutate() {
            self.apply(input)?;
            Ok(Redacted::InPlace(input))
        } else {
            let mut working = clone_document(input)?;
            self.apply(&mut working)?;
            Ok(Redacted::Cloned(working))
        }
    }

    /// Redacts a JSON value. The value is consumed, so this always works in
    /// place regardless of `mutate`.
    pub fn redact_json(&self, json: JsonValue) -> Result<JsonValue> {
        let mut document = Document::from_json(json);
        self.apply(&mut document)?;
        document.to_json()
    }

    /// Redacts JSON text.
    ///
    /// Text that does not parse is returned unchanged; use
    /// [`Redactor::try_redact_text`] to see the parse error instead. Replacer
    /// failures are still reported.
    pub fn redact_text(&self, text: &str) -> Result<String> {
        match self.try_redact_text(text) {
            Err(RedactError::Parse(err)) => {
                self.log_passthrough(&err);
                Ok(text.to_string())
            }
            other => other,
        }
    }

    /// Redacts JSON text, failing with [`RedactError::Parse`] on malformed input.
    pub fn try_redact_text(&self, text: &str) -> Result<String> {
        let json: JsonValue = serde_json::from_str(text).map_err(RedactError::Parse)?;
        let redacted = self.redact_json(json)?;
        serde_json::to_string(&redacted).map_err(RedactError::Serialize)
    }

    /// Walks `document` and rewrites every selected node.
    fn apply(&self, document: &mut Document) -> Result<()> {
        if document.root().is_leaf() {
            return Ok(());
        }

        let mut walker = Walker::new();
        let mut matched = 0_usize;
        while let Some(node) = walker.next_node(document) {
            let (Some(parent), Some(key)) = (node.parent, node.key) else {
                continue;
            };
            if !self.selects(&node.path, &key) {
                continue;
            }
            matched += 1;
            self.log_match(&node.path);

            match self.options.mode() {
                Mode::Remove => {
                    document.remove(parent, &key)?;
                }
                Mode::Mask => {
                    let substitute = self.substitute(document, &node.value, &node.path)?;
                    document.set(parent, key, substitute)?;
                }
            }
        }

        self.log_summary(matched, walker.visited());
        Ok(())
    }

    /// Path rules first, then key rules, then auto-detection.
    fn selects(&self, path: &str, key: &Key) -> bool {
        let options = &self.options;
        options
            .paths()
            .iter()
            .any(|pattern| path_matches(path, pattern))
            || key_matches(key, options.match_keys())
            || (options.auto_detect() && key.as_field().is_some_and(is_sensitive_key))
    }

    fn substitute(&self, document: &mut Document, value: &Value, path: &str) -> Result<Value> {
        if let Some(replacer) = self.options.replacer() {
            let json = replacer
                .replace(value, path)
                .map_err(|source| RedactError::Replacer {
                    path: path.to_string(),
                    source,
                })?;
            return Ok(document.import(json));
        }

        let mask = || Value::String(self.options.mask_value().to_string());
        if !self.options.preserve_types() {
            return Ok(mask());
        }
        Ok(match value {
            Value::Number(_) => Value::from(0_i64),
            Value::Bool(_) => Value::Bool(false),
            Value::Container(id) => Value::Container(empty_like(document, *id)?),
            Value::Null | Value::Hole | Value::String(_) => mask(),
        })
    }

    #[cfg(feature = "slog")]
    fn log_match(&self, path: &str) {
        slog::trace!(self.logger, "redacting node"; "path" => path);
    }

    #[cfg(not(feature = "slog"))]
    fn log_match(&self, _path: &str) {}

    #[cfg(feature = "slog")]
    fn log_summary(&self, matched: usize, visited: usize) {
        slog::debug!(
            self.logger, "redaction complete";
            "mode" => ?self.options.mode(),
            "mutate" => self.options.mutate(),
            "matched" => matched,
            "containers" => visited
        );
    }

    #[cfg(not(feature = "slog"))]
    fn log_summary(&self, _matched: usize, _visited: usize) {}

    #[cfg(feature = "slog")]
    fn log_passthrough(&self, err: &serde_json::Error) {
        slog::debug!(self.logger, "input is not valid JSON, returning it unchanged"; "error" => %err);
    }

    #[cfg(not(feature = "slog"))]
    fn log_passthrough(&self, _err: &serde_json::Error) {}
}

/// Allocates an empty container of the same kind as `id`.
fn empty_like(document: &mut Document, id: NodeId) -> Result<NodeId> {
    let kind = document
        .container(id)
        .ok_or(RedactError::DanglingNode(id))?
        .kind();
    Ok(document.alloc(Container::empty(kind)))
}

/// Redacts `input` with `options`. See [`Redactor::redact`].
pub fn redact<'a>(input: &'a mut Document, options: &RedactOptions) -> Result<Redacted<'a>> {
    Redactor::new(options.clone()).redact(input)
}

/// Redacts a JSON value with `options`. See [`Redactor::redact_json`].
pub fn redact_json(json: JsonValue, options: &RedactOptions) -> Result<JsonValue> {
    Redactor::new(options.clone()).redact_json(json)
}

/// Redacts JSON text, passing unparseable text through. See
/// [`Redactor::redact_text`].
pub fn redact_text(text: &str, options: &RedactOptions) -> Result<String> {
    Redactor::new(options.clone()).redact_text(text)
}

/// Redacts JSON text, surfacing parse errors. See [`Redactor::try_redact_text`].
pub fn try_redact_text(text: &str, options: &RedactOptions) -> Result<String> {
    Redactor::new(options.clone()).try_redact_text(text)
}
