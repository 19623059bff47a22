//! Adapters for emitting redacted trees through `slog`.
//!
//! [`RedactedJson`] is a `slog::Value` holding an already-redacted JSON tree
//! and emitting it via `slog`'s nested-value support. The unredacted input is
//! never stored.
//!
//! Logging is infallible from the caller's side: if redaction or JSON
//! conversion fails, a placeholder string is logged instead.

use serde_json::Value as JsonValue;
use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::{document::Document, redact::Redactor};

/// Logged in place of a tree that could not be redacted or expressed as JSON.
pub const UNLOGGABLE_PLACEHOLDER: &str = "Failed to serialize redacted value";

/// A `slog::Value` that emits a redacted tree as structured JSON.
#[derive(Clone, Debug)]
pub struct RedactedJson {
    value: JsonValue,
}

impl RedactedJson {
    fn new(value: JsonValue) -> Self {
        Self { value }
    }

    fn unloggable() -> Self {
        Self::new(JsonValue::String(UNLOGGABLE_PLACEHOLDER.to_string()))
    }

    /// The JSON that will be emitted.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }
}

impl SlogValue for RedactedJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

/// Converts a tree into a `slog::Value` carrying its redacted form.
///
/// ## Example
/// ```ignore
/// use tree_redaction::slog::IntoRedactedJson;
///
/// info!(logger, "request"; "body" => body.into_redacted_json(&redactor));
/// ```
pub trait IntoRedactedJson {
    /// Redacts `self` with `redactor` and wraps the result for logging.
    fn into_redacted_json(self, redactor: &Redactor) -> RedactedJson;
}

impl IntoRedactedJson for JsonValue {
    fn into_redacted_json(self, redactor: &Redactor) -> RedactedJson {
        redactor
            .redact_json(self)
            .map_or_else(|_| RedactedJson::unloggable(), RedactedJson::new)
    }
}

impl IntoRedactedJson for &Document {
    fn into_redacted_json(self, redactor: &Redactor) -> RedactedJson {
        let mut working = self.clone();
        let redacted = redactor
            .redact(&mut working)
            .and_then(|redacted| redacted.to_json());
        redacted.map_or_else(|_| RedactedJson::unloggable(), RedactedJson::new)
    }
}
