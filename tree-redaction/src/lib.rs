//! Redaction of sensitive values in nested, JSON-like trees.
//!
//! A tree is held in a [`Document`]: maps and lists live in an arena and are
//! referenced through [`NodeId`] handles, so a tree may share sub-trees or
//! contain cycles. Redaction walks every node once and rewrites those picked
//! by the [`RedactOptions`]:
//!
//! - **paths**: dot-notation patterns such as `users.*.ssn`, where `*` matches
//!   exactly one segment;
//! - **match keys**: literal key names or regular expressions tested against
//!   every field name;
//! - **auto-detect**: common sensitive names from [`SENSITIVE_KEYS`].
//!
//! Selected nodes are masked (replaced by the mask value, a type-preserving
//! zero, or whatever a [`Replacer`] returns) or removed (map entries deleted,
//! list slots left as [`Value::Hole`] so indices do not shift).
//!
//! By default the input is cloned first and left untouched; the clone keeps
//! shared and cyclic references intact.
//!
//! ```rust
//! use serde_json::json;
//! use tree_redaction::{redact_json, RedactOptions};
//!
//! let options = RedactOptions::new()
//!     .with_paths(["users.*.ssn"])
//!     .with_auto_detect(true);
//! let out = redact_json(
//!     json!({"users": [{"ssn": "1"}, {"ssn": "2"}], "password": "hunter2"}),
//!     &options,
//! )
//! .unwrap();
//! assert_eq!(
//!     out,
//!     json!({"users": [{"ssn": "********"}, {"ssn": "********"}], "password": "********"})
//! );
//! ```
//!
//! What this crate does not do:
//! - parse anything but JSON text (other formats hand over a parsed tree)
//! - validate schemas or patterns
//! - erase data cryptographically; redaction is structural substitution only

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::result_large_err,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod clone;
mod document;
mod error;
pub mod mask;
mod matcher;
mod options;
mod redact;
#[cfg(feature = "slog")]
pub mod slog;
mod traversal;

pub use clone::clone_document;
pub use document::{Container, ContainerKind, Document, Entries, Key, NodeId, Value};
pub use error::{BoxError, RedactError, Result};
pub use mask::{CreditCardMask, EmailMask, TextMask, DEFAULT_MASK};
pub use matcher::{is_sensitive_key, key_matches, path_matches, KeyMatcher, SENSITIVE_KEYS};
pub use options::{Mode, RedactOptions, Replacer};
pub use redact::{redact, redact_json, redact_text, try_redact_text, Redacted, Redactor};
pub use traversal::{Traversal, TraversalNode, Walker};
