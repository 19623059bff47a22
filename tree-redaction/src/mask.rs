//! Substitution values for masked nodes.
//!
//! Everything here is a pure string transformation. [`TextMask`],
//! [`EmailMask`] and [`CreditCardMask`] also implement [`Replacer`], so they
//! can be plugged straight into [`crate::RedactOptions::with_replacer`].

use std::borrow::Cow;

use serde_json::Value as JsonValue;

use crate::{
    document::Value,
    error::BoxError,
    options::Replacer,
};

/// Default substitution for masked values.
pub const DEFAULT_MASK: &str = "********";

/// Keeps the first character of the local part and the whole domain:
/// `jane@example.com` becomes `j***@example.com`.
///
/// Input without an `@` is replaced by [`DEFAULT_MASK`].
pub fn email_mask(email: &str) -> String {
    let mut parts = email.split('@');
    let user = parts.next().unwrap_or_default();
    match parts.next() {
        Some(domain) if !domain.is_empty() => {
            let first: String = user.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        _ => DEFAULT_MASK.to_string(),
    }
}

/// Keeps the last four characters: `4111111111111111` becomes
/// `****-****-****-1111`.
pub fn credit_card_mask(card: &str) -> String {
    let chars: Vec<char> = card.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("****-****-****-{tail}")
}

/// A masking strategy for string-like values.
///
/// Keep and mask variants work on Unicode scalar values, not bytes.
#[derive(Clone, Debug)]
pub enum TextMask {
    /// Replace the whole value with a placeholder.
    Full(Cow<'static, str>),
    /// Keep `prefix` leading and `suffix` trailing characters visible and mask
    /// the middle. If the spans cover the value it is returned unchanged.
    Keep {
        prefix: usize,
        suffix: usize,
        mask_char: char,
    },
    /// Mask `prefix` leading and `suffix` trailing characters. If the spans
    /// cover the value it is masked entirely.
    Mask {
        prefix: usize,
        suffix: usize,
        mask_char: char,
    },
}

impl TextMask {
    #[must_use]
    pub fn full<P>(placeholder: P) -> Self
    where
        P: Into<Cow<'static, str>>,
    {
        Self::Full(placeholder.into())
    }

    #[must_use]
    pub fn keep(prefix: usize, suffix: usize) -> Self {
        Self::Keep {
            prefix,
            suffix,
            mask_char: '*',
        }
    }

    #[must_use]
    pub fn keep_first(prefix: usize) -> Self {
        Self::keep(prefix, 0)
    }

    #[must_use]
    pub fn keep_last(suffix: usize) -> Self {
        Self::keep(0, suffix)
    }

    #[must_use]
    pub fn mask(prefix: usize, suffix: usize) -> Self {
        Self::Mask {
            prefix,
            suffix,
            mask_char: '*',
        }
    }

    #[must_use]
    pub fn mask_first(prefix: usize) -> Self {
        Self::mask(prefix, 0)
    }

    #[must_use]
    pub fn mask_last(suffix: usize) -> Self {
        Self::mask(0, suffix)
    }

    /// Overrides the masking character. No effect on [`TextMask::Full`].
    #[must_use]
    pub fn with_mask_char(mut self, mask: char) -> Self {
        match &mut self {
            TextMask::Full(_) => {}
            TextMask::Keep { mask_char, .. } | TextMask::Mask { mask_char, .. } => {
                *mask_char = mask;
            }
        }
        self
    }

    /// Applies the mask. Empty input stays empty for keep and mask variants.
    #[must_use]
    pub fn apply_to(&self, value: &str) -> String {
        match self {
            TextMask::Full(placeholder) => placeholder.clone().into_owned(),
            TextMask::Keep {
                prefix,
                suffix,
                mask_char,
            } => {
                let mut chars: Vec<char> = value.chars().collect();
                let total = chars.len();
                if prefix + suffix < total {
                    chars[*prefix..total - suffix].fill(*mask_char);
                }
                chars.into_iter().collect()
            }
            TextMask::Mask {
                prefix,
                suffix,
                mask_char,
            } => {
                let mut chars: Vec<char> = value.chars().collect();
                let total = chars.len();
                if prefix + suffix >= total {
                    chars.fill(*mask_char);
                } else {
                    chars[..*prefix].fill(*mask_char);
                    chars[total - suffix..].fill(*mask_char);
                }
                chars.into_iter().collect()
            }
        }
    }
}

impl Default for TextMask {
    fn default() -> Self {
        Self::full(DEFAULT_MASK)
    }
}

/// Strings and numbers are masked through their text; other kinds get the
/// placeholder (or [`DEFAULT_MASK`] for keep and mask variants).
impl Replacer for TextMask {
    fn replace(&self, value: &Value, _path: &str) -> Result<JsonValue, BoxError> {
        let text = match (self, value) {
            (_, Value::String(s)) => self.apply_to(s),
            (_, Value::Number(n)) => self.apply_to(&n.to_string()),
            (TextMask::Full(placeholder), _) => placeholder.to_string(),
            _ => DEFAULT_MASK.to_string(),
        };
        Ok(JsonValue::String(text))
    }
}

/// [`Replacer`] applying [`email_mask`] to string values.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmailMask;

impl Replacer for EmailMask {
    fn replace(&self, value: &Value, _path: &str) -> Result<JsonValue, BoxError> {
        let text = value.as_str().map_or_else(|| DEFAULT_MASK.to_string(), email_mask);
        Ok(JsonValue::String(text))
    }
}

/// [`Replacer`] applying [`credit_card_mask`] to string and numeric values.
#[derive(Clone, Copy, Debug, Default)]
pub struct CreditCardMask;

impl Replacer for CreditCardMask {
    fn replace(&self, value: &Value, _path: &str) -> Result<JsonValue, BoxError> {
        let text = match value {
            Value::String(s) => credit_card_mask(s),
            Value::Number(n) => credit_card_mask(&n.to_string()),
            _ => DEFAULT_MASK.to_string(),
        };
        Ok(JsonValue::String(text))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{credit_card_mask, email_mask, CreditCardMask, EmailMask, TextMask, DEFAULT_MASK};
    use crate::{document::Value, options::Replacer};

    #[test]
    fn email_keeps_first_letter_and_domain() {
        assert_eq!(email_mask("jane@example.com"), "j***@example.com");
        assert_eq!(email_mask("@example.com"), "***@example.com");
        assert_eq!(email_mask("not-an-email"), DEFAULT_MASK);
        assert_eq!(email_mask("trailing@"), DEFAULT_MASK);
    }

    #[test]
    fn credit_card_keeps_last_four() {
        assert_eq!(credit_card_mask("4111111111111111"), "****-****-****-1111");
        assert_eq!(credit_card_mask("12"), "****-****-****-12");
    }

    #[test]
    fn keep_masks_the_middle() {
        assert_eq!(TextMask::keep_first(2).apply_to("abcdef"), "ab****");
        assert_eq!(TextMask::keep_last(4).apply_to("abcdef"), "**cdef");
        assert_eq!(TextMask::keep(2, 2).apply_to("abcdef"), "ab**ef");
        assert_eq!(TextMask::keep(2, 2).apply_to("abc"), "abc");
        assert_eq!(TextMask::keep_last(4).apply_to(""), "");
    }

    #[test]
    fn mask_masks_the_edges() {
        assert_eq!(TextMask::mask_first(2).apply_to("abcdef"), "**cdef");
        assert_eq!(TextMask::mask_last(3).apply_to("abcdef"), "abc***");
        assert_eq!(TextMask::mask(2, 2).apply_to("abcdef"), "**cd**");
        assert_eq!(TextMask::mask(2, 2).apply_to("abcd"), "****");
        assert_eq!(TextMask::mask_first(2).apply_to(""), "");
    }

    #[test]
    fn mask_char_override() {
        let mask = TextMask::keep_first(2).with_mask_char('#');
        assert_eq!(mask.apply_to("abcdef"), "ab####");
        let full = TextMask::full("[gone]").with_mask_char('#');
        assert_eq!(full.apply_to("abcdef"), "[gone]");
    }

    #[test]
    fn masks_count_scalar_values() {
        assert_eq!(TextMask::keep_first(2).apply_to("秘密数据"), "秘密**");
        assert_eq!(TextMask::keep_last(4).apply_to("secret🔒data"), "*******data");
    }

    #[test]
    fn text_mask_replacer_handles_kinds() {
        let mask = TextMask::keep_last(2);
        assert_eq!(mask.replace(&Value::from("abcd"), "p").unwrap(), json!("**cd"));
        assert_eq!(mask.replace(&Value::from(12345_i64), "p").unwrap(), json!("***45"));
        assert_eq!(mask.replace(&Value::Null, "p").unwrap(), json!(DEFAULT_MASK));

        let full = TextMask::full("[x]");
        assert_eq!(full.replace(&Value::Bool(true), "p").unwrap(), json!("[x]"));
    }

    #[test]
    fn preset_replacers() {
        assert_eq!(
            EmailMask.replace(&Value::from("ann@b.io"), "email").unwrap(),
            json!("a***@b.io")
        );
        assert_eq!(
            EmailMask.replace(&Value::from(5_i64), "email").unwrap(),
            json!(DEFAULT_MASK)
        );
        assert_eq!(
            CreditCardMask
                .replace(&Value::from(4_111_111_111_111_111_u64), "card")
                .unwrap(),
            json!("****-****-****-1111")
        );
    }
}
