//! Vocabulary terms

use std::fmt;

use crate::value::Value;

/// One vocabulary entry: a value, its ASCII token and an optional title.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTerm {
    value: Value,
    token: String,
    title: Option<String>,
}

impl SimpleTerm {
    /// Creates a term whose token is derived from the value.
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        let token = derive_token(&value);
        Self {
            value,
            token,
            title: None,
        }
    }

    /// Creates a term with an explicit token. Non-ASCII characters in the
    /// token are escaped.
    pub fn with_token(value: impl Into<Value>, token: &str) -> Self {
        Self {
            value: value.into(),
            token: escape_non_ascii(token),
            title: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl fmt::Display for SimpleTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.token),
            None => f.write_str(&self.token),
        }
    }
}

/// Token for a value: text as-is, bytes read as latin-1, anything else by
/// its display form; then non-ASCII is backslash-escaped.
pub fn derive_token(value: &Value) -> String {
    match value {
        Value::Text(s) => escape_non_ascii(s),
        Value::Bytes(b) => escape_non_ascii(&b.iter().map(|byte| char::from(*byte)).collect::<String>()),
        other => escape_non_ascii(&other.to_string()),
    }
}

/// Replaces every non-ASCII character with `\xNN`, `\uNNNN` or `\UNNNNNNNN`.
pub fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let code = u32::from(c);
        if code < 0x80 {
            out.push(c);
        } else if code < 0x100 {
            out.push_str(&format!("\\x{:02x}", code));
        } else if code < 0x10000 {
            out.push_str(&format!("\\u{:04x}", code));
        } else {
            out.push_str(&format!("\\U{:08x}", code));
        }
    }
    out
}
