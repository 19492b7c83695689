//! Optional-returning navigation into untyped JSON documents.
//!
//! A [`Probe`] wraps a possibly-absent [`Value`].  Each step yields another probe, and once a
//! step misses every later step misses too, so a path such as
//! `choices[0].message.content` reads as a single chain:
//!
//! ```
//! use aoai_chat::utils::Probe;
//! use serde_json::json;
//!
//! let body = json!({"choices": [{"message": {"content": "hi"}}]});
//! let content = Probe::new(&body)
//!     .field("choices")
//!     .index(0)
//!     .field("message")
//!     .field("content")
//!     .as_str();
//! assert_eq!(content, Some("hi"));
//! assert_eq!(Probe::new(&body).field("usage").field("total_tokens").as_u64(), None);
//! ```

use serde_json::Value;

/// A cursor into a JSON document that may already have fallen off the path.
#[derive(Debug, Copy, Clone)]
pub struct Probe<'a> {
    value: Option<&'a Value>,
}

impl<'a> Probe<'a> {
    /// Start at the document root.
    pub fn new(root: &'a Value) -> Self {
        Self { value: Some(root) }
    }

    /// Step into an object member.  JSON `null` counts as absent.
    pub fn field(self, key: &str) -> Self {
        Self {
            value: self
                .value
                .and_then(|value| value.as_object())
                .and_then(|object| object.get(key))
                .filter(|value| !value.is_null()),
        }
    }

    /// Step into an array element.
    pub fn index(self, index: usize) -> Self {
        Self {
            value: self
                .value
                .and_then(|value| value.as_array())
                .and_then(|array| array.get(index))
                .filter(|value| !value.is_null()),
        }
    }

    /// The value at the current position.
    pub fn get(self) -> Option<&'a Value> {
        self.value
    }

    /// True if the path resolved to a non-null value.
    pub fn exists(self) -> bool {
        self.value.is_some()
    }

    /// The value as a string.
    pub fn as_str(self) -> Option<&'a str> {
        self.value.and_then(Value::as_str)
    }

    /// The value as a non-negative integer.
    pub fn as_u64(self) -> Option<u64> {
        self.value.and_then(Value::as_u64)
    }

    /// The value as a boolean.
    pub fn as_bool(self) -> Option<bool> {
        self.value.and_then(Value::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_circuits_on_first_miss() {
        let doc = json!({"a": {"b": [1, 2]}});
        assert!(Probe::new(&doc).field("a").field("b").index(1).exists());
        assert!(!Probe::new(&doc).field("x").field("b").index(1).exists());
        assert!(!Probe::new(&doc).field("a").field("b").index(7).exists());
    }

    #[test]
    fn null_is_absent() {
        let doc = json!({"a": null});
        assert!(!Probe::new(&doc).field("a").exists());
    }

    #[test]
    fn type_mismatch_is_absent() {
        let doc = json!({"a": "text", "n": -3});
        assert_eq!(Probe::new(&doc).field("a").index(0).get(), None);
        assert_eq!(Probe::new(&doc).field("a").as_bool(), None);
        assert_eq!(Probe::new(&doc).field("n").as_u64(), None);
    }
}
