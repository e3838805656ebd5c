//! Field name sanitization for MongoDB compatibility.
//!
//! MongoDB restricts field names (and collection names) from containing certain
//! characters that carry meaning in its query syntax. Values are stored untouched;
//! only keys are escaped on the way in and restored on the way out.

use bson::{Bson, Document};

/// Escapes and restores keys that MongoDB would reject or misinterpret.
///
/// MongoDB does not allow keys to contain:
/// - Dots (`.`) - used for nested field access in queries
/// - Dollar signs (`$`) - used for operators in queries
/// - Null bytes (`\0`) - field name terminators
pub(crate) struct KeySanitizer;

impl KeySanitizer {
    const REPLACEMENTS: [(&'static str, &'static str); 3] = [
        (".", "__dot__"),
        ("$", "__dollar__"),
        ("\0", "__null__"),
    ];

    /// Recursively escapes the keys of every document nested in `value`.
    pub(crate) fn sanitize_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::sanitize_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::sanitize_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn sanitize_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::sanitize_string(k), Self::sanitize_value(v)))
            .collect()
    }

    /// Replaces problematic characters with their escaped form.
    pub(crate) fn sanitize_string(input: &str) -> String {
        let mut sanitized = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter() {
            sanitized = sanitized.replace(*target, *replacement);
        }
        sanitized
    }

    /// Inverse of [`KeySanitizer::sanitize_value`].
    pub(crate) fn restore_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::restore_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::restore_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn restore_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::restore_string(k), Self::restore_value(v)))
            .collect()
    }

    /// Reverts the escapes of [`KeySanitizer::sanitize_string`].
    pub(crate) fn restore_string(input: &str) -> String {
        let mut restored = input.to_string();
        for (target, replacement) in Self::REPLACEMENTS.iter().rev() {
            restored = restored.replace(*replacement, *target);
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn escapes_keys_but_not_values() {
        let original = doc! {
            "website": "https://example.com",
            "meta": { "a.b": "$x", "list": [{ "$k": 1 }] }
        };

        let sanitized = KeySanitizer::sanitize_document(&original);
        assert_eq!(sanitized.get_str("website").unwrap(), "https://example.com");

        let meta = sanitized.get_document("meta").unwrap();
        assert_eq!(meta.get_str("a__dot__b").unwrap(), "$x");
        assert!(meta.get_array("list").unwrap()[0]
            .as_document()
            .unwrap()
            .contains_key("__dollar__k"));

        assert_eq!(KeySanitizer::restore_document(&sanitized), original);
    }

    #[test]
    fn plain_collection_names_are_unchanged() {
        assert_eq!(KeySanitizer::sanitize_string("productapp"), "productapp");
        assert_eq!(KeySanitizer::sanitize_string("a.b"), "a__dot__b");
        assert_eq!(KeySanitizer::restore_string("a__dot__b"), "a.b");
    }
}
