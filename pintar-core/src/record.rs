//! Core traits for records and their conversion to and from storage.
//!
//! A [`Record`] is a validated in-memory representation of one entity. Records are
//! built from untyped JSON through [`Record::from_fields`] and written to the store
//! as BSON. When read back, raw documents go through an explicit allow-list
//! projection ([`Record::FIELDS`]) before being validated again, so keys the record
//! does not know about (the store's `_id`, insertion timestamps, fields written by
//! other clients) are dropped instead of causing a failure.

use bson::{Bson, Document as BsonDocument, ser::serialize_to_bson};
use serde::Serialize;
use serde_json::{Map, Value, to_value};
use std::fmt::Debug;

use crate::{
    error::{StorageError, StorageResult},
    validate::ValidationError,
};

/// Trait implemented by every entity type stored in a collection.
///
/// # Example
///
/// ```ignore
/// use pintar_core::{record::Record, validate::{Fields, ValidationError}};
/// use serde::Serialize;
/// use serde_json::{Map, Value};
///
/// #[derive(Debug, Clone, Serialize)]
/// pub struct Note {
///     pub text: String,
/// }
///
/// impl Record for Note {
///     const FIELDS: &'static [&'static str] = &["text"];
///
///     fn collection_name() -> &'static str {
///         "note"
///     }
///
///     fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError> {
///         let mut fields = Fields::new(map);
///         let text = fields.required_text("text");
///
///         fields.finish((|| Some(Note { text: text? }))())
///     }
/// }
/// ```
pub trait Record: Serialize + Send + Sync + Clone + Debug + 'static {
    /// Field names recognized by this record, in serialization order.
    const FIELDS: &'static [&'static str];

    /// Returns the name of the collection this record belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g. "company").
    fn collection_name() -> &'static str;

    /// Validates an untyped mapping into a record.
    ///
    /// Keys not named in [`Record::FIELDS`] are ignored.
    fn from_fields(map: &Map<String, Value>) -> Result<Self, ValidationError>;
}

/// Extension trait providing conversion utilities for records.
///
/// Automatically implemented for every [`Record`].
pub trait RecordExt: Record {
    /// Validates an arbitrary JSON value, rejecting anything that is not an object.
    fn from_json(value: &Value) -> Result<Self, ValidationError>;

    /// Converts this record to a JSON value.
    fn to_json(&self) -> StorageResult<Value>;

    /// Converts this record to a BSON value for storage.
    fn to_bson(&self) -> StorageResult<Bson>;

    /// Keeps only the keys of `raw` listed in [`Record::FIELDS`], as JSON.
    fn project(raw: &BsonDocument) -> StorageResult<Map<String, Value>>;

    /// Projects and re-validates a raw stored document.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidDocument`] if the stored fields do not form a
    /// valid record.
    fn from_raw(raw: &Bson) -> StorageResult<Self>;
}

impl<R: Record> RecordExt for R {
    fn from_json(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => R::from_fields(map),
            _ => Err(ValidationError::not_an_object()),
        }
    }

    fn to_json(&self) -> StorageResult<Value> {
        Ok(to_value(self)?)
    }

    fn to_bson(&self) -> StorageResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn project(raw: &BsonDocument) -> StorageResult<Map<String, Value>> {
        R::FIELDS
            .iter()
            .filter_map(|field| raw.get(*field).map(|value| (*field, value)))
            .map(|(field, value)| -> StorageResult<(String, Value)> {
                Ok((field.to_string(), to_value(value)?))
            })
            .collect()
    }

    fn from_raw(raw: &Bson) -> StorageResult<Self> {
        let raw = raw.as_document().ok_or_else(|| {
            StorageError::InvalidDocument(format!(
                "expected a document in collection {}",
                R::collection_name()
            ))
        })?;

        R::from_fields(&R::project(raw)?).map_err(|err| {
            StorageError::InvalidDocument(format!(
                "stored record in collection {} is invalid: {err}",
                R::collection_name()
            ))
        })
    }
}
