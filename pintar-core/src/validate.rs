//! Field-level validation of untyped JSON mappings.
//!
//! Records are built from a `serde_json` object through a [`Fields`] reader. Each
//! accessor extracts one named field, checks its constraint and remembers every
//! violation, so a single [`ValidationError`] lists all missing or malformed fields
//! of the input instead of only the first one.
//!
//! ```ignore
//! let mut fields = Fields::new(map);
//! let name = fields.required_text("name");
//! let website = fields.url("website");
//!
//! fields.finish((|| Some(Product { name: name?, website }))())
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$"
    )
    .unwrap();
}

/// Longest URL accepted by URL fields.
pub const MAX_URL_LENGTH: usize = 2083;

/// Longest email address accepted by email fields.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Longest local part (before the `@`) of an email address.
pub const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

/// The rule a field broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// A required field is absent.
    Missing,
    /// A required field is present but `null`.
    Null,
    /// The value is not a string.
    StringType,
    /// The value is not an array.
    ListType,
    /// The value is not an acceptable http(s) URL; carries the reason.
    Url(String),
    /// The value is not a well-formed email address; carries the reason.
    Email(String),
    /// The input as a whole is not a JSON object.
    ObjectType,
}

impl Constraint {
    /// Short machine-readable identifier of the constraint.
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Missing => "missing",
            Constraint::Null => "null",
            Constraint::StringType => "string_type",
            Constraint::ListType => "list_type",
            Constraint::Url(_) => "url",
            Constraint::Email(_) => "email",
            Constraint::ObjectType => "object_type",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Missing => write!(f, "Field required"),
            Constraint::Null => write!(f, "Field must not be null"),
            Constraint::StringType => write!(f, "Input should be a valid string"),
            Constraint::ListType => write!(f, "Input should be a valid list"),
            Constraint::Url(reason) => write!(f, "Input should be a valid URL, {reason}"),
            Constraint::Email(reason) => write!(f, "value is not a valid email address: {reason}"),
            Constraint::ObjectType => write!(f, "Input should be a valid object"),
        }
    }
}

/// One violated constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field; empty when the whole input is at fault.
    pub field: String,
    /// Position inside a list field, if the violation concerns a single item.
    pub index: Option<usize>,
    pub constraint: Constraint,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.field.is_empty(), self.index) {
            (true, _) => write!(f, "{}", self.constraint),
            (false, Some(index)) => write!(f, "{}[{}]: {}", self.field, index, self.constraint),
            (false, None) => write!(f, "{}: {}", self.field, self.constraint),
        }
    }
}

/// Input that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} validation error(s): {}", .violations.len(), display_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn display_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// The error for an input that is not a JSON object.
    pub fn not_an_object() -> Self {
        Self {
            violations: vec![FieldViolation {
                field: String::new(),
                index: None,
                constraint: Constraint::ObjectType,
            }],
        }
    }

    /// Returns true if `field` has at least one violation.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Checks that `value` is an absolute http(s) URL with a host.
pub fn check_url(value: &str) -> Result<(), String> {
    if value.len() > MAX_URL_LENGTH {
        return Err(format!("URL should have at most {MAX_URL_LENGTH} characters"));
    }

    let url = Url::parse(value).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err("URL scheme should be 'http' or 'https'".to_string());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err("empty host".to_string());
    }

    Ok(())
}

/// Checks that `value` looks like `local@domain.tld`.
pub fn check_email(value: &str) -> Result<(), String> {
    if !value.contains('@') {
        return Err("An email address must have an @-sign.".to_string());
    }
    if value.len() > MAX_EMAIL_LENGTH {
        return Err(format!("The email address is too long ({MAX_EMAIL_LENGTH} characters at most)."));
    }
    let local = value.rsplit_once('@').map_or(value, |(local, _)| local);
    if local.len() > MAX_EMAIL_LOCAL_LENGTH {
        return Err(format!(
            "The email address is too long before the @-sign ({MAX_EMAIL_LOCAL_LENGTH} characters at most)."
        ));
    }
    if !EMAIL_REGEX.is_match(value) {
        return Err("The email address is not valid.".to_string());
    }

    Ok(())
}

/// Reads typed fields out of a JSON object while collecting violations.
#[derive(Debug)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map, violations: Vec::new() }
    }

    fn violate(&mut self, field: &str, index: Option<usize>, constraint: Constraint) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            index,
            constraint,
        });
    }

    /// A text field that must be present and non-null.
    pub fn required_text(&mut self, field: &str) -> Option<String> {
        match self.map.get(field) {
            None => {
                self.violate(field, None, Constraint::Missing);
                None
            }
            Some(Value::Null) => {
                self.violate(field, None, Constraint::Null);
                None
            }
            Some(_) => self.text(field),
        }
    }

    /// An optional text field; absent and `null` both read as `None`.
    pub fn text(&mut self, field: &str) -> Option<String> {
        match self.map.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.violate(field, None, Constraint::StringType);
                None
            }
        }
    }

    /// An optional http(s) URL field.
    pub fn url(&mut self, field: &str) -> Option<String> {
        let value = self.text(field)?;

        match check_url(&value) {
            Ok(()) => Some(value),
            Err(reason) => {
                self.violate(field, None, Constraint::Url(reason));
                None
            }
        }
    }

    /// An optional email address field.
    pub fn email(&mut self, field: &str) -> Option<String> {
        let value = self.text(field)?;

        match check_email(&value) {
            Ok(()) => Some(value),
            Err(reason) => {
                self.violate(field, None, Constraint::Email(reason));
                None
            }
        }
    }

    /// An optional list of strings; absent and `null` read as the empty list.
    pub fn text_list(&mut self, field: &str) -> Vec<String> {
        let items = match self.map.get(field) {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.violate(field, None, Constraint::ListType);
                return Vec::new();
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                _ => self.violate(field, Some(index), Constraint::StringType),
            }
        }
        out
    }

    /// Ends validation: yields the record if no field was violated.
    ///
    /// `record` is expected to be `Some` whenever no violation was recorded, since
    /// every required accessor records one when it returns `None`.
    pub fn finish<T>(self, record: Option<T>) -> Result<T, ValidationError> {
        match (self.violations.is_empty(), record) {
            (true, Some(record)) => Ok(record),
            (_, _) => Err(ValidationError { violations: self.violations }),
        }
    }
}
