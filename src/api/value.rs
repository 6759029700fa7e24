//! The dynamically-typed values carried by XML-RPC calls, and the explicit encode/decode layer between them and the
//! typed request/response models.
//!
//! Requests are turned into argument maps by implementing [`Encode`], which builds an [`Args`] field by field.
//! Responses are turned back into models by implementing [`FromValue`], usually by reading named keys through
//! [`Fields`]. Nothing here uses reflection: every wire name is spelled out once, next to the field it belongs to.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::DecodeError;

/// An XML-RPC `<struct>`: unique keys, kept in a stable order.
pub type Struct = BTreeMap<String, Value>;

/// A single XML-RPC value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    String(String),
    Double(f64),
    DateTime(DateTime<Utc>),
    Base64(Vec<u8>),
    Array(Vec<Value>),
    Struct(Struct),
    Nil,
}

impl Value {
    /// The XML-RPC name of this value's type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Double(_) => "double",
            Value::DateTime(_) => "dateTime.iso8601",
            Value::Base64(_) => "base64",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Nil => "nil",
        }
    }

    /// Whether this value is the zero value of its type: `0`, `false`, an empty string, list, or struct.
    ///
    /// Timestamps are never considered zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(i) => *i == 0,
            Value::Bool(b) => !b,
            Value::String(s) => s.is_empty(),
            Value::Double(d) => *d == 0.0,
            Value::DateTime(_) => false,
            Value::Base64(b) => b.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Struct(s) => s.is_empty(),
            Value::Nil => true,
        }
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(v.into())
            }
        }
    )*};
}

value_from_int!(i64, i32, u32, u16, u8);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<Struct> for Value {
    fn from(v: Struct) -> Self {
        Value::Struct(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(v: &[T]) -> Self {
        Value::Array(v.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&Vec<T>> for Value {
    fn from(v: &Vec<T>) -> Self {
        v.as_slice().into()
    }
}

/// Timestamp formats without an offset that the registrar has been seen to send. These are all taken as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y%m%dT%H:%M:%S", "%Y%m%dT%H%M%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses a timestamp in any of the formats the registrar uses: XML-RPC's `20240131T12:00:00`, its dashed variants, a
/// bare `2024-01-31` date, or RFC 3339.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------------------------------------------------

/// The argument map of a single remote call, built one field at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Struct);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field that is always sent, even when it holds its zero value.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a field that is left out entirely when it holds its zero value.
    ///
    /// Some remote methods treat "absent" and "present but empty" differently, so an empty field is never sent as an
    /// empty marker.
    pub fn field_opt(mut self, key: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_zero() {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    /// Sets a field in place, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn into_struct(self) -> Struct {
        self.0
    }
}

impl From<Args> for Struct {
    fn from(args: Args) -> Self {
        args.0
    }
}

/// Request models that can be turned into the argument map of a remote call.
///
/// Encoding cannot fail: every field type used by requests has a wire representation and a zero value.
pub trait Encode {
    fn encode(&self) -> Args;
}

// ---------------------------------------------------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------------------------------------------------

/// Types that can be read out of a [`Value`].
///
/// Conversions are strict: a value of the wrong XML-RPC type is a [`DecodeError`], never a silent default. The only
/// widening allowed is an integer where a floating-point number is expected.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, DecodeError>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(DecodeError::mismatch("string", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(DecodeError::mismatch("boolean", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Double(d) => Ok(*d),
            Value::Int(i) => Ok(*i as f64),
            other => Err(DecodeError::mismatch("double", other)),
        }
    }
}

macro_rules! int_from_value {
    ($($ty:ty),*) => {$(
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, DecodeError> {
                match value {
                    Value::Int(i) => <$ty>::try_from(*i).map_err(|_| DecodeError::out_of_range(stringify!($ty), *i)),
                    other => Err(DecodeError::mismatch("int", other)),
                }
            }
        }
    )*};
}

int_from_value!(i64, i32, u32, u16, u8);

impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            Value::String(s) => parse_timestamp(s).ok_or_else(|| DecodeError::mismatch("dateTime.iso8601", value)),
            other => Err(DecodeError::mismatch("dateTime.iso8601", other)),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.at(&i.to_string())))
                .collect(),
            other => Err(DecodeError::mismatch("array", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Struct(s) => s
                .iter()
                .map(|(k, v)| T::from_value(v).map(|v| (k.clone(), v)).map_err(|e| e.at(k)))
                .collect(),
            other => Err(DecodeError::mismatch("struct", other)),
        }
    }
}

/// Read-only view over a response struct, with typed accessors keyed by wire name.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a>(&'a Struct);

impl<'a> Fields<'a> {
    pub fn new(inner: &'a Struct) -> Self {
        Self(inner)
    }

    /// Views `value` as a struct, failing if it is anything else.
    pub fn of(value: &'a Value) -> Result<Self, DecodeError> {
        match value {
            Value::Struct(s) => Ok(Self(s)),
            other => Err(DecodeError::mismatch("struct", other)),
        }
    }

    /// Reads the field `key`. An absent (or `nil`) field decodes to `T`'s default.
    pub fn get<T: FromValue + Default>(&self, key: &str) -> Result<T, DecodeError> {
        Ok(self.get_opt(key)?.unwrap_or_default())
    }

    /// Reads the field `key`, keeping absence visible as `None`.
    pub fn get_opt<T: FromValue>(&self, key: &str) -> Result<Option<T>, DecodeError> {
        match self.0.get(key) {
            None | Some(Value::Nil) => Ok(None),
            Some(value) => T::from_value(value).map(Some).map_err(|e| e.at(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn field_opt_skips_zero_values() {
        let args = Args::new()
            .field_opt("domain", "")
            .field_opt("ttl", 0u32)
            .field_opt("urlAppend", false)
            .field_opt("ns", Vec::<String>::new())
            .field_opt("name", "www")
            .field("type", "")
            .into_struct();

        assert_eq!(args.len(), 2);
        assert_eq!(args.get("name"), Some(&Value::String("www".into())));
        assert_eq!(args.get("type"), Some(&Value::String(String::new())));
        assert!(!args.contains_key("domain"));
        assert!(!args.contains_key("ttl"));
        assert!(!args.contains_key("urlAppend"));
        assert!(!args.contains_key("ns"));
    }

    #[test]
    fn later_insert_replaces_earlier_value() {
        let mut args = Args::new().field("wide", 1);
        args.insert("wide", 2);
        assert_eq!(args.into_struct().get("wide"), Some(&Value::Int(2)));
    }

    #[test]
    fn absent_fields_default() {
        let data = Struct::new();
        let fields = Fields::new(&data);
        assert_eq!(fields.get::<i64>("roId").unwrap(), 0);
        assert_eq!(fields.get::<String>("domain").unwrap(), "");
        assert_eq!(fields.get::<Vec<String>>("ns").unwrap(), Vec::<String>::new());
        assert_eq!(fields.get_opt::<DateTime<Utc>>("crDate").unwrap(), None);
    }

    #[test]
    fn mismatched_type_reports_the_path() {
        let mut inner = Struct::new();
        inner.insert("id".into(), Value::String("42".into()));
        let mut data = Struct::new();
        data.insert("record".into(), Value::Array(vec![Value::Struct(inner)]));

        #[derive(Debug)]
        struct Rec {
            #[allow(dead_code)]
            id: i64,
        }

        impl FromValue for Rec {
            fn from_value(value: &Value) -> Result<Self, DecodeError> {
                let f = Fields::of(value)?;
                Ok(Self { id: f.get("id")? })
            }
        }

        let err = Fields::new(&data).get::<Vec<Rec>>("record").unwrap_err();
        assert_eq!(err.path(), "record.0.id");
        assert_eq!(err.to_string(), "cannot decode `record.0.id`: expected int, found string");
    }

    #[test]
    fn nested_structs_decode_as_maps() {
        let mut inner = Struct::new();
        inner.insert("ip".into(), Value::String("192.0.2.1".into()));
        let value = Value::Struct(inner.clone());

        assert_eq!(Struct::from_value(&value).unwrap(), inner);
        assert_eq!(
            BTreeMap::<String, String>::from_value(&value).unwrap()["ip"],
            "192.0.2.1"
        );

        let err = Struct::from_value(&Value::Array(vec![])).unwrap_err();
        assert_eq!(err.to_string(), "cannot decode ``: expected struct, found array");
    }

    #[test]
    fn integers_are_range_checked() {
        let err = u8::from_value(&Value::Int(300)).unwrap_err();
        assert!(err.to_string().contains("u8"));
        assert_eq!(f64::from_value(&Value::Int(3)).unwrap(), 3.0);
    }

    #[test]
    fn timestamps_in_all_registrar_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 31, 12, 30, 5).unwrap();
        assert_eq!(parse_timestamp("20240131T12:30:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31T12:30:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31 12:30:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31T14:30:05+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-31"), Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).single());
        assert_eq!(parse_timestamp("yesterday"), None);

        let from_string = DateTime::<Utc>::from_value(&Value::String("20240131T12:30:05".into())).unwrap();
        assert_eq!(from_string, expected);
    }
}
