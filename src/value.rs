use bytes::Bytes;
use indexmap::IndexMap;
use std::fmt;

use crate::error::BencodeError;

mod view;

pub use view::{DictView, ValueView};

/// An owned dictionary. Entries keep the order they were decoded or inserted in.
pub type Dict = IndexMap<Bytes, Value>;

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// This enum represents any bencode value and provides methods for type-safe access.
///
/// Dictionaries preserve the order of their entries, so decoding and re-encoding
/// a value reproduces the original bytes. Use [`Value::sort_keys`] to put a tree
/// into canonical key order before encoding.
///
/// # Examples
///
/// ```
/// use bencodec::Value;
///
/// // Creating values directly
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// // Using From implementations
/// let int2: Value = 42i64.into();
/// let string2: Value = "hello".into();
///
/// // Accessing values
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// assert_eq!(int, int2);
/// assert_eq!(string, string2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(Bytes),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A dictionary with byte string keys, in insertion order.
    Dict(Dict),
}

/// The four kinds of bencode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Bytes,
    List,
    Dict,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Integer => "integer",
            Kind::Bytes => "string",
            Kind::List => "list",
            Kind::Dict => "dict",
        })
    }
}

impl Value {
    /// Creates a byte string value from a UTF-8 string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodec::Value;
    ///
    /// let value = Value::string("hello");
    /// assert_eq!(value.as_str(), Some("hello"));
    /// ```
    pub fn string(s: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(s.as_bytes()))
    }

    /// Creates a byte string value from raw bytes.
    pub fn bytes(b: impl Into<Bytes>) -> Self {
        Value::Bytes(b.into())
    }

    /// Creates an empty dictionary value.
    pub fn dict() -> Self {
        Value::Dict(Dict::new())
    }

    /// Returns the kind of value stored.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Bytes(_) => Kind::Bytes,
            Value::List(_) => Kind::List,
            Value::Dict(_) => Kind::Dict,
        }
    }

    /// Returns the value as an integer, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodec::Value;
    ///
    /// let int = Value::Integer(42);
    /// assert_eq!(int.as_integer(), Some(42));
    ///
    /// let string = Value::string("hello");
    /// assert_eq!(string.as_integer(), None);
    /// ```
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a byte string, if it is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// Returns `None` if the value is not a byte string or if the bytes are not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a mutable list, if it is one.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Consumes the value and returns the list, if it is one.
    pub fn into_list(mut self) -> Option<Vec<Value>> {
        match &mut self {
            Value::List(l) => Some(std::mem::take(l)),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodec::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// let dict = value.as_dict().unwrap();
    /// assert!(dict.contains_key(b"foo".as_slice()));
    /// ```
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the value as a mutable dictionary, if it is one.
    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    ///
    /// This avoids cloning the dictionary when you need ownership.
    pub fn into_dict(mut self) -> Option<Dict> {
        match &mut self {
            Value::Dict(d) => Some(std::mem::take(d)),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// Returns `None` if the value is not a dictionary or if the key is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodec::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.as_dict()?.get(key)
    }

    fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Dict(_))
    }

    /// Borrows this tree as a [`ValueView`] without copying any string data.
    pub fn as_view(&self) -> ValueView<'_> {
        match self {
            Value::Integer(i) => ValueView::Integer(*i),
            Value::Bytes(b) => ValueView::Bytes(b),
            Value::List(l) => ValueView::List(l.iter().map(Value::as_view).collect()),
            Value::Dict(d) => {
                ValueView::Dict(d.iter().map(|(k, v)| (k.as_ref(), v.as_view())).collect())
            }
        }
    }

    /// Recursively sorts every dictionary in the tree by raw key bytes, the
    /// canonical order for bencode.
    ///
    /// # Examples
    ///
    /// ```
    /// use bencodec::{decode, encode};
    ///
    /// let mut value = decode(b"d1:bi2e1:ai1ee").unwrap();
    /// value.sort_keys();
    /// assert_eq!(encode(&value).unwrap(), b"d1:ai1e1:bi2ee");
    /// ```
    pub fn sort_keys(&mut self) {
        match self {
            Value::List(l) => l.iter_mut().for_each(Value::sort_keys),
            Value::Dict(d) => {
                d.sort_keys();
                d.values_mut().for_each(Value::sort_keys);
            }
            Value::Integer(_) | Value::Bytes(_) => {}
        }
    }
}

// Nested containers are torn down from a heap worklist so that dropping a
// deeply nested tree does not recurse once per level.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending: Vec<Value> = match self {
            Value::List(l) if l.iter().any(Value::is_container) => std::mem::take(l),
            Value::Dict(d) if d.values().any(Value::is_container) => {
                d.drain(..).map(|(_, v)| v).collect()
            }
            _ => return,
        };

        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::List(l) => pending.append(l),
                Value::Dict(d) => pending.extend(d.drain(..).map(|(_, v)| v)),
                Value::Integer(_) | Value::Bytes(_) => {}
            }
        }
    }
}

fn mismatch(expected: Kind, found: Kind) -> BencodeError {
    BencodeError::TypeMismatch { expected, found }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(b))
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}

impl TryFrom<Value> for i64 {
    type Error = BencodeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(i) => Ok(i),
            other => Err(mismatch(Kind::Integer, other.kind())),
        }
    }
}

impl TryFrom<Value> for Bytes {
    type Error = BencodeError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match &mut value {
            Value::Bytes(b) => Ok(std::mem::take(b)),
            other => Err(mismatch(Kind::Bytes, other.kind())),
        }
    }
}

impl TryFrom<Value> for Vec<Value> {
    type Error = BencodeError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match &mut value {
            Value::List(l) => Ok(std::mem::take(l)),
            other => Err(mismatch(Kind::List, other.kind())),
        }
    }
}

impl TryFrom<Value> for Dict {
    type Error = BencodeError;

    fn try_from(mut value: Value) -> Result<Self, Self::Error> {
        match &mut value {
            Value::Dict(d) => Ok(std::mem::take(d)),
            other => Err(mismatch(Kind::Dict, other.kind())),
        }
    }
}

impl TryFrom<&Value> for i64 {
    type Error = BencodeError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        value
            .as_integer()
            .ok_or_else(|| mismatch(Kind::Integer, value.kind()))
    }
}

impl<'a> TryFrom<&'a Value> for &'a [u8] {
    type Error = BencodeError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bytes(b) => Ok(b.as_ref()),
            other => Err(mismatch(Kind::Bytes, other.kind())),
        }
    }
}
