use bytes::Bytes;
use indexmap::IndexMap;

use super::{mismatch, Dict, Kind, Value};
use crate::error::BencodeError;

/// A borrowed dictionary. Keys and string values point into the decoded buffer.
pub type DictView<'a> = IndexMap<&'a [u8], ValueView<'a>>;

/// A zero-copy bencode value.
///
/// Produced by [`decode_view`](crate::decode_view). Every byte string, including
/// dictionary keys, is a slice of the input buffer, so the view cannot outlive
/// the buffer it was decoded from.
///
/// # Examples
///
/// ```
/// use bencodec::{decode_view, ValueView};
///
/// let data = b"d4:spami666ee".to_vec();
/// let view = decode_view(&data).unwrap();
/// assert_eq!(view.get(b"spam"), Some(&ValueView::Integer(666)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueView<'a> {
    Integer(i64),
    Bytes(&'a [u8]),
    List(Vec<ValueView<'a>>),
    Dict(DictView<'a>),
}

impl<'a> ValueView<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            ValueView::Integer(_) => Kind::Integer,
            ValueView::Bytes(_) => Kind::Bytes,
            ValueView::List(_) => Kind::List,
            ValueView::Dict(_) => Kind::Dict,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ValueView::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            ValueView::Bytes(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string as `&str` if it is valid UTF-8. The result borrows
    /// from the source buffer, not from the view.
    pub fn as_str(&self) -> Option<&'a str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_list(&self) -> Option<&Vec<ValueView<'a>>> {
        match self {
            ValueView::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&DictView<'a>> {
        match self {
            ValueView::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<&ValueView<'a>> {
        self.as_dict()?.get(key)
    }

    fn is_container(&self) -> bool {
        matches!(self, ValueView::List(_) | ValueView::Dict(_))
    }

    /// Copies the view into an owned [`Value`] that no longer borrows the source.
    pub fn to_owned_value(&self) -> Value {
        match self {
            ValueView::Integer(i) => Value::Integer(*i),
            ValueView::Bytes(b) => Value::Bytes(Bytes::copy_from_slice(b)),
            ValueView::List(l) => Value::List(l.iter().map(ValueView::to_owned_value).collect()),
            ValueView::Dict(d) => Value::Dict(
                d.iter()
                    .map(|(k, v)| (Bytes::copy_from_slice(k), v.to_owned_value()))
                    .collect::<Dict>(),
            ),
        }
    }
}

impl Drop for ValueView<'_> {
    fn drop(&mut self) {
        let mut pending: Vec<ValueView<'_>> = match self {
            ValueView::List(l) if l.iter().any(ValueView::is_container) => std::mem::take(l),
            ValueView::Dict(d) if d.values().any(ValueView::is_container) => {
                d.drain(..).map(|(_, v)| v).collect()
            }
            _ => return,
        };

        while let Some(mut view) = pending.pop() {
            match &mut view {
                ValueView::List(l) => pending.append(l),
                ValueView::Dict(d) => pending.extend(d.drain(..).map(|(_, v)| v)),
                ValueView::Integer(_) | ValueView::Bytes(_) => {}
            }
        }
    }
}

impl<'a> From<&'a Value> for ValueView<'a> {
    fn from(value: &'a Value) -> Self {
        value.as_view()
    }
}

impl From<ValueView<'_>> for Value {
    fn from(view: ValueView<'_>) -> Self {
        view.to_owned_value()
    }
}

impl PartialEq<Value> for ValueView<'_> {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (ValueView::Integer(a), Value::Integer(b)) => a == b,
            (ValueView::Bytes(a), Value::Bytes(b)) => *a == &b[..],
            (ValueView::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            (ValueView::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(*k).is_some_and(|other| v == other))
            }
            _ => false,
        }
    }
}

impl PartialEq<ValueView<'_>> for Value {
    fn eq(&self, other: &ValueView<'_>) -> bool {
        other == self
    }
}

impl TryFrom<ValueView<'_>> for i64 {
    type Error = BencodeError;

    fn try_from(view: ValueView<'_>) -> Result<Self, Self::Error> {
        view.as_integer()
            .ok_or_else(|| mismatch(Kind::Integer, view.kind()))
    }
}

impl<'a> TryFrom<ValueView<'a>> for &'a [u8] {
    type Error = BencodeError;

    fn try_from(view: ValueView<'a>) -> Result<Self, Self::Error> {
        view.as_bytes()
            .ok_or_else(|| mismatch(Kind::Bytes, view.kind()))
    }
}

impl<'a> TryFrom<ValueView<'a>> for Vec<ValueView<'a>> {
    type Error = BencodeError;

    fn try_from(mut view: ValueView<'a>) -> Result<Self, Self::Error> {
        match &mut view {
            ValueView::List(l) => Ok(std::mem::take(l)),
            other => Err(mismatch(Kind::List, other.kind())),
        }
    }
}

impl<'a> TryFrom<ValueView<'a>> for DictView<'a> {
    type Error = BencodeError;

    fn try_from(mut view: ValueView<'a>) -> Result<Self, Self::Error> {
        match &mut view {
            ValueView::Dict(d) => Ok(std::mem::take(d)),
            other => Err(mismatch(Kind::Dict, other.kind())),
        }
    }
}
