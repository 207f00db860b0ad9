use bytes::Bytes;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::{BTreeMap, VecDeque};
use std::io::Write;

use crate::constants::{DICT_START, END, LIST_START};
use crate::error::Result;
use crate::value::{Value, ValueView};

mod builder;

pub use builder::{dict_encoder, list_encoder, DictEncoder, ListEncoder};

/// A type with a bencode representation.
///
/// Implemented for integer scalars and `bool`, string types, sequences,
/// tuples, string-keyed ordered maps, and [`Value`]/[`ValueView`]. Maps are
/// written in their own iteration order; keys are never re-sorted.
///
/// Unsigned integers are written as their full decimal value. A `u64` or
/// `usize` above `i64::MAX` is valid bencode, but [`decode`](crate::decode)
/// reads integers as `i64` and rejects it with
/// [`BencodeError::IntegerOverflow`](crate::BencodeError::IntegerOverflow).
///
/// `HashMap` is intentionally not supported because its iteration order is
/// unspecified. Raw byte slices are lists of integers; wrap them in
/// [`AsString`] to write them as strings.
pub trait Encode {
    /// Writes the encoding of `self` to `out`.
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()>;
}

/// A type that is written as a bencode byte string and may key a dictionary.
pub trait StringLike {
    fn as_bencode_bytes(&self) -> &[u8];
}

/// Encodes any byte container as a bencode string.
///
/// # Examples
///
/// ```
/// use bencodec::{encode, AsString};
///
/// let raw = vec![0u8, 1, 2];
/// assert_eq!(encode(&AsString(&raw)).unwrap(), b"3:\x00\x01\x02");
/// assert_eq!(encode(&raw).unwrap(), b"li0ei1ei2ee");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AsString<T>(pub T);

/// Encodes a value to a byte vector.
///
/// The output follows the bencode format:
/// - Integers: `i<number>e`
/// - Byte strings: `<length>:<data>`
/// - Lists: `l<items>e`
/// - Dictionaries: `d<key><value>...e` (keys in the map's iteration order)
///
/// # Errors
///
/// Returns an error if writing to the internal buffer fails.
///
/// # Examples
///
/// ```
/// use bencodec::{encode, Value};
/// use std::collections::BTreeMap;
///
/// assert_eq!(encode(&666).unwrap(), b"i666e");
/// assert_eq!(encode("foo").unwrap(), b"3:foo");
/// assert_eq!(encode(&vec![1, 2, 3]).unwrap(), b"li1ei2ei3ee");
/// assert_eq!(encode(&(1, "foo", 2)).unwrap(), b"li1e3:fooi2ee");
///
/// let mut map = BTreeMap::new();
/// map.insert("b", "dog");
/// map.insert("a", "cat");
/// assert_eq!(encode(&map).unwrap(), b"d1:a3:cat1:b3:doge");
///
/// let list = Value::List(vec![Value::Integer(1), Value::string("two")]);
/// assert_eq!(encode(&list).unwrap(), b"li1e3:twoe");
/// ```
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    value.encode_to(&mut buf)?;
    Ok(buf)
}

/// Encodes a value directly into a writer.
pub fn encode_to<W: Write + ?Sized, T: Encode + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    value.encode_to(out)
}

pub(crate) fn write_bytes<W: Write + ?Sized>(out: &mut W, bytes: &[u8]) -> Result<()> {
    write!(out, "{}:", bytes.len())?;
    out.write_all(bytes)?;
    Ok(())
}

fn write_list<'a, W, T, I>(out: &mut W, items: I) -> Result<()>
where
    W: Write + ?Sized,
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
{
    out.write_all(&[LIST_START])?;
    for item in items {
        item.encode_to(out)?;
    }
    out.write_all(&[END])?;
    Ok(())
}

fn write_dict<'a, W, K, V, I>(out: &mut W, entries: I) -> Result<()>
where
    W: Write + ?Sized,
    K: StringLike + ?Sized + 'a,
    V: Encode + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    out.write_all(&[DICT_START])?;
    for (key, value) in entries {
        write_bytes(out, key.as_bencode_bytes())?;
        value.encode_to(out)?;
    }
    out.write_all(&[END])?;
    Ok(())
}

// ============================================================================
// Scalars
// ============================================================================

macro_rules! impl_encode_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                    write!(out, "i{}e", self)?;
                    Ok(())
                }
            }
        )*
    };
}

impl_encode_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Encode for bool {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        i64::from(*self).encode_to(out)
    }
}

macro_rules! impl_encode_string {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                    write_bytes(out, self.as_bencode_bytes())
                }
            }
        )*
    };
}

impl_encode_string!(str, String, Bytes, Cow<'_, str>);

impl StringLike for str {
    fn as_bencode_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringLike for String {
    fn as_bencode_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringLike for Cow<'_, str> {
    fn as_bencode_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl StringLike for Bytes {
    fn as_bencode_bytes(&self) -> &[u8] {
        self
    }
}

// Byte containers can key a dictionary, but only encode as strings through
// `AsString`.
impl StringLike for [u8] {
    fn as_bencode_bytes(&self) -> &[u8] {
        self
    }
}

impl StringLike for Vec<u8> {
    fn as_bencode_bytes(&self) -> &[u8] {
        self
    }
}

impl<T: AsRef<[u8]>> StringLike for AsString<T> {
    fn as_bencode_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: AsRef<[u8]>> Encode for AsString<T> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_bytes(out, self.as_bencode_bytes())
    }
}

impl<T: StringLike + ?Sized> StringLike for &T {
    fn as_bencode_bytes(&self) -> &[u8] {
        (**self).as_bencode_bytes()
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Encode> Encode for [T] {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_list(out, self)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_list(out, self)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_list(out, self)
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_list(out, self)
    }
}

macro_rules! impl_encode_tuple {
    ($($name:ident $var:ident),+) => {
        impl<$($name: Encode),+> Encode for ($($name,)+) {
            fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
                let ($($var,)+) = self;
                out.write_all(&[LIST_START])?;
                $($var.encode_to(out)?;)+
                out.write_all(&[END])?;
                Ok(())
            }
        }
    };
}

impl_encode_tuple!(A a);
impl_encode_tuple!(A a, B b);
impl_encode_tuple!(A a, B b, C c);
impl_encode_tuple!(A a, B b, C c, D d);
impl_encode_tuple!(A a, B b, C c, D d, E e);
impl_encode_tuple!(A a, B b, C c, D d, E e, F f);
impl_encode_tuple!(A a, B b, C c, D d, E e, F f, G g);
impl_encode_tuple!(A a, B b, C c, D d, E e, F f, G g, H h);

// ============================================================================
// Mappings
// ============================================================================

impl<K: StringLike, V: Encode> Encode for BTreeMap<K, V> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_dict(out, self)
    }
}

impl<K: StringLike, V: Encode, S> Encode for IndexMap<K, V, S> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        write_dict(out, self)
    }
}

// ============================================================================
// Value trees and indirection
// ============================================================================

impl Encode for Value {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        match self {
            Value::Integer(i) => i.encode_to(out),
            Value::Bytes(b) => write_bytes(out, b),
            Value::List(l) => write_list(out, l),
            Value::Dict(d) => write_dict(out, d),
        }
    }
}

impl Encode for ValueView<'_> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        match self {
            ValueView::Integer(i) => i.encode_to(out),
            ValueView::Bytes(b) => write_bytes(out, b),
            ValueView::List(l) => write_list(out, l),
            ValueView::Dict(d) => write_dict(out, d),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        (**self).encode_to(out)
    }
}

impl<T: Encode + ?Sized> Encode for &mut T {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        (**self).encode_to(out)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        (**self).encode_to(out)
    }
}

#[cfg(test)]
mod tests;
