//! Incremental list and dictionary emitters.
//!
//! Each builder writes its opening delimiter on construction and every element
//! as soon as it is added. `add` and `end` take the builder by value, so once
//! `end` has written the closing `e` the builder no longer exists. Dropping a
//! builder without calling `end` leaves the output unterminated.

use std::io::Write;

use super::{write_bytes, Encode, StringLike};
use crate::constants::{DICT_START, END, LIST_START};
use crate::error::Result;

/// Writes a bencode list element by element.
///
/// # Examples
///
/// ```
/// use bencodec::list_encoder;
///
/// let mut out: Vec<u8> = Vec::new();
/// list_encoder(&mut out)?.add(&1)?.add("foo")?.add(&2)?.end()?;
/// assert_eq!(out, b"li1e3:fooi2ee");
/// # Ok::<(), bencodec::BencodeError>(())
/// ```
#[must_use = "the list is unterminated until `end` is called"]
pub struct ListEncoder<'w, W: Write + ?Sized> {
    out: &'w mut W,
}

/// Starts a list on `out`.
pub fn list_encoder<W: Write + ?Sized>(out: &mut W) -> Result<ListEncoder<'_, W>> {
    ListEncoder::new(out)
}

impl<'w, W: Write + ?Sized> ListEncoder<'w, W> {
    pub fn new(out: &'w mut W) -> Result<Self> {
        out.write_all(&[LIST_START])?;
        Ok(Self { out })
    }

    /// Encodes one element.
    pub fn add<T: Encode + ?Sized>(mut self, value: &T) -> Result<Self> {
        value.encode_to(&mut *self.out)?;
        Ok(self)
    }

    /// Appends an already-encoded element verbatim.
    ///
    /// The fragment is not validated; it must be exactly one bencode value.
    pub fn add_raw(mut self, encoded: &[u8]) -> Result<Self> {
        self.out.write_all(encoded)?;
        Ok(self)
    }

    /// Writes the closing delimiter.
    pub fn end(mut self) -> Result<()> {
        self.out.write_all(&[END])?;
        Ok(())
    }
}

/// Writes a bencode dictionary entry by entry.
///
/// Entries are written in the order they are added; keys are neither sorted
/// nor checked for duplicates.
///
/// # Examples
///
/// ```
/// use bencodec::dict_encoder;
///
/// let mut out: Vec<u8> = Vec::new();
/// dict_encoder(&mut out)?
///     .add("first", &1)?
///     .add("second", "foo")?
///     .add("third", &2)?
///     .end()?;
/// assert_eq!(out, b"d5:firsti1e6:second3:foo5:thirdi2ee");
/// # Ok::<(), bencodec::BencodeError>(())
/// ```
#[must_use = "the dictionary is unterminated until `end` is called"]
pub struct DictEncoder<'w, W: Write + ?Sized> {
    out: &'w mut W,
}

/// Starts a dictionary on `out`.
pub fn dict_encoder<W: Write + ?Sized>(out: &mut W) -> Result<DictEncoder<'_, W>> {
    DictEncoder::new(out)
}

impl<'w, W: Write + ?Sized> DictEncoder<'w, W> {
    pub fn new(out: &'w mut W) -> Result<Self> {
        out.write_all(&[DICT_START])?;
        Ok(Self { out })
    }

    /// Encodes one key and its value.
    pub fn add<K, V>(mut self, key: &K, value: &V) -> Result<Self>
    where
        K: StringLike + ?Sized,
        V: Encode + ?Sized,
    {
        write_bytes(&mut *self.out, key.as_bencode_bytes())?;
        value.encode_to(&mut *self.out)?;
        Ok(self)
    }

    /// Encodes a key followed by an already-encoded value, written verbatim.
    pub fn add_raw<K: StringLike + ?Sized>(mut self, key: &K, encoded: &[u8]) -> Result<Self> {
        write_bytes(&mut *self.out, key.as_bencode_bytes())?;
        self.out.write_all(encoded)?;
        Ok(self)
    }

    /// Writes the closing delimiter.
    pub fn end(mut self) -> Result<()> {
        self.out.write_all(&[END])?;
        Ok(())
    }
}

/// Encodes a fixed list of heterogeneous elements straight into a writer.
///
/// Expands to a [`list_encoder`] chain and evaluates to
/// `bencodec::Result<()>`.
///
/// # Examples
///
/// ```
/// use bencodec::encode_list;
///
/// let mut out: Vec<u8> = Vec::new();
/// encode_list!(&mut out, 1, "foo", 2)?;
/// assert_eq!(out, b"li1e3:fooi2ee");
///
/// let mut empty: Vec<u8> = Vec::new();
/// encode_list!(&mut empty)?;
/// assert_eq!(empty, b"le");
/// # Ok::<(), bencodec::BencodeError>(())
/// ```
#[macro_export]
macro_rules! encode_list {
    ($out:expr $(, $item:expr)* $(,)?) => {{
        let encoder = $crate::list_encoder($out);
        $(
            let encoder = encoder.and_then(|encoder| encoder.add(&$item));
        )*
        encoder.and_then(|encoder| encoder.end())
    }};
}

/// Encodes a fixed set of key/value pairs straight into a writer, in the order
/// given.
///
/// # Examples
///
/// ```
/// use bencodec::encode_dict;
///
/// let mut out: Vec<u8> = Vec::new();
/// encode_dict!(&mut out, "first" => 1, "second" => "foo", "third" => 2)?;
/// assert_eq!(out, b"d5:firsti1e6:second3:foo5:thirdi2ee");
///
/// let mut empty: Vec<u8> = Vec::new();
/// encode_dict!(&mut empty)?;
/// assert_eq!(empty, b"de");
/// # Ok::<(), bencodec::BencodeError>(())
/// ```
#[macro_export]
macro_rules! encode_dict {
    ($out:expr $(, $key:expr => $value:expr)* $(,)?) => {{
        let encoder = $crate::dict_encoder($out);
        $(
            let encoder = encoder.and_then(|encoder| encoder.add(&$key, &$value));
        )*
        encoder.and_then(|encoder| encoder.end())
    }};
}
