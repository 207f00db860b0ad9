use bytes::Bytes;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::hash::Hash;
use std::io::BufRead;
use tracing::{debug, trace};

use crate::constants::{DICT_START, END, INTEGER_START, LENGTH_SEPARATOR, LIST_START, MINUS};
use crate::error::{BencodeError, Result};
use crate::value::{Value, ValueView};

mod read;

use read::{IoRead, Read, SliceRead};

/// Decoder settings.
///
/// The default places no limit on nesting. Open containers are tracked on the
/// heap, so deep input costs memory but never overflows the call stack.
///
/// # Examples
///
/// ```
/// use bencodec::{decode_with, BencodeError, DecodeOptions};
///
/// let options = DecodeOptions::new().with_max_depth(2);
/// assert!(decode_with(b"llee", &options).is_ok());
/// assert!(matches!(
///     decode_with(b"llleee", &options),
///     Err(BencodeError::NestingTooDeep)
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum number of nested lists and dictionaries. A top-level container
    /// has depth 1.
    pub max_depth: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Decodes one bencode value from a byte slice, copying every string.
///
/// Exactly one top-level value is consumed; bytes after it are ignored. Use
/// [`decode_prefix`] to learn where the value ended.
///
/// # Errors
///
/// Returns the first syntax error encountered. No partial value is produced.
///
/// # Examples
///
/// ```
/// use bencodec::{decode, BencodeError, Value};
///
/// assert_eq!(decode(b"i666e").unwrap(), Value::Integer(666));
/// assert_eq!(decode(b"4:spam").unwrap().as_str(), Some("spam"));
///
/// let err = decode(b"d3:fooi1e3:fooi1ee").unwrap_err();
/// assert_eq!(err.to_string(), "duplicated key in dict: foo");
/// ```
pub fn decode(data: &[u8]) -> Result<Value> {
    decode_with(data, &DecodeOptions::default())
}

/// Like [`decode`], with explicit [`DecodeOptions`].
pub fn decode_with(data: &[u8], options: &DecodeOptions) -> Result<Value> {
    trace!(len = data.len(), "decoding owned bencode value");
    run(SliceRead::new(data), options).map(|(value, _)| value)
}

/// Decodes one value and returns it with the number of bytes it occupied.
///
/// # Examples
///
/// ```
/// use bencodec::{decode_prefix, Value};
///
/// let (value, used) = decode_prefix(b"i1etrailing").unwrap();
/// assert_eq!(value, Value::Integer(1));
/// assert_eq!(used, 3);
/// ```
pub fn decode_prefix(data: &[u8]) -> Result<(Value, usize)> {
    trace!(len = data.len(), "decoding owned bencode prefix");
    run(SliceRead::new(data), &DecodeOptions::default())
}

/// Decodes one bencode value from a byte slice without copying strings.
///
/// Every string and dictionary key in the result borrows from `data`.
///
/// # Examples
///
/// ```
/// use bencodec::{decode_view, ValueView};
///
/// let data = b"d4:spami666ee";
/// let value = decode_view(data).unwrap();
/// let dict = value.as_dict().unwrap();
/// assert_eq!(dict.get(b"spam".as_slice()), Some(&ValueView::Integer(666)));
/// ```
pub fn decode_view(data: &[u8]) -> Result<ValueView<'_>> {
    decode_view_with(data, &DecodeOptions::default())
}

/// Like [`decode_view`], with explicit [`DecodeOptions`].
pub fn decode_view_with<'a>(data: &'a [u8], options: &DecodeOptions) -> Result<ValueView<'a>> {
    trace!(len = data.len(), "decoding borrowed bencode value");
    run(SliceRead::new(data), options).map(|(value, _)| value)
}

/// Borrowing counterpart of [`decode_prefix`].
pub fn decode_view_prefix(data: &[u8]) -> Result<(ValueView<'_>, usize)> {
    trace!(len = data.len(), "decoding borrowed bencode prefix");
    run(SliceRead::new(data), &DecodeOptions::default())
}

/// Decodes one bencode value from a buffered stream.
///
/// Bytes are pulled as the grammar needs them, and only the bytes of the
/// decoded value are consumed: whatever follows remains readable from
/// `reader`. End of stream inside a value is reported as
/// [`BencodeError::UnexpectedEof`].
///
/// # Examples
///
/// ```
/// use bencodec::decode_reader;
/// use std::io::{BufRead, Cursor};
///
/// let mut cursor = Cursor::new(b"d4:spami666eerest".to_vec());
/// let value = decode_reader(&mut cursor).unwrap();
/// assert_eq!(value.get(b"spam").and_then(|v| v.as_integer()), Some(666));
/// assert_eq!(cursor.fill_buf().unwrap(), b"rest");
/// ```
pub fn decode_reader<R: BufRead + ?Sized>(reader: &mut R) -> Result<Value> {
    decode_reader_with(reader, &DecodeOptions::default())
}

/// Like [`decode_reader`], with explicit [`DecodeOptions`].
pub fn decode_reader_with<R: BufRead + ?Sized>(
    reader: &mut R,
    options: &DecodeOptions,
) -> Result<Value> {
    trace!("decoding owned bencode value from stream");
    run(IoRead::new(reader), options).map(|(value, _)| value)
}

fn run<'de, R: Read<'de>, T: Build<'de, R>>(
    reader: R,
    options: &DecodeOptions,
) -> Result<(T, usize)> {
    let mut parser = Parser::new(reader, options);
    match parser.parse_value::<T>() {
        Ok(value) => Ok((value, parser.reader.position())),
        Err(e) => {
            debug!(error = %e, offset = parser.reader.position(), "bencode decode failed");
            Err(e)
        }
    }
}

/// Constructs a value tree from the productions the parser recognizes.
///
/// The owning tree accepts any source; the borrowing tree needs a slice source
/// so that its strings can point into it.
pub(crate) trait Build<'de, R: Read<'de>>: Sized {
    type Key: AsRef<[u8]> + Hash + Eq;

    fn integer(value: i64) -> Self;

    fn bytes(reader: &mut R, len: usize) -> Result<Self>;

    fn key(reader: &mut R, len: usize) -> Result<Self::Key>;

    fn list(items: Vec<Self>) -> Self;

    fn dict(entries: IndexMap<Self::Key, Self>) -> Self;
}

impl<'de, R: Read<'de>> Build<'de, R> for Value {
    type Key = Bytes;

    fn integer(value: i64) -> Self {
        Value::Integer(value)
    }

    fn bytes(reader: &mut R, len: usize) -> Result<Self> {
        reader.read_owned(len).map(Value::Bytes)
    }

    fn key(reader: &mut R, len: usize) -> Result<Bytes> {
        reader.read_owned(len)
    }

    fn list(items: Vec<Self>) -> Self {
        Value::List(items)
    }

    fn dict(entries: IndexMap<Bytes, Self>) -> Self {
        Value::Dict(entries)
    }
}

impl<'de> Build<'de, SliceRead<'de>> for ValueView<'de> {
    type Key = &'de [u8];

    fn integer(value: i64) -> Self {
        ValueView::Integer(value)
    }

    fn bytes(reader: &mut SliceRead<'de>, len: usize) -> Result<Self> {
        reader.read_borrowed(len).map(ValueView::Bytes)
    }

    fn key(reader: &mut SliceRead<'de>, len: usize) -> Result<&'de [u8]> {
        reader.read_borrowed(len)
    }

    fn list(items: Vec<Self>) -> Self {
        ValueView::List(items)
    }

    fn dict(entries: IndexMap<&'de [u8], Self>) -> Self {
        ValueView::Dict(entries)
    }
}

/// A list or dictionary that is still open.
enum Frame<T, K> {
    List(Vec<T>),
    Dict {
        entries: IndexMap<K, T>,
        /// Key read for the value currently being parsed.
        key: Option<K>,
    },
}

impl<T, K: AsRef<[u8]> + Hash + Eq> Frame<T, K> {
    fn push(&mut self, value: T) -> Result<()> {
        match self {
            Frame::List(items) => items.push(value),
            Frame::Dict { entries, key } => {
                // A dict only asks for a value once its key has been read.
                let key = key.take().ok_or(BencodeError::ExpectedStringToken)?;
                match entries.entry(key) {
                    Entry::Occupied(entry) => {
                        let key = String::from_utf8_lossy(entry.key().as_ref()).into_owned();
                        return Err(BencodeError::DuplicatedKey(key));
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
        }
        Ok(())
    }
}

enum Token<T, K> {
    Value(T),
    Open(Frame<T, K>),
}

/// Recognizes one value. Open containers live on a heap stack, so nesting is
/// limited by memory rather than by the call stack.
struct Parser<R> {
    reader: R,
    max_depth: Option<usize>,
}

impl<'de, R: Read<'de>> Parser<R> {
    fn new(reader: R, options: &DecodeOptions) -> Self {
        Self {
            reader,
            max_depth: options.max_depth,
        }
    }

    fn parse_value<T: Build<'de, R>>(&mut self) -> Result<T> {
        let mut current = match self.parse_token::<T>()? {
            Token::Value(value) => return Ok(value),
            Token::Open(frame) => frame,
        };
        self.check_depth(1)?;
        let mut parents: Vec<Frame<T, T::Key>> = Vec::new();

        loop {
            let next = self.reader.peek()?.ok_or(BencodeError::UnexpectedEof)?;

            if next == END {
                self.reader.discard();
                let done = Self::close::<T>(current);
                match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        current.push(done)?;
                        continue;
                    }
                    None => return Ok(done),
                }
            }

            if let Frame::Dict { key, .. } = &mut current {
                if !next.is_ascii_digit() {
                    return Err(BencodeError::ExpectedStringToken);
                }
                let len = self.parse_length()?;
                *key = Some(T::key(&mut self.reader, len)?);
            }

            match self.parse_token::<T>()? {
                Token::Value(value) => current.push(value)?,
                Token::Open(frame) => {
                    self.check_depth(parents.len() + 2)?;
                    parents.push(std::mem::replace(&mut current, frame));
                }
            }
        }
    }

    /// Reads a scalar in full, or the opening delimiter of a container.
    fn parse_token<T: Build<'de, R>>(&mut self) -> Result<Token<T, T::Key>> {
        match self.reader.peek()? {
            Some(INTEGER_START) => {
                self.reader.discard();
                self.parse_integer().map(|i| Token::Value(T::integer(i)))
            }
            Some(b'0'..=b'9') => {
                let len = self.parse_length()?;
                T::bytes(&mut self.reader, len).map(Token::Value)
            }
            Some(LIST_START) => {
                self.reader.discard();
                Ok(Token::Open(Frame::List(Vec::new())))
            }
            Some(DICT_START) => {
                self.reader.discard();
                Ok(Token::Open(Frame::Dict {
                    entries: IndexMap::new(),
                    key: None,
                }))
            }
            Some(_) => Err(BencodeError::UnexpectedType),
            None => Err(BencodeError::UnexpectedEof),
        }
    }

    fn close<T: Build<'de, R>>(frame: Frame<T, T::Key>) -> T {
        match frame {
            Frame::List(items) => T::list(items),
            Frame::Dict { entries, .. } => T::dict(entries),
        }
    }

    fn parse_integer(&mut self) -> Result<i64> {
        let negative = self.reader.peek()? == Some(MINUS);
        if negative {
            self.reader.discard();
        }

        let mut value: i64 = 0;
        let mut digits = 0usize;
        while let Some(digit) = self.peek_digit()? {
            self.reader.discard();
            let digit = i64::from(digit);
            // Accumulate toward the sign so that i64::MIN is representable.
            value = value
                .checked_mul(10)
                .and_then(|v| {
                    if negative {
                        v.checked_sub(digit)
                    } else {
                        v.checked_add(digit)
                    }
                })
                .ok_or(BencodeError::IntegerOverflow)?;
            digits += 1;
        }

        match self.reader.peek()? {
            Some(END) if digits > 0 => {
                self.reader.discard();
                Ok(value)
            }
            Some(_) if digits == 0 => Err(BencodeError::ExpectedDigit),
            Some(_) => Err(BencodeError::ExpectedEnd),
            None => Err(BencodeError::UnexpectedEof),
        }
    }

    fn parse_length(&mut self) -> Result<usize> {
        let mut len: usize = 0;
        while let Some(digit) = self.peek_digit()? {
            self.reader.discard();
            len = len
                .checked_mul(10)
                .and_then(|l| l.checked_add(usize::from(digit)))
                .ok_or(BencodeError::IntegerOverflow)?;
        }

        match self.reader.peek()? {
            Some(LENGTH_SEPARATOR) => {
                self.reader.discard();
                Ok(len)
            }
            Some(_) => Err(BencodeError::ExpectedColon),
            None => Err(BencodeError::UnexpectedEof),
        }
    }

    fn peek_digit(&mut self) -> Result<Option<u8>> {
        Ok(self
            .reader
            .peek()?
            .filter(u8::is_ascii_digit)
            .map(|b| b - b'0'))
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if self.max_depth.is_some_and(|max| depth > max) {
            return Err(BencodeError::NestingTooDeep);
        }
        Ok(())
    }
}
