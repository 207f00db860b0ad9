//! bencodec - Bencode encoding and decoding
//!
//! Bencode is the serialization format used by BitTorrent for `.torrent`
//! files, tracker responses and DHT messages. This crate decodes it into an
//! owning [`Value`] tree, a zero-copy [`ValueView`] tree over the input
//! buffer, or straight from any [`BufRead`](std::io::BufRead) source, and
//! encodes native Rust values without building an intermediate tree.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! Dictionaries keep their keys in source order on decode and are written in
//! the order the caller supplies them on encode. Nothing is sorted
//! implicitly; use a `BTreeMap` or [`Value::sort_keys`] for canonical output.
//!
//! # Examples
//!
//! ## Decoding
//!
//! ```
//! use bencodec::{decode, decode_view};
//!
//! let value = decode(b"d3:foo3:bar4:spaml1:ai1eee").unwrap();
//! assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
//! assert_eq!(value.get(b"spam").and_then(|v| v.as_list()).map(Vec::len), Some(2));
//!
//! // Borrowing decode: strings point into the input.
//! let data = b"l4:spami42ee";
//! let view = decode_view(data).unwrap();
//! assert_eq!(view.as_list().unwrap()[0].as_bytes(), Some(&b"spam"[..]));
//! ```
//!
//! ## Encoding
//!
//! ```
//! use bencodec::{encode, encode_dict, encode_list};
//!
//! assert_eq!(encode(&42).unwrap(), b"i42e");
//! assert_eq!(encode(&("spam", 42)).unwrap(), b"l4:spami42ee");
//!
//! let mut out: Vec<u8> = Vec::new();
//! encode_dict!(&mut out, "cow" => "moo", "spam" => vec!["a", "b"]).unwrap();
//! assert_eq!(out, b"d3:cow3:moo4:spaml1:a1:bee");
//!
//! let mut out: Vec<u8> = Vec::new();
//! encode_list!(&mut out, 1, "foo", 2).unwrap();
//! assert_eq!(out, b"li1e3:fooi2ee");
//! ```
//!
//! # Error Handling
//!
//! Decoding fails on the first malformed token with a [`BencodeError`]:
//!
//! - [`BencodeError::UnexpectedType`] - Byte cannot start a value
//! - [`BencodeError::UnexpectedEof`] - Input ended inside a value
//! - [`BencodeError::ExpectedEnd`] - Integer not terminated by `e`
//! - [`BencodeError::ExpectedColon`] - String length not followed by `:`
//! - [`BencodeError::ExpectedStringToken`] - Dictionary key is not a string
//! - [`BencodeError::DuplicatedKey`] - Key repeated within one dictionary
//! - [`BencodeError::ExpectedDigit`] - Integer with no digits (`ie`, `i-e`)
//! - [`BencodeError::IntegerOverflow`] - Integer outside `i64`, or length outside `usize`
//! - [`BencodeError::NestingTooDeep`] - [`DecodeOptions::max_depth`] exceeded
//!
//! Outside of syntax errors:
//!
//! - [`BencodeError::TypeMismatch`] - `TryFrom` extraction of the wrong kind
//! - [`BencodeError::Io`] - The reader or writer failed

pub mod constants;
mod decode;
mod encode;
mod error;
mod value;

pub use decode::{
    decode, decode_prefix, decode_reader, decode_reader_with, decode_view, decode_view_prefix,
    decode_view_with, decode_with, DecodeOptions,
};
pub use encode::{
    dict_encoder, encode, encode_to, list_encoder, AsString, DictEncoder, Encode, ListEncoder,
    StringLike,
};
pub use error::{BencodeError, Result};
pub use value::{Dict, DictView, Kind, Value, ValueView};
