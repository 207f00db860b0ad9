//! Wire-format constants.
//!
//! The single-byte delimiters of the Bencode grammar ([BEP-3]), shared by the
//! decoder and the encoder.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

// ============================================================================
// Value prefixes
// ============================================================================

/// Introduces an integer: `i<digits>e`
pub const INTEGER_START: u8 = b'i';

/// Introduces a list: `l<values>e`
pub const LIST_START: u8 = b'l';

/// Introduces a dictionary: `d<key><value>...e`
pub const DICT_START: u8 = b'd';

// ============================================================================
// Delimiters
// ============================================================================

/// Terminates integers, lists and dictionaries
pub const END: u8 = b'e';

/// Separates a byte string's length prefix from its payload
pub const LENGTH_SEPARATOR: u8 = b':';

/// Sign of a negative integer
pub const MINUS: u8 = b'-';

// ============================================================================
// Canned encodings
// ============================================================================

/// Encoding of an empty list
pub const EMPTY_LIST: &[u8] = b"le";

/// Encoding of an empty dictionary
pub const EMPTY_DICT: &[u8] = b"de";
