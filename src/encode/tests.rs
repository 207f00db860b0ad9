use std::collections::{BTreeMap, VecDeque};
use std::io;

use bytes::Bytes;
use indexmap::IndexMap;

use super::*;
use crate::decode::{decode, decode_view};
use crate::value::Dict;
use crate::constants::{EMPTY_DICT, EMPTY_LIST};
use crate::{encode_dict, encode_list, BencodeError};

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&666).unwrap(), b"i666e");
    assert_eq!(encode(&-666i64).unwrap(), b"i-666e");
    assert_eq!(encode(&0u8).unwrap(), b"i0e");
    assert_eq!(encode(&i64::MIN).unwrap(), b"i-9223372036854775808e");
}

#[test]
fn test_encode_unsigned_beyond_decoder_range() {
    let encoded = encode(&u64::MAX).unwrap();
    assert_eq!(encoded, b"i18446744073709551615e");
    // Written in full, but the decoder's integers are i64.
    assert!(matches!(decode(&encoded), Err(BencodeError::IntegerOverflow)));

    let largest = encode(&(i64::MAX as u64)).unwrap();
    assert_eq!(decode(&largest).unwrap(), Value::Integer(i64::MAX));
}

#[test]
fn test_encode_bool() {
    assert_eq!(encode(&true).unwrap(), b"i1e");
    assert_eq!(encode(&false).unwrap(), b"i0e");
}

#[test]
fn test_encode_string() {
    assert_eq!(encode("foo").unwrap(), b"3:foo");
    assert_eq!(encode(&String::from("foo")).unwrap(), b"3:foo");
    assert_eq!(encode(&Bytes::from_static(b"spam")).unwrap(), b"4:spam");
    assert_eq!(encode(&Cow::Borrowed("cow")).unwrap(), b"3:cow");
    assert_eq!(encode("").unwrap(), b"0:");
    assert_eq!(encode(&AsString(b"\xff\x00")).unwrap(), b"2:\xff\x00");
}

#[test]
fn test_encode_utf8_length_is_in_bytes() {
    assert_eq!(encode("é").unwrap(), "2:é".as_bytes());
}

#[test]
fn test_encode_list() {
    let empty: Vec<i32> = Vec::new();
    assert_eq!(encode(&empty).unwrap(), EMPTY_LIST);

    let mut out: Vec<u8> = Vec::new();
    encode_list!(&mut out).unwrap();
    assert_eq!(out, EMPTY_LIST);

    let mut out: Vec<u8> = Vec::new();
    encode_list!(&mut out, 1, "foo", 2).unwrap();
    assert_eq!(out, b"li1e3:fooi2ee");
}

#[test]
fn test_encode_dict() {
    let mut out: Vec<u8> = Vec::new();
    encode_dict!(&mut out).unwrap();
    assert_eq!(out, EMPTY_DICT);
    assert_eq!(encode(&Value::dict()).unwrap(), EMPTY_DICT);

    let mut out: Vec<u8> = Vec::new();
    encode_dict!(&mut out, "first" => 1, "second" => "foo", "third" => 2).unwrap();
    assert_eq!(out, b"d5:firsti1e6:second3:foo5:thirdi2ee");
}

#[test]
fn test_encode_dict_keeps_call_order() {
    let mut out: Vec<u8> = Vec::new();
    encode_dict!(&mut out, "zeta" => 1, "alpha" => 2).unwrap();
    assert_eq!(out, b"d4:zetai1e5:alphai2ee");
}

#[test]
fn test_list_encoder() {
    let mut out: Vec<u8> = Vec::new();
    list_encoder(&mut out)
        .unwrap()
        .add(&1)
        .unwrap()
        .add("foo")
        .unwrap()
        .add(&2)
        .unwrap()
        .end()
        .unwrap();
    assert_eq!(out, b"li1e3:fooi2ee");
}

#[test]
fn test_dict_encoder() {
    let mut out: Vec<u8> = Vec::new();
    dict_encoder(&mut out)
        .and_then(|e| e.add("first", &1))
        .and_then(|e| e.add("second", "foo"))
        .and_then(|e| e.add("third", &2))
        .and_then(|e| e.end())
        .unwrap();
    assert_eq!(out, b"d5:firsti1e6:second3:foo5:thirdi2ee");
}

#[test]
fn test_builders_match_one_shot() {
    let mut streamed: Vec<u8> = Vec::new();
    list_encoder(&mut streamed)
        .and_then(|e| e.add(&vec![1, 2]))
        .and_then(|e| e.add(&Value::string("x")))
        .and_then(|e| e.end())
        .unwrap();

    let mut one_shot: Vec<u8> = Vec::new();
    encode_list!(&mut one_shot, vec![1, 2], Value::string("x")).unwrap();

    assert_eq!(streamed, one_shot);
    assert_eq!(streamed, encode(&(vec![1, 2], "x")).unwrap());
}

#[test]
fn test_builders_nest_and_accept_raw_fragments() {
    let inner = encode(&vec!["a", "b"]).unwrap();

    let mut out: Vec<u8> = Vec::new();
    dict_encoder(&mut out)
        .and_then(|e| e.add_raw("list", &inner))
        .and_then(|e| e.add(b"raw".as_slice(), &AsString("v")))
        .and_then(|e| e.end())
        .unwrap();
    assert_eq!(out, b"d4:listl1:a1:be3:raw1:ve");

    let mut out: Vec<u8> = Vec::new();
    list_encoder(&mut out)
        .and_then(|e| e.add_raw(b"i7e"))
        .and_then(|e| e.end())
        .unwrap();
    assert_eq!(decode(&out).unwrap(), Value::List(vec![Value::Integer(7)]));
}

#[test]
fn test_builder_writes_eagerly() {
    let mut out: Vec<u8> = Vec::new();
    let encoder = list_encoder(&mut out).unwrap().add(&1).unwrap();
    // Unterminated on purpose: nothing is added on drop.
    drop(encoder);
    assert_eq!(out, b"li1e");
}

#[test]
fn test_encode_any_value() {
    assert_eq!(encode(&Value::Integer(666)).unwrap(), b"i666e");
    assert_eq!(encode(&Value::string("foo")).unwrap(), b"3:foo");

    let list = Value::List(vec![
        Value::Integer(1),
        Value::string("foo"),
        Value::Integer(2),
    ]);
    assert_eq!(encode(&list).unwrap(), b"li1e3:fooi2ee");

    let mut dict = Dict::new();
    dict.insert(Bytes::from_static(b"a"), Value::Integer(1));
    dict.insert(Bytes::from_static(b"b"), Value::string("foo"));
    dict.insert(Bytes::from_static(b"c"), Value::Integer(2));
    assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d1:ai1e1:b3:foo1:ci2ee");
}

#[test]
fn test_encode_value_preserves_insertion_order() {
    let mut dict = Dict::new();
    dict.insert(Bytes::from_static(b"second"), Value::Integer(2));
    dict.insert(Bytes::from_static(b"first"), Value::Integer(1));
    assert_eq!(
        encode(&Value::Dict(dict)).unwrap(),
        b"d6:secondi2e5:firsti1ee"
    );
}

#[test]
fn test_encode_view() {
    let data = b"d4:spaml1:ai1ee3:cow3:mooe";
    let view = decode_view(data).unwrap();
    assert_eq!(encode(&view).unwrap(), data);
}

#[test]
fn test_encode_vectors() {
    assert_eq!(encode(&vec![1, 2, 3]).unwrap(), b"li1ei2ei3ee");
    assert_eq!(
        encode(&vec!["cat", "dog", "goat"]).unwrap(),
        b"l3:cat3:dog4:goate"
    );
    assert_eq!(
        encode(&vec![vec![1], vec![1, 2], vec![1, 2, 3]]).unwrap(),
        b"lli1eeli1ei2eeli1ei2ei3eee"
    );
    assert_eq!(encode(&[1, 2]).unwrap(), b"li1ei2ee");
    assert_eq!(encode(&[10u16, 20][..]).unwrap(), b"li10ei20ee");
    assert_eq!(
        encode(&VecDeque::from(vec![String::from("x")])).unwrap(),
        b"l1:xe"
    );
}

#[test]
fn test_encode_tuples() {
    assert_eq!(encode(&(1,)).unwrap(), b"li1ee");
    assert_eq!(
        encode(&(1, "two", vec![3], true)).unwrap(),
        b"li1e3:twoli3eei1ee"
    );
}

#[test]
fn test_encode_maps() {
    let m: BTreeMap<String, i32> = [("a", 1), ("b", 2), ("c", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(encode(&m).unwrap(), b"d1:ai1e1:bi2e1:ci3ee");

    let m: BTreeMap<&str, &str> = [("a", "cat"), ("b", "dog"), ("c", "goat")].into();
    assert_eq!(encode(&m).unwrap(), b"d1:a3:cat1:b3:dog1:c4:goate");

    let mut m: BTreeMap<&str, BTreeMap<&str, i32>> = BTreeMap::new();
    m.insert("a", [("a", 1)].into());
    m.insert("b", [("a", 1), ("b", 2)].into());
    m.insert("c", [("a", 1), ("b", 2), ("c", 3)].into());
    assert_eq!(
        encode(&m).unwrap(),
        b"d1:ad1:ai1ee1:bd1:ai1e1:bi2ee1:cd1:ai1e1:bi2e1:ci3eee"
    );
}

#[test]
fn test_encode_index_map_in_insertion_order() {
    let mut m: IndexMap<Vec<u8>, &str> = IndexMap::new();
    m.insert(b"z".to_vec(), "last");
    m.insert(b"a".to_vec(), "first");
    assert_eq!(encode(&m).unwrap(), b"d1:z4:last1:a5:firste");
}

#[test]
fn test_encode_to_writer() {
    let mut out = io::Cursor::new(Vec::new());
    encode_to(&mut out, &(1, "a")).unwrap();
    encode_to(&mut out, "b").unwrap();
    assert_eq!(out.into_inner(), b"li1e1:ae1:b");
}

#[test]
fn test_encode_to_dyn_writer() {
    let mut buf: Vec<u8> = Vec::new();
    let out: &mut dyn io::Write = &mut buf;
    encode_to(out, &vec![1]).unwrap();
    assert_eq!(buf, b"li1ee");
}

#[test]
fn test_encode_is_idempotent() {
    let value = decode(b"d1:bi2e1:ali1e1:xee").unwrap();
    let before = value.clone();
    let first = encode(&value).unwrap();
    let second = encode(&value).unwrap();
    assert_eq!(first, second);
    assert_eq!(value, before);
    assert_eq!(first, b"d1:bi2e1:ali1e1:xee");
}

struct FailingWriter;

impl io::Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_writer_errors_propagate() {
    let err = encode_to(&mut FailingWriter, &vec![1, 2]).unwrap_err();
    assert!(matches!(err, BencodeError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    assert!(!err.is_syntax());

    assert!(list_encoder(&mut FailingWriter).is_err());
}
