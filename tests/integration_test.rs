//! Integration tests for the ETF codec.
//!
//! Exercises the public `encode`/`decode` surface end to end: wire-format
//! scenarios lifted from the originating design's test corpus, plus the
//! round-trip and tail-preservation properties it requires of every term.

use erl_external_format::{
    decode, decode_with_bridge, encode, encode_term, Atom, Compression, DecodeError, DecodeFailure,
    HostBridge, ImproperList, Map, MutationError, OpaqueObject, Term,
};

fn atom(name: &str) -> Atom {
    Atom::new(name.as_bytes()).unwrap()
}

#[test]
fn decode_atom_scenario() {
    let (term, tail) = decode(b"\x83d\x00\x04test").unwrap();
    assert_eq!(term, Term::Atom(atom("test")));
    assert_eq!(tail, b"");
}

#[test]
fn decode_undefined_atom_with_tail() {
    let (term, tail) = decode(b"\x83d\x00\x09undefinedtail").unwrap();
    assert_eq!(term, Term::Atom(atom("undefined")));
    assert_eq!(tail, b"tail");
}

#[test]
fn encode_arity_one_tuple_of_empty_binary() {
    let term = Term::Tuple(vec![Term::ByteString(vec![])]);
    let bytes = encode(&term, Compression::Off).unwrap();
    assert_eq!(bytes, b"\x83h\x01m\x00\x00\x00\x00");
}

#[test]
fn encode_arity_256_tuple_uses_large_tuple_tag() {
    let term = Term::Tuple(vec![Term::Tuple(vec![]); 256]);
    let bytes = encode(&term, Compression::Off).unwrap();
    assert_eq!(&bytes[..6], b"\x83i\x00\x00\x01\x00");
    assert_eq!(&bytes[6..8], b"h\x00");
    assert_eq!(&bytes[bytes.len() - 2..], b"h\x00");
}

#[test]
fn encode_compressed_list_of_empty_lists() {
    let term = Term::List(vec![Term::List(vec![]); 15]);
    let bytes = encode(&term, Compression::from(true)).unwrap();
    assert_eq!(&bytes[..2], b"\x83P");
    assert_eq!(&bytes[2..6], &0x15u32.to_be_bytes());

    let (decoded, tail) = decode(&bytes).unwrap();
    assert_eq!(decoded, term);
    assert!(tail.is_empty());
}

/// Bit-exact wire vector: a peer Erlang node's `zlib:uncompress/1` expects
/// the zlib header/Adler-32 this produces, not raw DEFLATE, and the
/// originating corpus pins this exact byte sequence for level 6.
#[test]
fn encode_compressed_matches_known_zlib_bytes() {
    let term = Term::List(vec![Term::List(vec![]); 15]);

    let level6 = encode(&term, Compression::DEFAULT).unwrap();
    assert_eq!(
        level6,
        b"\x83P\x00\x00\x00\x15x\x9c\xcba``\xe0\xcfB\x03\x00B@\x07\x1c"
    );

    let level9 = encode(&term, Compression::Level(9)).unwrap();
    assert_eq!(
        level9,
        b"\x83P\x00\x00\x00\x15x\xda\xcba``\xe0\xcfB\x03\x00B@\x07\x1c"
    );

    let level1 = encode(&term, Compression::Level(1)).unwrap();
    assert_eq!(
        level1,
        b"\x83P\x00\x00\x00\x15x\x01\xcba``\xe0\xcfB\x03\x00B@\x07\x1c"
    );
}

/// `\x78\xda...` vector lifted from the originating corpus's
/// `test_decode_compressed_term`: a zlib stream decompressing to 20 copies
/// of the small integer `100`.
#[test]
fn decode_known_peer_zlib_stream() {
    let bytes: &[u8] = b"\x83P\x00\x00\x00\x17\x78\xda\xcb\x66\x10\x49\xc1\x02\x00\x5d\x60\x08\x50";
    let (term, tail) = decode(bytes).unwrap();
    assert_eq!(term, Term::List(vec![Term::int(100); 20]));
    assert!(tail.is_empty());
}

#[test]
fn decode_known_peer_zlib_stream_with_tail() {
    let bytes: &[u8] =
        b"\x83P\x00\x00\x00\x17\x78\xda\xcb\x66\x10\x49\xc1\x02\x00\x5d\x60\x08\x50tail";
    let (term, tail) = decode(bytes).unwrap();
    assert_eq!(term, Term::List(vec![Term::int(100); 20]));
    assert_eq!(tail, b"tail");
}

#[test]
fn decode_rejects_mismatched_declared_length() {
    let bytes: &[u8] = b"\x83P\x00\x00\x00\x16\x78\xda\xcb\x66\x10\x49\xc1\x02\x00\x5d\x60\x08\x50";
    assert!(matches!(
        decode(bytes).unwrap_err(),
        DecodeFailure::Malformed(DecodeError::LengthMismatch { .. })
    ));
}

#[test]
fn encode_opaque_erlang_language_is_verbatim() {
    let object = OpaqueObject::new(b"data".to_vec(), atom("erlang"));
    let full = encode(&Term::OpaqueObject(object.clone()), Compression::Off).unwrap();
    assert_eq!(full, b"\x83data");

    let body_only = encode_term(&Term::OpaqueObject(object)).unwrap();
    assert_eq!(body_only, b"data");
}

#[test]
fn decode_opaque_marker_tuple() {
    let data = b"\x83h\x03d\x00\x0f$erlport.opaqued\x00\x08languagem\x00\x00\x00\x04data";
    let (term, tail) = decode(data).unwrap();
    assert!(tail.is_empty());
    match term {
        Term::OpaqueObject(object) => {
            assert_eq!(object.data(), b"data");
            assert_eq!(object.language(), atom("language"));
        }
        other => panic!("expected OpaqueObject, got {other:?}"),
    }
}

#[test]
fn empty_input_is_incomplete_not_malformed() {
    assert!(matches!(decode(b"").unwrap_err(), DecodeFailure::Incomplete(_)));
    assert!(matches!(decode(b"\x83").unwrap_err(), DecodeFailure::Incomplete(_)));
}

#[test]
fn unknown_tag_is_malformed_not_incomplete() {
    assert!(matches!(
        decode(b"\x83z").unwrap_err(),
        DecodeFailure::Malformed(DecodeError::UnknownTag(b'z'))
    ));
}

#[test]
fn round_trip_every_constructible_term() {
    let improper = ImproperList::new(vec![Term::int(0)], Term::int(1)).unwrap();
    let map = Map::new(vec![(Term::ByteString(b"k".to_vec()), Term::int(7))]);
    let terms = vec![
        Term::int(0),
        Term::int(255),
        Term::int(256),
        Term::int(-1),
        Term::int(1 << 31),
        Term::Float(3.5),
        Term::Atom(atom("ok")),
        Term::ByteString(b"hello".to_vec()),
        Term::List(vec![]),
        Term::List(vec![Term::int(1), Term::int(2), Term::int(3)]),
        Term::List(vec![Term::int(1000)]),
        Term::ImproperList(improper),
        Term::Map(map),
        Term::Tuple(vec![Term::int(1), Term::int(2)]),
        Term::OpaqueObject(OpaqueObject::new(b"payload".to_vec(), atom("python"))),
    ];

    for term in terms {
        let encoded = encode(&term, Compression::Off).unwrap();
        let (decoded, tail) = decode(&encoded).unwrap();
        assert_eq!(decoded, term, "round-trip mismatch for {term:?}");
        assert!(tail.is_empty());
    }
}

#[test]
fn tail_preservation_holds_for_arbitrary_suffix() {
    let term = Term::Tuple(vec![Term::Atom(atom("ping")), Term::int(42)]);
    for suffix in [&b""[..], b"x", b"\x00\x01\x02", b"more data after the term"] {
        let mut bytes = encode(&term, Compression::Off).unwrap();
        bytes.extend_from_slice(suffix);
        let (decoded, tail) = decode(&bytes).unwrap();
        assert_eq!(decoded, term);
        assert_eq!(tail, suffix);
    }
}

#[test]
fn map_is_hashable_as_a_map_key() {
    let inner = Map::new(vec![]);
    let outer = Map::new(vec![(Term::Map(inner.clone()), Term::Map(inner))]);
    let bytes = encode(&Term::Map(outer), Compression::Off).unwrap();
    assert_eq!(
        bytes,
        b"\x83t\x00\x00\x00\x01t\x00\x00\x00\x00t\x00\x00\x00\x00"
    );
}

#[test]
fn map_and_improper_list_reject_mutation() {
    let map = Map::new(vec![(Term::int(1), Term::int(2))]);
    assert_eq!(map.insert(Term::int(3), Term::int(4)), Err(MutationError));
    assert_eq!(map.remove(&Term::int(1)), Err(MutationError));
    assert_eq!(map.clear(), Err(MutationError));

    let improper = ImproperList::new(vec![Term::int(0)], Term::int(1)).unwrap();
    assert_eq!(improper.push(Term::int(9)), Err(MutationError));
    assert_eq!(improper.set_tail(Term::int(9)), Err(MutationError));
}

#[test]
fn improper_list_construction_rejects_bad_shapes() {
    assert!(ImproperList::new(vec![], Term::int(1)).is_err());
    assert!(ImproperList::new(vec![Term::int(0)], Term::List(vec![])).is_err());
}

#[test]
fn atom_length_boundary() {
    assert!(Atom::new(&vec![b'X'; 255]).is_ok());
    assert!(Atom::new(&vec![b'X'; 256]).is_err());
}

struct PythonBridge;

impl HostBridge for PythonBridge {
    fn owns(&self, language: Atom) -> bool {
        language == atom("python")
    }

    fn deserialize(&self, data: &[u8]) -> Result<Term, ()> {
        Ok(Term::ByteString(data.to_vec()))
    }
}

#[test]
fn custom_host_bridge_deserializes_owned_language() {
    let object = OpaqueObject::new(b"42".to_vec(), atom("python"));
    let encoded = encode_term(&Term::OpaqueObject(object)).unwrap();
    let mut full = vec![0x83];
    full.extend_from_slice(&encoded);

    let (term, _) = decode_with_bridge(&full, &PythonBridge).unwrap();
    assert_eq!(term, Term::ByteString(b"42".to_vec()));
}

#[test]
fn custom_host_bridge_ignores_foreign_languages() {
    let object = OpaqueObject::new(b"42".to_vec(), atom("ruby"));
    let encoded = encode_term(&Term::OpaqueObject(object)).unwrap();
    let mut full = vec![0x83];
    full.extend_from_slice(&encoded);

    let (term, _) = decode_with_bridge(&full, &PythonBridge).unwrap();
    match term {
        Term::OpaqueObject(object) => assert_eq!(object.language(), atom("ruby")),
        other => panic!("expected OpaqueObject passthrough, got {other:?}"),
    }
}

#[test]
fn compression_level_zero_is_uncompressed() {
    let term = Term::List(vec![Term::List(vec![]); 15]);
    let bytes = encode(&term, Compression::Level(0)).unwrap();
    let mut expected = vec![0x83, b'l', 0, 0, 0, 15];
    expected.extend(std::iter::repeat(b'j').take(16));
    assert_eq!(bytes, expected);
}

#[test]
fn compression_levels_one_and_nine_differ() {
    let term = Term::ByteString(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec());
    let level1 = encode(&term, Compression::Level(1)).unwrap();
    let level9 = encode(&term, Compression::Level(9)).unwrap();
    assert_ne!(level1, level9);

    let (decoded1, _) = decode(&level1).unwrap();
    let (decoded9, _) = decode(&level9).unwrap();
    assert_eq!(decoded1, term);
    assert_eq!(decoded9, term);
}

#[test]
fn text_string_round_trips_as_a_list_of_integers() {
    let encoded = encode(&Term::TextString("hi".to_string()), Compression::Off).unwrap();
    let (decoded, _) = decode(&encoded).unwrap();
    assert_eq!(decoded, Term::List(vec![Term::int(b'h' as i64), Term::int(b'i' as i64)]));
}

#[test]
fn wide_text_string_forces_generic_list_form() {
    let encoded = encode(&Term::TextString("\u{100}".to_string()), Compression::Off).unwrap();
    assert_eq!(encoded, b"\x83l\x00\x00\x00\x01b\x00\x00\x01\x00j");
}
