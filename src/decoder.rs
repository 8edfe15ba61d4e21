//! Decoder Module
//!
//! Recursive descent over ETF tags, producing a `(term, residual bytes)`
//! pair. Grounded on `dec_term`/`erts_decode_ext` from the originating
//! `decoding.rs`, generalized from that crate's EI-format delegation to
//! this codec's own tag dispatch and closed `Term` universe.

use crate::atom::Atom;
use crate::bignum::magnitude_from_le_bytes;
use crate::bridge::{HostBridge, NoBridge};
use crate::compression;
use crate::error::{DecodeError, DecodeFailure};
use crate::reader::ByteReader;
use crate::tags;
use crate::term::{ImproperList, Map, OpaqueObject, Term};
use std::sync::OnceLock;

fn opaque_marker_atom() -> Atom {
    static MARKER: OnceLock<Atom> = OnceLock::new();
    *MARKER.get_or_init(|| {
        Atom::new(tags::OPAQUE_MARKER).expect("opaque marker name is under the 255-byte ceiling")
    })
}

/// Decode the first complete term from `bytes`, returning it alongside the
/// unread tail. Uses the default [`NoBridge`], so every `$erlport.opaque`
/// 3-tuple surfaces as an [`OpaqueObject`].
pub fn decode(bytes: &[u8]) -> Result<(Term, &[u8]), DecodeFailure> {
    decode_with_bridge(bytes, &NoBridge)
}

/// Like [`decode`], but `bridge` gets a chance to deserialize an
/// `$erlport.opaque` 3-tuple whose language tag it owns.
pub fn decode_with_bridge<'a>(
    bytes: &'a [u8],
    bridge: &dyn HostBridge,
) -> Result<(Term, &'a [u8]), DecodeFailure> {
    let mut reader = ByteReader::new(bytes);
    let version = reader.read_u8()?;
    if version != tags::VERSION {
        return Err(DecodeError::InvalidVersion(version).into());
    }
    let term = decode_term_body(&mut reader, bridge)?;
    Ok((term, reader.remaining()))
}

fn decode_term_body(reader: &mut ByteReader, bridge: &dyn HostBridge) -> Result<Term, DecodeFailure> {
    let tag = reader.read_u8()?;
    match tag {
        tags::COMPRESSED => decode_compressed(reader, bridge),
        tags::ATOM => decode_atom(reader),
        tags::SMALL_INTEGER => Ok(Term::int(reader.read_u8()? as i64)),
        tags::INTEGER => Ok(Term::int(reader.read_i32_be()? as i64)),
        tags::SMALL_BIG => decode_big(reader, false),
        tags::LARGE_BIG => decode_big(reader, true),
        tags::FLOAT => decode_float(reader),
        tags::BINARY => decode_binary(reader),
        tags::NIL => Ok(Term::List(Vec::new())),
        tags::STRING => decode_string(reader),
        tags::LIST => decode_list(reader, bridge),
        tags::SMALL_TUPLE => {
            let arity = reader.read_u8()? as usize;
            decode_tuple(reader, bridge, arity)
        }
        tags::LARGE_TUPLE => {
            let arity = reader.read_u32_be()? as usize;
            decode_tuple(reader, bridge, arity)
        }
        tags::MAP => decode_map(reader, bridge),
        other => Err(DecodeError::UnknownTag(other).into()),
    }
}

fn decode_compressed(reader: &mut ByteReader, bridge: &dyn HostBridge) -> Result<Term, DecodeFailure> {
    let uncompressed_len = reader.read_u32_be()?;
    let (inflated, consumed) = compression::inflate_prefix(reader.remaining(), uncompressed_len)?;
    reader.advance(consumed);

    let mut inner = ByteReader::new(&inflated);
    let term = decode_term_body(&mut inner, bridge)?;
    if !inner.remaining().is_empty() {
        return Err(DecodeError::malformed("trailing bytes inside compressed envelope").into());
    }
    Ok(term)
}

fn decode_atom(reader: &mut ByteReader) -> Result<Term, DecodeFailure> {
    let len = reader.read_u16_be()? as usize;
    let name = reader.read_bytes(len)?;
    let atom = Atom::new(name).map_err(|_| DecodeError::malformed("atom name exceeds 255 bytes"))?;
    Ok(Term::Atom(atom))
}

fn decode_big(reader: &mut ByteReader, large: bool) -> Result<Term, DecodeFailure> {
    let arity = if large {
        reader.read_u32_be()? as usize
    } else {
        reader.read_u8()? as usize
    };
    let sign = reader.read_u8()?;
    let magnitude_bytes = reader.read_bytes(arity)?;
    let magnitude = magnitude_from_le_bytes(magnitude_bytes);
    let value = if sign == 0 { magnitude } else { -magnitude };
    Ok(Term::Integer(value))
}

fn decode_float(reader: &mut ByteReader) -> Result<Term, DecodeFailure> {
    let bits = reader.read_u64_be()?;
    Ok(Term::Float(f64::from_bits(bits)))
}

fn decode_binary(reader: &mut ByteReader) -> Result<Term, DecodeFailure> {
    let len = reader.read_u32_be()? as usize;
    let bytes = reader.read_bytes(len)?;
    Ok(Term::ByteString(bytes.to_vec()))
}

fn decode_string(reader: &mut ByteReader) -> Result<Term, DecodeFailure> {
    let len = reader.read_u16_be()? as usize;
    let bytes = reader.read_bytes(len)?;
    Ok(Term::List(bytes.iter().map(|&b| Term::int(b as i64)).collect()))
}

fn decode_list(reader: &mut ByteReader, bridge: &dyn HostBridge) -> Result<Term, DecodeFailure> {
    let len = reader.read_u32_be()? as usize;
    let mut elements = Vec::with_capacity(len.min(1 << 20));
    for _ in 0..len {
        elements.push(decode_term_body(reader, bridge)?);
    }
    let tail = decode_term_body(reader, bridge)?;
    let tail_is_nil = matches!(&tail, Term::List(v) if v.is_empty());

    if elements.is_empty() {
        if tail_is_nil {
            Ok(Term::List(Vec::new()))
        } else {
            // Reject a zero-length `l` whose tail is not `j` as malformed
            // rather than guessing at an ImproperList with no head
            // elements.
            Err(DecodeError::malformed("zero-length list tag with a non-nil tail").into())
        }
    } else if tail_is_nil {
        Ok(Term::List(elements))
    } else {
        Ok(Term::ImproperList(ImproperList::new_unchecked(elements, tail)))
    }
}

fn decode_tuple(reader: &mut ByteReader, bridge: &dyn HostBridge, arity: usize) -> Result<Term, DecodeFailure> {
    let mut elements = Vec::with_capacity(arity.min(1 << 20));
    for _ in 0..arity {
        elements.push(decode_term_body(reader, bridge)?);
    }
    Ok(reinterpret_if_opaque(elements, bridge))
}

fn decode_map(reader: &mut ByteReader, bridge: &dyn HostBridge) -> Result<Term, DecodeFailure> {
    let arity = reader.read_u32_be()? as usize;
    let mut pairs = Vec::with_capacity(arity.min(1 << 20));
    for _ in 0..arity {
        let key = decode_term_body(reader, bridge)?;
        let value = decode_term_body(reader, bridge)?;
        pairs.push((key, value));
    }
    Ok(Term::Map(Map::new(pairs)))
}

/// Check an arity-3 tuple against the opaque shape and rewrite it per
/// `bridge`, applied uniformly regardless of whether a canonical `h` or a
/// non-canonical `i` tag produced the tuple.
fn reinterpret_if_opaque(elements: Vec<Term>, bridge: &dyn HostBridge) -> Term {
    if let [Term::Atom(marker), Term::Atom(language), Term::ByteString(data)] = elements.as_slice() {
        if *marker == opaque_marker_atom() {
            let language = *language;
            if bridge.owns(language) {
                if let Ok(term) = bridge.deserialize(data) {
                    return term;
                }
            }
            return Term::OpaqueObject(OpaqueObject::new(data.clone(), language));
        }
    }
    Term::Tuple(elements)
}
