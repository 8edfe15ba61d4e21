//! Encoder Module
//!
//! Walks a `Term` and appends ETF bytes to an output buffer, applying the
//! canonical-tag selection rules for choosing the narrowest legal wire form.
//! Grounded on `enc_term`/`enc_term_int` from the originating `encoding.rs`,
//! generalized from that crate's BEAM-internal term set and EI-format
//! delegation to this codec's own closed `Term` universe and its own
//! tag-selection logic.

use std::sync::OnceLock;

use malachite::Integer;

use crate::atom::Atom;
use crate::bignum::{abs_and_sign, magnitude_to_le_bytes, to_i64};
use crate::compression::{self, Compression};
use crate::error::EncodeError;
use crate::tags;
use crate::term::{Map, Term};

fn erlang_atom() -> Atom {
    static ERLANG: OnceLock<Atom> = OnceLock::new();
    *ERLANG.get_or_init(|| Atom::new(b"erlang").expect("\"erlang\" is a valid atom name"))
}

fn opaque_marker_atom() -> Atom {
    static MARKER: OnceLock<Atom> = OnceLock::new();
    *MARKER.get_or_init(|| {
        Atom::new(tags::OPAQUE_MARKER).expect("opaque marker name is under the 255-byte ceiling")
    })
}

/// Emit `0x83` followed by `term`'s body, optionally wrapped in the `P`
/// compression envelope.
pub fn encode(term: &Term, compression: Compression) -> Result<Vec<u8>, EncodeError> {
    let body = encode_term(term)?;
    let mut out = Vec::with_capacity(body.len() + 6);
    out.push(tags::VERSION);
    match compression {
        Compression::Off => out.extend_from_slice(&body),
        Compression::Level(0) => out.extend_from_slice(&body),
        Compression::Level(level) => {
            let compressed = compression::deflate(&body, level);
            out.push(tags::COMPRESSED);
            out.extend_from_slice(&(body.len() as u32).to_be_bytes());
            out.extend_from_slice(&compressed);
        }
    }
    Ok(out)
}

/// Emit `term`'s body without the leading version byte. Used internally by
/// [`encode`] and exposed so `OpaqueObject`-style embedding can be built on
/// top of it.
pub fn encode_term(term: &Term) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_into(&mut buf, term)?;
    Ok(buf)
}

fn encode_into(buf: &mut Vec<u8>, term: &Term) -> Result<(), EncodeError> {
    match term {
        Term::Integer(value) => encode_integer(buf, value),
        Term::Float(value) => encode_float(buf, *value),
        Term::Atom(atom) => encode_atom(buf, *atom),
        Term::ByteString(bytes) => encode_binary(buf, bytes)?,
        Term::List(elements) => encode_list(buf, elements)?,
        Term::ImproperList(improper) => encode_improper_list(buf, improper)?,
        Term::Map(map) => encode_map(buf, map)?,
        Term::Tuple(elements) => encode_tuple(buf, elements)?,
        Term::OpaqueObject(object) => encode_opaque(buf, object)?,
        Term::TextString(text) => encode_text(buf, text)?,
    }
    Ok(())
}

/// Downcast a host length to the wire format's 32-bit length field, failing
/// rather than silently truncating when a collection outgrows what ETF can
/// address.
fn wire_len(len: usize) -> Result<u32, EncodeError> {
    u32::try_from(len).map_err(|_| {
        EncodeError::unrepresentable(format!("length {len} exceeds the 32-bit ETF length field"))
    })
}

fn encode_integer(buf: &mut Vec<u8>, value: &Integer) {
    if let Some(small) = to_i64(value) {
        if (0..=255).contains(&small) {
            buf.push(tags::SMALL_INTEGER);
            buf.push(small as u8);
            return;
        }
        if (i32::MIN as i64..=i32::MAX as i64).contains(&small) {
            buf.push(tags::INTEGER);
            buf.extend_from_slice(&(small as i32).to_be_bytes());
            return;
        }
    }

    let (magnitude, negative) = abs_and_sign(value);
    let mag_bytes = magnitude_to_le_bytes(&magnitude);
    let sign = u8::from(negative);
    if mag_bytes.len() <= 255 {
        buf.push(tags::SMALL_BIG);
        buf.push(mag_bytes.len() as u8);
        buf.push(sign);
        buf.extend_from_slice(&mag_bytes);
    } else {
        buf.push(tags::LARGE_BIG);
        buf.extend_from_slice(&(mag_bytes.len() as u32).to_be_bytes());
        buf.push(sign);
        buf.extend_from_slice(&mag_bytes);
    }
}

fn encode_float(buf: &mut Vec<u8>, value: f64) {
    buf.push(tags::FLOAT);
    buf.extend_from_slice(&value.to_be_bytes());
}

fn encode_atom(buf: &mut Vec<u8>, atom: Atom) {
    encode_atom_name(buf, &atom.name());
}

fn encode_atom_name(buf: &mut Vec<u8>, name: &[u8]) {
    buf.push(tags::ATOM);
    buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
    buf.extend_from_slice(name);
}

fn encode_binary(buf: &mut Vec<u8>, bytes: &[u8]) -> Result<(), EncodeError> {
    buf.push(tags::BINARY);
    buf.extend_from_slice(&wire_len(bytes.len())?.to_be_bytes());
    buf.extend_from_slice(bytes);
    Ok(())
}

fn byte_value(term: &Term) -> Option<u8> {
    match term {
        Term::Integer(value) => to_i64(value).and_then(|v| u8::try_from(v).ok()),
        _ => None,
    }
}

fn encode_list(buf: &mut Vec<u8>, elements: &[Term]) -> Result<(), EncodeError> {
    if elements.is_empty() {
        buf.push(tags::NIL);
        return Ok(());
    }
    if elements.len() <= 0xFFFF && elements.iter().all(|e| byte_value(e).is_some()) {
        buf.push(tags::STRING);
        buf.extend_from_slice(&(elements.len() as u16).to_be_bytes());
        for element in elements {
            buf.push(byte_value(element).expect("checked above"));
        }
        return Ok(());
    }
    buf.push(tags::LIST);
    buf.extend_from_slice(&wire_len(elements.len())?.to_be_bytes());
    for element in elements {
        encode_into(buf, element)?;
    }
    buf.push(tags::NIL);
    Ok(())
}

fn encode_improper_list(
    buf: &mut Vec<u8>,
    improper: &crate::term::ImproperList,
) -> Result<(), EncodeError> {
    buf.push(tags::LIST);
    buf.extend_from_slice(&wire_len(improper.elements().len())?.to_be_bytes());
    for element in improper.elements() {
        encode_into(buf, element)?;
    }
    encode_into(buf, improper.tail())
}

fn encode_tuple(buf: &mut Vec<u8>, elements: &[Term]) -> Result<(), EncodeError> {
    if elements.len() <= 255 {
        buf.push(tags::SMALL_TUPLE);
        buf.push(elements.len() as u8);
    } else {
        buf.push(tags::LARGE_TUPLE);
        buf.extend_from_slice(&wire_len(elements.len())?.to_be_bytes());
    }
    for element in elements {
        encode_into(buf, element)?;
    }
    Ok(())
}

fn encode_map(buf: &mut Vec<u8>, map: &Map) -> Result<(), EncodeError> {
    buf.push(tags::MAP);
    buf.extend_from_slice(&wire_len(map.len())?.to_be_bytes());
    for (key, value) in map.iter() {
        encode_into(buf, key)?;
        encode_into(buf, value)?;
    }
    Ok(())
}

fn encode_opaque(buf: &mut Vec<u8>, object: &crate::term::OpaqueObject) -> Result<(), EncodeError> {
    if object.language() == erlang_atom() {
        buf.extend_from_slice(object.data());
        return Ok(());
    }
    buf.push(tags::SMALL_TUPLE);
    buf.push(3);
    encode_atom(buf, opaque_marker_atom());
    encode_atom(buf, object.language());
    encode_binary(buf, object.data())
}

fn encode_text(buf: &mut Vec<u8>, text: &str) -> Result<(), EncodeError> {
    if text.is_empty() {
        buf.push(tags::NIL);
        return Ok(());
    }
    let code_points: Vec<u32> = text.chars().map(|c| c as u32).collect();
    if code_points.len() <= 0xFFFF && code_points.iter().all(|&cp| cp <= 0xFF) {
        buf.push(tags::STRING);
        buf.extend_from_slice(&(code_points.len() as u16).to_be_bytes());
        buf.extend(code_points.iter().map(|&cp| cp as u8));
        return Ok(());
    }
    buf.push(tags::LIST);
    buf.extend_from_slice(&wire_len(code_points.len())?.to_be_bytes());
    for cp in code_points {
        encode_integer(buf, &Integer::from(cp));
    }
    buf.push(tags::NIL);
    Ok(())
}
