//! Erlang External Term Format (ETF) Codec
//!
//! Provides the bidirectional mapping between a typed in-memory term
//! universe and the ETF byte stream used by a host-language bridge to an
//! Erlang VM: `erlang:term_to_binary/1` and `erlang:binary_to_term/1` wire
//! format, as seen on node distribution and in NIF/port argument passing.
//!
//! ## Overview
//!
//! This crate is grounded on `infrastructure_external_format`, the
//! corresponding piece of infrastructure in a from-scratch Rust conversion
//! of the Erlang/OTP runtime, generalized from that crate's
//! BEAM-internal term set (pids, ports, references, funs, an atom table
//! shared with a live emulator) down to the closed surface a host-language
//! bridge actually exchanges with a peer node: integers, floats, atoms,
//! binaries, lists (proper and improper), tuples, maps, and the
//! `$erlport.opaque` escape hatch for values neither side can otherwise
//! express.
//!
//! ## Modules
//!
//! - [`term`] — the term universe (`Term`, `ImproperList`, `Map`,
//!   `OpaqueObject`).
//! - [`atom`] — the process-wide atom interning table.
//! - [`reader`] — a sized-read cursor distinguishing incomplete input from
//!   malformed input.
//! - [`decoder`] — recursive-descent ETF decoding.
//! - [`encoder`] — canonical-form ETF encoding.
//! - [`compression`] — the `P`-tag deflate envelope.
//! - [`bignum`] — arbitrary-precision integer wire conversion.
//! - [`bridge`] — the host-opaque decode extension point.
//! - [`error`] — the four-way error taxonomy (incomplete / malformed /
//!   construction / mutation).
//!
//! ## Architecture
//!
//! No I/O of any kind happens in this crate: `encode`/`decode` operate on
//! in-memory byte buffers the caller owns, and the sole shared mutable
//! state is the process-wide atom registry. Transport framing, RPC
//! dispatch, and process-spawn glue belong to a caller embedding this
//! codec, not to the codec itself.

pub mod atom;
pub mod bignum;
pub mod bridge;
pub mod compression;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod reader;
pub mod tags;
pub mod term;

pub use atom::Atom;
pub use bridge::{HostBridge, NoBridge};
pub use compression::Compression;
pub use decoder::{decode, decode_with_bridge};
pub use encoder::{encode, encode_term};
pub use error::{ConstructError, DecodeError, DecodeFailure, EncodeError, IncompleteData, MutationError};
pub use term::{ImproperList, Map, OpaqueObject, Term};

/// ETF version magic byte: the first byte of every top-level encoded term.
pub const VERSION_MAGIC: u8 = tags::VERSION;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_term_and_tail() {
        let term = Term::Tuple(vec![
            Term::int(1),
            Term::Atom(Atom::new(b"ok").unwrap()),
            Term::List(vec![Term::int(2), Term::int(3)]),
        ]);
        let mut bytes = encode(&term, Compression::Off).unwrap();
        bytes.extend_from_slice(b"trailing");

        let (decoded, tail) = decode(&bytes).unwrap();
        assert_eq!(decoded, term);
        assert_eq!(tail, b"trailing");
    }

    #[test]
    fn atom_identity_holds_through_round_trip() {
        let a = Atom::new(b"x").unwrap();
        let b = Atom::new(b"x").unwrap();
        assert_eq!(a, b);

        let bytes = encode(&Term::Atom(a), Compression::Off).unwrap();
        let (decoded, _) = decode(&bytes).unwrap();
        assert_eq!(decoded, Term::Atom(b));
    }

    #[test]
    fn compressed_round_trip_matches_plain() {
        let term = Term::List(vec![Term::List(vec![]); 15]);
        let plain = encode(&term, Compression::Off).unwrap();
        let compressed = encode(&term, Compression::DEFAULT).unwrap();
        assert_ne!(plain, compressed);

        let (decoded_plain, _) = decode(&plain).unwrap();
        let (decoded_compressed, _) = decode(&compressed).unwrap();
        assert_eq!(decoded_plain, term);
        assert_eq!(decoded_compressed, term);
    }
}
