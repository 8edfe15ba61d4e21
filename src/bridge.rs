//! Host-Opaque Bridge Module
//!
//! The decode-side extension point for the `$erlport.opaque` marker tuple.
//! `Term` is a closed, statically-typed universe, so unlike a
//! dynamic-language binding there is no single built-in "host language" the
//! codec recognizes: a caller that wants one language tag deserialized
//! inline rather than passed through as an [`crate::term::OpaqueObject`]
//! supplies their own [`HostBridge`].

use crate::atom::Atom;
use crate::term::Term;

/// Recognizes and deserializes one host language's opaque payloads.
///
/// `decode_with_bridge` consults `owns` for every `$erlport.opaque` 3-tuple
/// it sees; when it returns `true`, `deserialize` is called on the payload
/// bytes to produce the `Term` that replaces the 3-tuple. Any other
/// language tag falls through to an ordinary `OpaqueObject`.
pub trait HostBridge {
    /// Does `language` belong to this bridge?
    fn owns(&self, language: Atom) -> bool;

    /// Reconstruct a `Term` from `data` for a language this bridge owns.
    ///
    /// Returning `Err` degrades to surfacing the value as an `OpaqueObject`
    /// instead of failing the whole decode, since a malformed embedded
    /// payload is a property of the foreign value, not of the ETF framing
    /// around it.
    fn deserialize(&self, data: &[u8]) -> Result<Term, ()>;
}

/// The default bridge: recognizes no language, so every `$erlport.opaque`
/// 3-tuple decodes to [`crate::term::OpaqueObject`].
pub struct NoBridge;

impl HostBridge for NoBridge {
    fn owns(&self, _language: Atom) -> bool {
        false
    }

    fn deserialize(&self, _data: &[u8]) -> Result<Term, ()> {
        Err(())
    }
}
