//! Term Universe Module
//!
//! The tagged value space the codec reads and writes. Pure data; no I/O.
//! Grounded on `entities_data_handling::term_hashing::Term`, generalized from
//! that crate's BEAM-internal variant set (Pid/Port/Ref/Fun, hash-multiplier
//! constants) to the closed set of terms this codec actually needs to move
//! across the host/Erlang boundary: integers, floats, atoms, binaries,
//! lists, tuples, maps, and the opaque carrier for foreign-language values.

use std::fmt;
use std::hash::{Hash, Hasher};

use malachite::Integer;

use crate::atom::Atom;
use crate::error::{ConstructError, MutationError};

/// A single Erlang term as understood by this codec.
///
/// There is deliberately no `Bool`/`Nil` variant: the predefined atoms
/// `true`, `false`, and `undefined` decode to ordinary interned [`Atom`]s
/// like any other atom name. That mapping to a host boolean/`None` is a
/// concern of the embedding host language, not of this closed term universe
/// — see DESIGN.md for the resolution.
#[derive(Clone, Debug)]
pub enum Term {
    Integer(Integer),
    Float(f64),
    Atom(Atom),
    ByteString(Vec<u8>),
    /// A proper, ordered list. Empty vector is the wire `j` (nil) tag.
    List(Vec<Term>),
    ImproperList(ImproperList),
    Map(Map),
    Tuple(Vec<Term>),
    OpaqueObject(OpaqueObject),
    /// Encode-only convenience: a host Unicode string. Never produced by
    /// decode — `k`/`l` tags always decode to [`Term::List`] of integers;
    /// text is not a distinct ETF tag.
    TextString(String),
}

impl Term {
    /// Convenience constructor for a small non-negative or negative integer.
    pub fn int(value: i64) -> Self {
        Term::Integer(Integer::from(value))
    }

    /// True if this term is a (possibly empty) proper list.
    pub fn is_list(&self) -> bool {
        matches!(self, Term::List(_))
    }

    /// Join a list's elements into a text string, reading each element as a
    /// Unicode code point.
    ///
    /// Fails with a *type error* if `self` is not a [`Term::List`], if any
    /// element is not an integer, or if any integer falls outside
    /// `0..=0x10FFFF` or names a surrogate code point (`0xD800..=0xDFFF`,
    /// which has no `char` representation).
    pub fn to_text(&self) -> Result<String, ConstructError> {
        let Term::List(elements) = self else {
            return Err(ConstructError::type_error(
                "to_text requires a List term",
            ));
        };
        let mut text = String::with_capacity(elements.len());
        for element in elements {
            let code_point = match element {
                Term::Integer(value) => crate::bignum::to_i64(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .and_then(char::from_u32),
                _ => None,
            };
            match code_point {
                Some(c) => text.push(c),
                None => {
                    return Err(ConstructError::type_error(
                        "list element is not a valid Unicode code point",
                    ))
                }
            }
        }
        Ok(text)
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        use Term::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Atom(a), Atom(b)) => a == b,
            (ByteString(a), ByteString(b)) => a == b,
            (List(a), List(b)) => a == b,
            (ImproperList(a), ImproperList(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Tuple(a), Tuple(b)) => a == b,
            (OpaqueObject(a), OpaqueObject(b)) => a == b,
            (TextString(a), TextString(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Term::Integer(v) => v.hash(state),
            Term::Float(v) => v.to_bits().hash(state),
            Term::Atom(v) => v.hash(state),
            Term::ByteString(v) => v.hash(state),
            Term::List(v) => v.hash(state),
            Term::ImproperList(v) => v.hash(state),
            Term::Map(v) => v.hash(state),
            Term::Tuple(v) => v.hash(state),
            Term::OpaqueObject(v) => v.hash(state),
            Term::TextString(v) => v.hash(state),
        }
    }
}

/// A non-empty element sequence paired with a non-list tail term.
///
/// Frozen at construction: every mutating method unconditionally returns
/// [`MutationError`], matching the source's freeze-after-construct
/// container discipline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImproperList {
    elements: Vec<Term>,
    tail: Box<Term>,
}

impl ImproperList {
    /// Build an improper list, rejecting an empty element sequence and a
    /// list-typed tail.
    pub fn new(elements: Vec<Term>, tail: Term) -> Result<Self, ConstructError> {
        if elements.is_empty() {
            return Err(ConstructError::value_error(
                "ImproperList requires at least one element",
            ));
        }
        if tail.is_list() {
            return Err(ConstructError::type_error(
                "ImproperList tail must not be a list",
            ));
        }
        Ok(Self::new_unchecked(elements, tail))
    }

    /// Construct without validating the tail. Used by the decoder, which
    /// must accept any tail a peer sends.
    pub(crate) fn new_unchecked(elements: Vec<Term>, tail: Term) -> Self {
        Self {
            elements,
            tail: Box::new(tail),
        }
    }

    pub fn elements(&self) -> &[Term] {
        &self.elements
    }

    pub fn tail(&self) -> &Term {
        &self.tail
    }

    /// Always fails: `ImproperList` is frozen after construction.
    pub fn push(&self, _value: Term) -> Result<(), MutationError> {
        Err(MutationError)
    }

    /// Always fails: `ImproperList` is frozen after construction.
    pub fn set_tail(&self, _tail: Term) -> Result<(), MutationError> {
        Err(MutationError)
    }
}

/// An immutable, insertion-ordered association from term keys to term
/// values.
///
/// Stored as a `Vec<(Term, Term)>` searched linearly rather than a
/// `HashMap`, per the resolution recorded in DESIGN.md: `Term` needs its own
/// structural [`Hash`], and linear storage naturally preserves
/// construction/decode order for encode, even though that order is not
/// guaranteed to callers.
#[derive(Clone, Debug, Default)]
pub struct Map {
    pairs: Vec<(Term, Term)>,
}

impl Map {
    /// Build a map from `pairs`, last-value-wins on duplicate keys (matches
    /// decode's rule for the `t` tag).
    pub fn new(pairs: Vec<(Term, Term)>) -> Self {
        let mut result: Vec<(Term, Term)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            if let Some(slot) = result.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                result.push((key, value));
            }
        }
        Map { pairs: result }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &Term) -> Option<&Term> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Term, Term)> {
        self.pairs.iter()
    }

    /// Always fails: `Map` is frozen after construction.
    pub fn insert(&self, _key: Term, _value: Term) -> Result<(), MutationError> {
        Err(MutationError)
    }

    /// Always fails: `Map` is frozen after construction.
    pub fn remove(&self, _key: &Term) -> Result<(), MutationError> {
        Err(MutationError)
    }

    /// Always fails: `Map` is frozen after construction.
    pub fn clear(&self) -> Result<(), MutationError> {
        Err(MutationError)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        if self.pairs.len() != other.pairs.len() {
            return false;
        }
        self.pairs
            .iter()
            .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Order-independent: XOR per-pair hashes together so two Maps built
        // from the same pairs in different orders hash identically.
        let mut acc: u64 = 0;
        for (k, v) in &self.pairs {
            let mut pair_hasher = std::collections::hash_map::DefaultHasher::new();
            k.hash(&mut pair_hasher);
            v.hash(&mut pair_hasher);
            acc ^= pair_hasher.finish();
        }
        acc.hash(state);
    }
}

/// Carrier for a foreign-language value crossing the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpaqueObject {
    data: Vec<u8>,
    language: Atom,
}

impl OpaqueObject {
    pub fn new(data: Vec<u8>, language: Atom) -> Self {
        Self { data, language }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn language(&self) -> Atom {
        self.language
    }
}

impl fmt::Display for ImproperList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImproperList({:?}, {:?})", self.elements, self.tail)
    }
}
