//! Atom Registry Module
//!
//! A process-wide interning table enforcing the 255-byte name ceiling and
//! identity semantics. Based on the atom table pattern in `entities_data_handling::atom`,
//! generalized from a per-instance `AtomTable` to a single lazily-initialized
//! global registry, since ETF atoms are interned for the process lifetime
//! rather than scoped to one call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use crate::error::ConstructError;

/// Maximum atom name length in bytes.
pub const MAX_ATOM_LEN: usize = 255;

struct Registry {
    by_name: HashMap<Vec<u8>, u32>,
    by_index: Vec<Vec<u8>>,
}

impl Registry {
    fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_index: Vec::new(),
        }
    }
}

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Registry::new()))
}

/// An interned atom name. Two atoms built from equal bytes compare equal and
/// share the same registry index, so identity and structural equality
/// coincide by construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom(u32);

impl Atom {
    /// Intern `name`, returning the existing entry if one already exists.
    ///
    /// Fails with a *value error* if `name` is longer than 255 bytes.
    pub fn new(name: &[u8]) -> Result<Self, ConstructError> {
        if name.len() > MAX_ATOM_LEN {
            return Err(ConstructError::value_error(format!(
                "atom name exceeds {MAX_ATOM_LEN} bytes (got {})",
                name.len()
            )));
        }

        {
            let table = registry().read().unwrap();
            if let Some(&index) = table.by_name.get(name) {
                return Ok(Atom(index));
            }
        }

        let mut table = registry().write().unwrap();
        if let Some(&index) = table.by_name.get(name) {
            return Ok(Atom(index));
        }
        let index = table.by_index.len() as u32;
        table.by_index.push(name.to_vec());
        table.by_name.insert(name.to_vec(), index);
        Ok(Atom(index))
    }

    /// The interned byte name.
    pub fn name(&self) -> Vec<u8> {
        registry().read().unwrap().by_index[self.0 as usize].clone()
    }

    /// Number of distinct atoms interned so far in this process.
    pub fn registry_size() -> usize {
        registry().read().unwrap().by_index.len()
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom(b'{}')", String::from_utf8_lossy(&self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_gives_identity() {
        let a = Atom::new(b"test").unwrap();
        let b = Atom::new(b"test").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name(), b"test");
    }

    #[test]
    fn distinct_names_are_distinct() {
        let a = Atom::new(b"test").unwrap();
        let b = Atom::new(b"test2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn boundary_length_255_is_valid() {
        let name = vec![b'X'; 255];
        assert!(Atom::new(&name).is_ok());
    }

    #[test]
    fn length_256_is_a_value_error() {
        let name = vec![b'X'; 256];
        let err = Atom::new(&name).unwrap_err();
        assert!(matches!(err, ConstructError::ValueError(_)));
    }

    #[test]
    fn empty_name_is_valid() {
        assert!(Atom::new(b"").is_ok());
    }

    #[test]
    fn debug_uses_single_quoted_form() {
        let a = Atom::new(b"test").unwrap();
        assert_eq!(format!("{a:?}"), "Atom(b'test')");
    }
}
