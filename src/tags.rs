//! ETF wire tag bytes, shared between the encoder and decoder so the two
//! sides of the grammar never drift apart.

pub const VERSION: u8 = 0x83;

pub const COMPRESSED: u8 = b'P';
pub const ATOM: u8 = b'd';
pub const SMALL_INTEGER: u8 = b'a';
pub const INTEGER: u8 = b'b';
pub const SMALL_BIG: u8 = b'n';
pub const LARGE_BIG: u8 = b'o';
pub const FLOAT: u8 = b'F';
pub const BINARY: u8 = b'm';
pub const NIL: u8 = b'j';
pub const STRING: u8 = b'k';
pub const LIST: u8 = b'l';
pub const SMALL_TUPLE: u8 = b'h';
pub const LARGE_TUPLE: u8 = b'i';
pub const MAP: u8 = b't';

/// The reserved marker atom name that tags a foreign-language value.
pub const OPAQUE_MARKER: &[u8] = b"$erlport.opaque";
