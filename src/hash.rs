//! Completion hashing.
//!
//! Each completion is hashed once with FNV-1a over its 81 digit bytes; the
//! key for a set of completions is the XOR of the per-completion hashes,
//! which makes the key independent of the order the set is stored in.

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// Domain tag folded into memo keys when the position carries an odd number
// of inferred placements (arbitrary but fixed).
pub(crate) const DOM_PARITY: u64 = 0xD0D0_5EED_0000_0001;

/// FNV-1a over an arbitrary byte slice.
#[inline]
#[must_use]
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}
