use crate::hash::fnv1a_64;
use crate::types::Completion;

/// A completion together with its FNV-1a hash, computed once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashedCompletion {
    pub hash: u64,
    pub digits: Completion,
}

/// Hashes every completion in the input set.
#[must_use]
pub fn build_hashed_completions(completions: &[Completion]) -> Vec<HashedCompletion> {
    completions
        .iter()
        .map(|digits| HashedCompletion {
            hash: fnv1a_64(digits),
            digits: *digits,
        })
        .collect()
}

/// Order-independent key of a completion set: the XOR of the per-completion
/// hashes. Invariant under any permutation of the set.
#[inline]
#[must_use]
pub fn set_key(completions: &[HashedCompletion]) -> u64 {
    completions.iter().fold(0, |acc, hc| acc ^ hc.hash)
}

/// Partitions the range in place so that completions with `digit` at `pos`
/// form the prefix. Returns the prefix length and its XOR-of-hashes key.
/// Order within the two groups may change.
pub fn partition_by_move(
    completions: &mut [HashedCompletion],
    pos: u8,
    digit: u8,
) -> (usize, u64) {
    let mut k = 0;
    let mut key = 0u64;
    for i in 0..completions.len() {
        if completions[i].digits[pos as usize] == digit {
            key ^= completions[i].hash;
            completions.swap(k, i);
            k += 1;
        }
    }
    (k, key)
}
