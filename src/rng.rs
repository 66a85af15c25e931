use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Deterministic RNG for a given 64-bit seed.
///
/// Uses PCG 64-bit (rand_pcg::Pcg64) for reproducible sequences: the same
/// seed always produces the same enumeration order and tie-breaks.
#[inline]
#[must_use]
pub fn rng_from_seed(seed: u64) -> Pcg64 {
    Pcg64::seed_from_u64(seed)
}

/// Fresh random seed, for when the caller did not supply one. The chosen
/// seed should be logged so that a game can be replayed.
#[must_use]
pub fn random_seed() -> u64 {
    rand::thread_rng().gen()
}

/// Uniformly samples one element of a non-empty slice.
#[inline]
pub fn sample<'a, T>(items: &'a [T], rng: &mut impl Rng) -> &'a T {
    assert!(!items.is_empty());
    &items[rng.gen_range(0..items.len())]
}
