use duodoku::analysis::{build_hashed_completions, partition_by_move, set_key};
use duodoku::fnv1a_64;
use duodoku::rng::rng_from_seed;
use duodoku::Completion;
use rand::seq::SliceRandom;

const SOLVED: &str = "123456789456789123789123456231564897564897231897231564312645978645978312978312645";

fn solved_digits() -> Completion {
    let mut out = [0u8; 81];
    for (o, b) in out.iter_mut().zip(SOLVED.bytes()) {
        *o = b - b'0';
    }
    out
}

/// The base completion with the given (cell, digit) overrides applied.
fn variant(overrides: &[(usize, u8)]) -> Completion {
    let mut digits = solved_digits();
    for &(pos, d) in overrides {
        digits[pos] = d;
    }
    digits
}

fn six_pack() -> Vec<Completion> {
    // Three cells; (20, 1) selects a four-completion rectangle on (40, 60).
    vec![
        variant(&[(20, 1), (40, 3), (60, 7)]),
        variant(&[(20, 1), (40, 3), (60, 8)]),
        variant(&[(20, 1), (40, 5), (60, 7)]),
        variant(&[(20, 1), (40, 5), (60, 8)]),
        variant(&[(20, 2), (40, 3), (60, 7)]),
        variant(&[(20, 2), (40, 5), (60, 8)]),
    ]
}

#[test]
fn fnv1a_matches_reference_vectors() {
    assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
}

#[test]
fn partition_splits_exactly_by_move() {
    let mut hashed = build_hashed_completions(&six_pack());
    let before: u64 = set_key(&hashed);
    let mut multiset: Vec<Completion> = hashed.iter().map(|hc| hc.digits).collect();
    multiset.sort_unstable();

    let (k, key) = partition_by_move(&mut hashed, 20, 1);
    assert_eq!(k, 4);
    assert!(hashed[..k].iter().all(|hc| hc.digits[20] == 1));
    assert!(hashed[k..].iter().all(|hc| hc.digits[20] != 1));

    // The prefix key is the XOR of the matching hashes, and the combined
    // set is unchanged.
    assert_eq!(key, set_key(&hashed[..k]));
    assert_eq!(before, set_key(&hashed));
    let mut after: Vec<Completion> = hashed.iter().map(|hc| hc.digits).collect();
    after.sort_unstable();
    assert_eq!(multiset, after);
}

#[test]
fn partition_with_no_matches_is_empty() {
    let mut hashed = build_hashed_completions(&six_pack());
    let (k, key) = partition_by_move(&mut hashed, 20, 9);
    assert_eq!(k, 0);
    assert_eq!(key, 0);
}

#[test]
fn set_key_is_order_independent() {
    let mut hashed = build_hashed_completions(&six_pack());
    let key = set_key(&hashed);
    let mut rng = rng_from_seed(7);
    for _ in 0..4 {
        hashed.shuffle(&mut rng);
        assert_eq!(set_key(&hashed), key);
    }
}

#[test]
fn per_completion_hash_is_over_all_digits() {
    let hashed = build_hashed_completions(&six_pack());
    for hc in &hashed {
        assert_eq!(hc.hash, fnv1a_64(&hc.digits));
    }
    // Distinct completions get distinct hashes here.
    let mut hashes: Vec<u64> = hashed.iter().map(|hc| hc.hash).collect();
    hashes.sort_unstable();
    hashes.dedup();
    assert_eq!(hashes.len(), 6);
}
