//! Factorial-number-system ranking of permutations.
//!
//! Marker codes carry a permutation of five symbols. The rank of that
//! permutation in the factorial number system (its Lehmer code read as an
//! integer) is the marker identifier. Ranking and unranking are exact inverses
//! over `[0, 120)`.
//!
//! Inputs here are zero-based: a permutation is five distinct values in
//! `0..5`.

/// Number of permuted positions.
pub const PERMUTATION_LEN: usize = 5;

/// Number of distinct permutations of [`PERMUTATION_LEN`] items (5!).
pub const PERMUTATION_COUNT: usize = 120;

/// Weight of each Lehmer digit: `(4 - i)!` for position `i`.
const FACTORIAL: [u8; PERMUTATION_LEN] = [24, 6, 2, 1, 1];

/// Returns `true` if `input` holds each value of `0..5` exactly once.
#[must_use]
pub fn is_permutation(input: &[u8; PERMUTATION_LEN]) -> bool {
    let mut seen = 0u8;
    for &value in input {
        if usize::from(value) >= PERMUTATION_LEN || seen & (1 << value) != 0 {
            return false;
        }
        seen |= 1 << value;
    }
    true
}

/// Rank a zero-based permutation.
///
/// Returns `None` if `input` is not a permutation of `0..5`.
///
/// # Example
/// ```
/// use fidgen_core::permutation::rank;
///
/// assert_eq!(rank(&[0, 1, 2, 3, 4]), Some(0));
/// assert_eq!(rank(&[4, 3, 2, 1, 0]), Some(119));
/// assert_eq!(rank(&[0, 0, 1, 2, 3]), None);
/// ```
#[must_use]
pub fn rank(input: &[u8; PERMUTATION_LEN]) -> Option<u8> {
    is_permutation(input).then(|| lehmer_rank(input))
}

/// Rank without validation. `input` must satisfy [`is_permutation`].
///
/// `mapping[v]` holds the number of still-unused values below `v`, so it is
/// the Lehmer digit for `v` at the current position. Consuming `v` lowers the
/// count of every larger value by one.
pub(crate) fn lehmer_rank(input: &[u8; PERMUTATION_LEN]) -> u8 {
    let mut mapping: [u8; PERMUTATION_LEN] = [0, 1, 2, 3, 4];
    let mut id = 0u8;
    for (i, &value) in input.iter().enumerate() {
        let v = usize::from(value);
        id += mapping[v] * FACTORIAL[i];
        for m in &mut mapping[v + 1..] {
            *m -= 1;
        }
    }
    id
}

/// Inverse of [`rank`].
///
/// Returns `None` for identifiers outside `[0, 120)`.
#[must_use]
pub fn unrank(id: u8) -> Option<[u8; PERMUTATION_LEN]> {
    if usize::from(id) >= PERMUTATION_COUNT {
        return None;
    }
    let mut remaining: Vec<u8> = (0..5).collect();
    let mut rest = id;
    let mut out = [0u8; PERMUTATION_LEN];
    for (slot, weight) in out.iter_mut().zip(FACTORIAL) {
        let digit = usize::from(rest / weight);
        rest %= weight;
        *slot = remaining.remove(digit);
    }
    Some(out)
}
