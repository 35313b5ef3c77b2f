//! The marker dictionary.
//!
//! Every marker displays six symbols. The first is always [`LEADING_SYMBOL`];
//! the remaining five are a permutation of `2..=6`. The 120 possible codes are
//! indexed by the factorial-number-system rank of that permutation (see
//! [`crate::permutation`]), which gives every marker a stable identifier.
//!
//! # Layout Convention
//!
//! Symbol `i` of a code is drawn in glyph cell `i` of [`crate::render::CELL_LAYOUT`]:
//! the left column shows symbols 0, 1, 2 top to bottom, the right column shows
//! symbols 5, 4, 3 top to bottom. Sheets printed with earlier releases rely on
//! this order.

use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, InvalidMarkerId};
use crate::permutation::{self, PERMUTATION_LEN};

/// Number of distinct markers.
pub const N_FIDUCIALS: usize = permutation::PERMUTATION_COUNT;

/// Number of symbols in a code.
pub const CODE_LEN: usize = PERMUTATION_LEN + 1;

/// First symbol of every code.
pub const LEADING_SYMBOL: u8 = 1;

/// Smallest permuted symbol.
pub const MIN_VARIABLE_SYMBOL: u8 = 2;

/// Largest permuted symbol.
pub const MAX_VARIABLE_SYMBOL: u8 = 6;

/// Identifier of a marker, in `[0, 120)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct MarkerId(u8);

impl MarkerId {
    /// Create an identifier, rejecting values outside `[0, 120)`.
    #[must_use]
    pub fn new(value: usize) -> Option<Self> {
        if value < N_FIDUCIALS {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    /// The identifier as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// The raw identifier.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Iterate over all identifiers in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..N_FIDUCIALS).filter_map(Self::new)
    }
}

impl TryFrom<u8> for MarkerId {
    type Error = InvalidMarkerId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value)).ok_or(InvalidMarkerId { value })
    }
}

impl From<MarkerId> for u8 {
    fn from(id: MarkerId) -> Self {
        id.0
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The six symbols displayed by one marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MarkerCode([u8; CODE_LEN]);

impl MarkerCode {
    /// Create a code, checking the leading symbol and the permutation.
    ///
    /// # Example
    /// ```
    /// use fidgen_core::dictionary::MarkerCode;
    ///
    /// assert!(MarkerCode::new([1, 2, 3, 4, 5, 6]).is_some());
    /// assert!(MarkerCode::new([2, 1, 3, 4, 5, 6]).is_none());
    /// assert!(MarkerCode::new([1, 2, 2, 4, 5, 6]).is_none());
    /// ```
    #[must_use]
    pub fn new(symbols: [u8; CODE_LEN]) -> Option<Self> {
        if symbols[0] != LEADING_SYMBOL {
            return None;
        }
        let mut input = [0u8; PERMUTATION_LEN];
        for (dst, &s) in input.iter_mut().zip(&symbols[1..]) {
            if !(MIN_VARIABLE_SYMBOL..=MAX_VARIABLE_SYMBOL).contains(&s) {
                return None;
            }
            *dst = s - MIN_VARIABLE_SYMBOL;
        }
        permutation::is_permutation(&input).then_some(Self(symbols))
    }

    /// Build a code from its five permuted symbols.
    #[must_use]
    pub fn from_variable(variable: [u8; PERMUTATION_LEN]) -> Option<Self> {
        let [b, c, d, e, f] = variable;
        Self::new([LEADING_SYMBOL, b, c, d, e, f])
    }

    /// Build the code with the given identifier without consulting a table.
    #[must_use]
    pub fn from_id(id: MarkerId) -> Self {
        // Identifiers are always in range, so unranking cannot fail.
        let input = permutation::unrank(id.value()).unwrap_or([0, 1, 2, 3, 4]);
        let [b, c, d, e, f] = input.map(|v| v + MIN_VARIABLE_SYMBOL);
        Self([LEADING_SYMBOL, b, c, d, e, f])
    }

    /// All six symbols.
    #[must_use]
    pub fn symbols(&self) -> [u8; CODE_LEN] {
        self.0
    }

    /// Symbol at position `index`, or `None` past the sixth.
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// The five permuted symbols, in `2..=6`.
    #[must_use]
    pub fn variable(&self) -> [u8; PERMUTATION_LEN] {
        let [_, b, c, d, e, f] = self.0;
        [b, c, d, e, f]
    }

    /// The zero-based permutation fed to the ranking.
    #[must_use]
    pub fn permutation_input(&self) -> [u8; PERMUTATION_LEN] {
        self.variable().map(|s| s - MIN_VARIABLE_SYMBOL)
    }

    /// Identifier of this code.
    #[must_use]
    pub fn id(&self) -> MarkerId {
        MarkerId(permutation::lehmer_rank(&self.permutation_input()))
    }
}

impl fmt::Display for MarkerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.0 {
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

/// All valid marker codes indexed by identifier.
#[derive(Clone, Debug)]
pub struct MarkerTable {
    codes: [MarkerCode; N_FIDUCIALS],
}

impl MarkerTable {
    /// Build the table, panicking if ranking produced a gap or a collision.
    ///
    /// # Panics
    /// Only if the ranking code is defective; see [`MarkerTable::try_build`].
    #[must_use]
    pub fn build() -> Self {
        match Self::try_build() {
            Ok(table) => table,
            Err(e) => panic!("{e}"),
        }
    }

    /// Enumerate every code, rank it and store it under its rank.
    ///
    /// # Errors
    /// [`Error::InternalConsistency`] if two codes share a rank, a rank falls
    /// outside `[0, 120)` or some rank is left without a code.
    pub fn try_build() -> Result<Self, Error> {
        let mut slots: [Option<MarkerCode>; N_FIDUCIALS] = [None; N_FIDUCIALS];
        let mut count = 0usize;

        for variable in constrained_tuples() {
            let code = MarkerCode::from_variable(variable).ok_or_else(|| {
                Error::InternalConsistency(format!("enumerated invalid tuple {variable:?}"))
            })?;
            let id = usize::from(permutation::lehmer_rank(&code.permutation_input()));
            let Some(slot) = slots.get_mut(id) else {
                return Err(Error::InternalConsistency(format!(
                    "code {code} ranks to {id}, outside [0, {N_FIDUCIALS})"
                )));
            };
            if let Some(existing) = slot {
                return Err(Error::InternalConsistency(format!(
                    "codes {existing} and {code} both rank to {id}"
                )));
            }
            *slot = Some(code);
            count += 1;
        }

        let mut codes = [MarkerCode([LEADING_SYMBOL, 2, 3, 4, 5, 6]); N_FIDUCIALS];
        for (id, (dst, slot)) in codes.iter_mut().zip(slots).enumerate() {
            *dst = slot.ok_or_else(|| {
                Error::InternalConsistency(format!("no code ranks to {id}"))
            })?;
        }
        tracing::debug!(count, "built marker table");
        Ok(Self { codes })
    }

    /// Number of markers (always 120).
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Code of a marker.
    #[must_use]
    pub fn code(&self, id: MarkerId) -> MarkerCode {
        self.codes[id.index()]
    }

    /// Code at a raw index, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<MarkerCode> {
        self.codes.get(index).copied()
    }

    /// Identifier of a code.
    #[must_use]
    pub fn id_of(&self, code: &MarkerCode) -> MarkerId {
        code.id()
    }

    /// Iterate over `(id, code)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, MarkerCode)> + '_ {
        MarkerId::all().zip(self.codes.iter().copied())
    }
}

/// Process-wide marker table, built on first use.
pub static MARKER_TABLE: LazyLock<MarkerTable> = LazyLock::new(MarkerTable::build);

/// All five-tuples over `2..=6` with pairwise distinct entries, in
/// lexicographic order.
fn constrained_tuples() -> Vec<[u8; PERMUTATION_LEN]> {
    let symbols = MIN_VARIABLE_SYMBOL..=MAX_VARIABLE_SYMBOL;
    let mut out = Vec::with_capacity(N_FIDUCIALS);
    for b in symbols.clone() {
        for c in symbols.clone().filter(|&c| c != b) {
            for d in symbols.clone().filter(|&d| d != b && d != c) {
                for e in symbols.clone().filter(|&e| ![b, c, d].contains(&e)) {
                    for f in symbols.clone().filter(|&f| ![b, c, d, e].contains(&f)) {
                        out.push([b, c, d, e, f]);
                    }
                }
            }
        }
    }
    out
}
