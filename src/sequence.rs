use crate::error::InvalidSequenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lines starting with this are FASTA header metadata and carry no bases.
const FASTA_HEADER_PREFIX: char = '>';

/// An uppercase DNA sequence over the closed {A,T,C,G} alphabet.
///
/// The only way to obtain one is [`NormalizedSequence::from_raw`], which
/// fails hard on any other character. A zero-length sequence is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedSequence(String);

impl NormalizedSequence {
    /// Cleans and validates raw sequence text, FASTA-style input included.
    ///
    /// Header lines (first character `>`) are dropped, the remaining lines
    /// are trimmed and joined without separator, and the result is
    /// uppercased. Any character outside {A,T,C,G} after that fails with
    /// [`InvalidSequenceError`]. Whitespace inside a line counts as an
    /// invalid base.
    pub fn from_raw(raw: &str) -> Result<Self, InvalidSequenceError> {
        let joined: String = raw
            .lines()
            .filter(|line| !line.starts_with(FASTA_HEADER_PREFIX))
            .map(str::trim)
            .collect();
        let upper = joined.to_ascii_uppercase();
        if let Some((position, base)) = upper
            .chars()
            .enumerate()
            .find(|(_, base)| !Self::is_valid_base(*base))
        {
            return Err(InvalidSequenceError::new(base, position));
        }
        Ok(Self(upper))
    }

    #[inline(always)]
    pub fn is_valid_base(base: char) -> bool {
        matches!(base, 'A' | 'T' | 'C' | 'G')
    }

    #[inline(always)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unanchored substring containment; presence only, multiplicity is
    /// not counted.
    pub fn contains_marker(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }
}

impl fmt::Display for NormalizedSequence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
