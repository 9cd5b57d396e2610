//! Strongly-typed identifiers used across the domain.

use crate::error::{DomainError, DomainResult};

/// Identifier of a product.
///
/// Surrogate key assigned by the store on insert. Always within `[0, i64::MAX]`,
/// the range a SQLite `INTEGER PRIMARY KEY` can hold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(i64);

impl ProductId {
    pub const MAX: i64 = i64::MAX;

    /// Validate a raw integer (as typed by a user) into an identifier.
    pub fn try_from_raw(raw: i128) -> DomainResult<Self> {
        if (0..=i128::from(Self::MAX)).contains(&raw) {
            Ok(Self(raw as i64))
        } else {
            Err(DomainError::validation("id out of range"))
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for ProductId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from_raw(i128::from(value))
    }
}
