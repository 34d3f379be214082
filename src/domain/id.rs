//! Store identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Store identifier - newtype for type safety.
///
/// Ordered so per-store rows can be kept in a stable store order before
/// presentation sorting is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StoreId(u32);

impl StoreId {
    /// Create a new `StoreId`.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw store number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for StoreId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}
