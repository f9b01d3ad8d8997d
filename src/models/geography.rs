//! Geographic identifiers for synthesis units

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered key identifying one synthesis unit
///
/// The four components follow the census hierarchy. The key is used both as a
/// map key for fit-quality results and as the set of location columns appended
/// to synthesized households.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeographyId {
    /// State FIPS code
    pub state: String,
    /// County FIPS code
    pub county: String,
    /// Census tract code
    pub tract: String,
    /// Block group code
    pub block_group: String,
}

impl GeographyId {
    /// Column names under which the key is appended to household output
    pub const KEY_COLUMNS: [&'static str; 4] = ["state", "county", "tract", "block_group"];

    /// Create a new geography identifier
    pub fn new(
        state: impl Into<String>,
        county: impl Into<String>,
        tract: impl Into<String>,
        block_group: impl Into<String>,
    ) -> Self {
        Self {
            state: state.into(),
            county: county.into(),
            tract: tract.into(),
            block_group: block_group.into(),
        }
    }

    /// Key values in the same order as [`Self::KEY_COLUMNS`]
    #[must_use]
    pub fn key_values(&self) -> [&str; 4] {
        [&self.state, &self.county, &self.tract, &self.block_group]
    }
}

impl fmt::Display for GeographyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.state, self.county, self.tract, self.block_group
        )
    }
}
