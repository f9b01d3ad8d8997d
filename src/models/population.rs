//! Synthesized population records and aggregate results

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SynthesisError};
use crate::models::geography::GeographyId;
use crate::models::tables::CatId;

/// Goodness of fit of one geography's drawn person population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// Chi-square statistic of person category counts against the constraint
    pub chisq: f64,
    /// Corresponding p-value
    pub p_value: f64,
}

/// A synthesized household before the geography key is attached
///
/// Produced by the drawer; the drivers convert these into
/// [`HouseholdRecord`]s once the owning geography is known.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnHousehold {
    /// Household id, unique within the run once offsets are applied
    pub id: u64,
    /// Serial number of the sample record the household was drawn from
    pub serialno: u64,
    /// Household category
    pub cat_id: CatId,
    /// Attribute values copied from the sample record
    pub values: Vec<String>,
}

/// A synthesized household with its geography key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    /// Globally unique, monotonically increasing household id
    pub id: u64,
    /// Serial number of the originating sample record
    pub serialno: u64,
    /// Household category
    pub cat_id: CatId,
    /// Attribute values, aligned with the owning table's columns
    pub values: Vec<String>,
    /// Geography the household belongs to
    pub geography: GeographyId,
}

/// A synthesized person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Foreign key referencing the parent household's id
    pub hh_id: u64,
    /// Serial number of the originating sample record
    pub serialno: u64,
    /// Person category
    pub cat_id: CatId,
    /// Attribute values, aligned with the owning table's columns
    pub values: Vec<String>,
}

/// All synthesized households of a run
///
/// Row ids are globally unique; the geography key columns live on each record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HouseholdTable {
    /// Sample attribute column names
    pub columns: Vec<String>,
    /// Household records in id order
    pub records: Vec<HouseholdRecord>,
}

impl HouseholdTable {
    /// Number of households
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no households have been synthesized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one geography's households, checking column compatibility
    ///
    /// The first non-empty append fixes the column set; later geographies
    /// must match it.
    pub fn append(&mut self, columns: &[String], records: Vec<HouseholdRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if self.records.is_empty() {
            self.columns = columns.to_vec();
        } else if self.columns != columns {
            return Err(SynthesisError::invalid_input(format!(
                "household attribute columns differ between geographies: {:?} vs {:?}",
                self.columns, columns
            )));
        }
        self.records.extend(records);
        Ok(())
    }

    /// Id of the last household, if any
    #[must_use]
    pub fn last_id(&self) -> Option<u64> {
        self.records.last().map(|r| r.id)
    }
}

/// All synthesized persons of a run, in flat 0-based order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonTable {
    /// Sample attribute column names
    pub columns: Vec<String>,
    /// Person records; the row index is the Vec position
    pub records: Vec<PersonRecord>,
}

impl PersonTable {
    /// Number of persons
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no persons have been synthesized
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append one geography's persons, checking column compatibility
    pub fn append(&mut self, columns: &[String], records: Vec<PersonRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if self.records.is_empty() {
            self.columns = columns.to_vec();
        } else if self.columns != columns {
            return Err(SynthesisError::invalid_input(format!(
                "person attribute columns differ between geographies: {:?} vs {:?}",
                self.columns, columns
            )));
        }
        self.records.extend(records);
        Ok(())
    }
}

/// A geography that failed to synthesize
#[derive(Debug)]
pub struct SynthesisFailure {
    /// The geography that was skipped
    pub geography: GeographyId,
    /// The error that caused the skip
    pub error: SynthesisError,
}

/// Aggregate result of a synthesis run
///
/// Contains every geography that succeeded; failed geographies are named in
/// `failures` and contribute no rows and no fit-quality entry.
#[derive(Debug, Default)]
pub struct SyntheticPopulation {
    /// Synthesized households with globally unique ids
    pub households: HouseholdTable,
    /// Synthesized persons referencing their parent households
    pub persons: PersonTable,
    /// Per-geography goodness of fit for the drawn persons
    pub fit_quality: FxHashMap<GeographyId, FitQuality>,
    /// Geographies that were skipped, with the error that caused it
    pub failures: Vec<SynthesisFailure>,
}
