//! Input tables for the fitting solvers
//!
//! Marginal controls, joint distributions, survey samples, and the derived
//! constraint and frequency tables exchanged between the solvers. These are
//! per-geography working tables: the driver creates them, the stage consumes
//! them, and only the synthesized output survives.

use serde::{Deserialize, Serialize};

/// Identifier of one category combination in a joint distribution
pub type CatId = u32;

/// One control variable of a marginal table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalGroup {
    /// Name of the control variable (e.g. "hh_size")
    pub name: String,
    /// Category label and target count pairs
    pub cells: Vec<(String, f64)>,
}

impl MarginalGroup {
    /// Create a group from category label / target pairs
    pub fn new(name: impl Into<String>, cells: Vec<(String, f64)>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Sum of the group's targets
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cells.iter().map(|(_, v)| v).sum()
    }
}

/// Known aggregate totals per category for one geography
///
/// Each group is one control variable; within a geography the groups should
/// agree on the total unit count, up to zero-substitution noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marginal {
    /// Control groups in a fixed order
    pub groups: Vec<MarginalGroup>,
}

impl Marginal {
    /// Create a marginal table from control groups
    #[must_use]
    pub fn new(groups: Vec<MarginalGroup>) -> Self {
        Self { groups }
    }

    /// Number of control groups
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// True if there are no groups or every group is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.cells.is_empty())
    }

    /// Iterate over all cell values across groups
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.groups
            .iter()
            .flat_map(|g| g.cells.iter().map(|(_, v)| *v))
    }

    /// Mean of the per-group totals
    ///
    /// The groups should agree on the total unit count; taking the mean guards
    /// against residual disagreement after zero-substitution.
    #[must_use]
    pub fn mean_group_total(&self) -> f64 {
        if self.groups.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.groups.iter().map(MarginalGroup::total).sum();
        sum / self.groups.len() as f64
    }
}

/// One category combination of a joint distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointCell {
    /// Unique category identifier within the table
    pub cat_id: CatId,
    /// Category level per marginal group, aligned with the marginal's order
    pub levels: Vec<String>,
    /// Reference frequency of this combination in the sample
    pub frequency: f64,
}

/// Reference table of category-combination frequencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDistribution {
    /// Cells keyed by `cat_id`
    pub cells: Vec<JointCell>,
}

impl JointDistribution {
    /// Create a joint distribution from cells
    #[must_use]
    pub fn new(cells: Vec<JointCell>) -> Self {
        Self { cells }
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the table has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Largest `cat_id` in the table
    #[must_use]
    pub fn max_cat_id(&self) -> Option<CatId> {
        self.cells.iter().map(|c| c.cat_id).max()
    }

    /// Category ids in cell order
    #[must_use]
    pub fn cat_ids(&self) -> Vec<CatId> {
        self.cells.iter().map(|c| c.cat_id).collect()
    }

    /// Shift every `cat_id` by the given offset
    pub fn shift_cat_ids(&mut self, offset: CatId) {
        for cell in &mut self.cells {
            cell.cat_id += offset;
        }
    }
}

/// One record of a reference survey sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Serial number of the sample household the record belongs to
    pub serialno: u64,
    /// Category combination of the record
    pub cat_id: CatId,
    /// Attribute values, aligned with the owning table's columns
    pub values: Vec<String>,
}

/// Reference survey sample (PUMS) of household or person records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleTable {
    /// Attribute column names
    pub columns: Vec<String>,
    /// Sample records
    pub records: Vec<SampleRecord>,
}

impl SampleTable {
    /// Create a sample table
    #[must_use]
    pub fn new(columns: Vec<String>, records: Vec<SampleRecord>) -> Self {
        Self { columns, records }
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Shift every record's `cat_id` by the given offset
    pub fn shift_cat_ids(&mut self, offset: CatId) {
        for record in &mut self.records {
            record.cat_id += offset;
        }
    }
}

/// Fitted target value per category, ordered as the joint distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// `(cat_id, target)` entries
    pub entries: Vec<(CatId, f64)>,
}

impl Constraint {
    /// Create a constraint vector from entries
    #[must_use]
    pub fn new(entries: Vec<(CatId, f64)>) -> Self {
        Self { entries }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Target for a category, if present
    #[must_use]
    pub fn get(&self, cat_id: CatId) -> Option<f64> {
        self.entries
            .iter()
            .find(|(id, _)| *id == cat_id)
            .map(|(_, v)| *v)
    }

    /// Sum of all targets
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Re-index the entries by shifting every `cat_id`
    pub fn shift_cat_ids(&mut self, offset: CatId) {
        for (cat_id, _) in &mut self.entries {
            *cat_id += offset;
        }
    }
}

/// Per-category counts of sample records, rows aligned with the household
/// sample
///
/// For households each row is the 0/1 incidence of the record's own category;
/// for persons each row counts the household's members per person category.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    /// Category ids labelling the columns
    pub cat_ids: Vec<CatId>,
    /// One row per household sample record
    pub rows: Vec<Vec<f64>>,
}

impl FrequencyTable {
    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.cat_ids.len()
    }

    /// Weighted sum of one column
    #[must_use]
    pub fn weighted_column_sum(&self, column: usize, weights: &[f64]) -> f64 {
        self.rows
            .iter()
            .zip(weights)
            .map(|(row, w)| row[column] * w)
            .sum()
    }
}
