//! Data models for population synthesis
//!
//! This module contains the tables consumed by the fitting solvers and the
//! record types produced by the synthesizer.

pub mod geography;
pub mod population;
pub mod tables;

// Re-export commonly used items
pub use geography::GeographyId;
pub use population::{
    DrawnHousehold, FitQuality, HouseholdRecord, HouseholdTable, PersonRecord, PersonTable,
    SynthesisFailure, SyntheticPopulation,
};
pub use tables::{
    CatId, Constraint, FrequencyTable, JointCell, JointDistribution, Marginal, MarginalGroup,
    SampleRecord, SampleTable,
};
