//! Error taxonomy for slot generation.
use thiserror::Error;

use crate::catalog::{ItemId, LocationCategory, LocationId};

/// An option value fell outside its declared bound.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field} must be between {min} and {max} (got {value})")]
pub struct ConfigurationError {
    pub field: &'static str,
    pub min: u32,
    pub max: u32,
    pub value: u32,
}

/// Catalog authoring defects. These abort generation for every player.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DuplicateIdentifierError {
    #[error("location id {id} is used by both `{first}` and `{second}`")]
    LocationId {
        id: LocationId,
        first: String,
        second: String,
    },
    #[error("location name `{name}` is registered twice")]
    LocationName { name: String },
    #[error("item id {id} is used by both `{first}` and `{second}`")]
    ItemId {
        id: ItemId,
        first: &'static str,
        second: &'static str,
    },
    #[error("item name `{name}` is registered twice")]
    ItemName { name: &'static str },
    #[error("id ranges of {first:?} and {second:?} overlap")]
    RangeOverlap {
        first: LocationCategory,
        second: LocationCategory,
    },
    #[error("location `{name}` has id {id} outside the {category:?} range")]
    OutOfRange {
        name: String,
        id: LocationId,
        category: LocationCategory,
    },
}

/// The builder or oracle derived a state that breaks a graph invariant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanInconsistencyError {
    #[error("terminal location {id} is not part of the active location set")]
    TerminalInactive { id: LocationId },
    #[error("no catalog entry for the terminal of a {goal} goal with count {count}")]
    TerminalMissing { goal: &'static str, count: u32 },
    #[error("{mandatory} mandatory rewards do not fit into {locations} active locations")]
    MandatoryExceedsLocations { mandatory: usize, locations: usize },
    #[error("location {id} appears in more than one access chain")]
    ChainOverlap { id: LocationId },
}

/// Raised when the balancer cannot compose a pool at parity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolExhaustionError {
    #[error("filler classification is empty; cannot pad {missing} rewards")]
    NoFiller { missing: usize },
    #[error("catalog has no item named `{name}`")]
    MissingItem { name: &'static str },
}

/// Top-level error returned by the generation pipeline.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("catalog defect: {0}")]
    DuplicateIdentifier(#[from] DuplicateIdentifierError),
    #[error("inconsistent plan: {0}")]
    PlanInconsistency(#[from] PlanInconsistencyError),
    #[error("pool exhausted: {0}")]
    PoolExhaustion(#[from] PoolExhaustionError),
}

impl GenerationError {
    /// Whether this error aborts generation for every player rather than just one.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::DuplicateIdentifier(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_names_field_and_bounds() {
        let err = ConfigurationError {
            field: "day_count",
            min: 1,
            max: 100,
            value: 101,
        };
        assert_eq!(
            err.to_string(),
            "day_count must be between 1 and 100 (got 101)"
        );
    }

    #[test]
    fn only_catalog_defects_are_global() {
        let dup: GenerationError = DuplicateIdentifierError::ItemName { name: "Hob" }.into();
        let pool: GenerationError = PoolExhaustionError::NoFiller { missing: 3 }.into();
        assert!(dup.is_global());
        assert!(!pool.is_global());
    }
}
