//! Migration run selection.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::{
    catalog::CategoryId,
    taxonomy::{CategoryMapping, MappingError, MappingTable},
};

/// Token that selects the additional batch.
pub const ADDITIONAL_TOKEN: &str = "extra";

/// Which mappings a run applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MigrationTarget {
    /// Every mapping of the primary batch.
    #[default]
    All,

    /// Every mapping of the additional batch.
    Additional,

    /// The single mapping moving this category.
    Single(CategoryId),
}

impl MigrationTarget {
    /// Resolve the target against a table, in run order.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownCategory`] when a single category has no mapping.
    pub fn select(self, table: &MappingTable) -> Result<Vec<CategoryMapping>, MappingError> {
        match self {
            Self::All => Ok(table.primary.clone()),
            Self::Additional => Ok(table.additional.clone()),
            Self::Single(old) => Ok(vec![table.find(old)?.clone()]),
        }
    }
}

impl fmt::Display for MigrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Additional => f.write_str(ADDITIONAL_TOKEN),
            Self::Single(id) => write!(f, "{id}"),
        }
    }
}

/// Neither a category id nor the additional batch token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected a category id or `extra`, got `{0}`")]
pub struct ParseTargetError(String);

impl FromStr for MigrationTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.eq_ignore_ascii_case(ADDITIONAL_TOKEN) {
            return Ok(Self::Additional);
        }

        s.parse::<CategoryId>()
            .map(Self::Single)
            .map_err(|_parse_error| ParseTargetError(s.to_string()))
    }
}
