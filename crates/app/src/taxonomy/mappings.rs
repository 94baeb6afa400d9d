//! Category mapping tables.

use std::{collections::HashSet, fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::CategoryId;

const DEFAULT_TABLE: &str = include_str!("../../mappings/default.yaml");

/// Errors raised while loading or validating a mapping table.
#[derive(Debug, Error)]
pub enum MappingError {
    /// IO error reading the mapping file.
    #[error("failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse mapping YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The same old category appears twice in one batch.
    #[error("category {0} is mapped more than once in the {1} batch")]
    DuplicateSource(CategoryId, &'static str),

    /// A mapping moves a category onto itself.
    #[error("category {0} is mapped onto itself")]
    SelfMapping(CategoryId),

    /// No mapping moves the requested category.
    #[error("no mapping found for category {0}")]
    UnknownCategory(CategoryId),
}

/// A declared move of products from one category to another.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryMapping {
    /// Legacy category products are moved out of.
    pub old: CategoryId,

    /// Category products are moved into.
    pub new: CategoryId,

    /// Human-readable name, used in logs.
    #[serde(default)]
    pub label: Option<String>,
}

impl CategoryMapping {
    pub fn new(old: u64, new: u64) -> Self {
        Self {
            old: CategoryId::new(old),
            new: CategoryId::new(new),
            label: None,
        }
    }
}

/// The full set of category moves.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MappingTable {
    /// Parent categories stripped from every product a mapping touches.
    #[serde(default)]
    pub legacy_parents: Vec<CategoryId>,

    /// Batch run when no target is given.
    #[serde(default)]
    pub primary: Vec<CategoryMapping>,

    /// Batch run with the `extra` target.
    #[serde(default)]
    pub additional: Vec<CategoryMapping>,
}

impl MappingTable {
    /// The table shipped with the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled table is malformed.
    pub fn builtin() -> Result<Self, MappingError> {
        Self::from_yaml(DEFAULT_TABLE)
    }

    /// Load and validate a table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Parse and validate a table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_yaml(yaml: &str) -> Result<Self, MappingError> {
        let table: Self = serde_norway::from_str(yaml)?;

        table.validate()?;

        Ok(table)
    }

    fn validate(&self) -> Result<(), MappingError> {
        for (batch, mappings) in [("primary", &self.primary), ("additional", &self.additional)] {
            let mut seen = HashSet::new();

            for mapping in mappings {
                if mapping.old == mapping.new {
                    return Err(MappingError::SelfMapping(mapping.old));
                }

                if !seen.insert(mapping.old) {
                    return Err(MappingError::DuplicateSource(mapping.old, batch));
                }
            }
        }

        Ok(())
    }

    /// Find the mapping for a single old category, primary batch first.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownCategory`] when no batch moves `old`.
    pub fn find(&self, old: CategoryId) -> Result<&CategoryMapping, MappingError> {
        self.primary
            .iter()
            .chain(&self.additional)
            .find(|mapping| mapping.old == old)
            .ok_or(MappingError::UnknownCategory(old))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn builtin_table_is_valid() -> TestResult {
        let table = MappingTable::builtin()?;

        assert_eq!(
            table.legacy_parents,
            [CategoryId::new(630), CategoryId::new(228), CategoryId::new(96)]
        );
        assert!(!table.primary.is_empty());
        assert!(!table.additional.is_empty());
        assert_eq!(table.find(CategoryId::new(631))?.new, CategoryId::new(731));

        Ok(())
    }

    #[test]
    fn find_falls_back_to_additional_batch() -> TestResult {
        let table = MappingTable::from_yaml(
            "legacy_parents: [1]\nprimary:\n  - { old: 10, new: 20 }\nadditional:\n  - { old: 11, new: 21 }\n",
        )?;

        assert_eq!(table.find(CategoryId::new(11))?, &CategoryMapping::new(11, 21));

        Ok(())
    }

    #[test]
    fn unknown_category_is_an_error() -> TestResult {
        let table = MappingTable::from_yaml("primary:\n  - { old: 10, new: 20 }\n")?;

        assert!(matches!(
            table.find(CategoryId::new(99)),
            Err(MappingError::UnknownCategory(id)) if id == CategoryId::new(99)
        ));

        Ok(())
    }

    #[test]
    fn duplicate_source_is_rejected() {
        let result = MappingTable::from_yaml(
            "primary:\n  - { old: 10, new: 20 }\n  - { old: 10, new: 30 }\n",
        );

        assert!(matches!(
            result,
            Err(MappingError::DuplicateSource(id, "primary")) if id == CategoryId::new(10)
        ));
    }

    #[test]
    fn self_mapping_is_rejected() {
        let result = MappingTable::from_yaml("additional:\n  - { old: 10, new: 10 }\n");

        assert!(matches!(result, Err(MappingError::SelfMapping(_))));
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        assert!(matches!(
            MappingTable::from_yaml("primary: [oops"),
            Err(MappingError::Yaml(_))
        ));
    }
}
