//! Named tables built from a validated [`Config`].

use std::collections::BTreeMap;

use crate::config::{Config, ConfigError};
use crate::mapping::MapTable;

/// Every view and derived composition of a config, by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCatalog {
    tables: BTreeMap<String, MapTable>,
}

impl ViewCatalog {
    /// Parse every view, then evaluate the derived entries in order.
    pub fn build(config: &Config) -> Result<Self, ConfigError> {
        let case = config.case_mode();
        let mut tables = BTreeMap::new();

        for (name, text) in config.views.iter().flatten() {
            let mut table = MapTable::with_case(case);
            table.load(text).map_err(|e| ConfigError::View {
                name: name.clone(),
                source: e.into(),
            })?;
            tables.insert(name.clone(), table);
        }

        for entry in config.derived.iter().flatten() {
            let lookup = |name: &str| {
                tables
                    .get(name)
                    .ok_or_else(|| ConfigError::UnknownView(name.to_string()))
            };
            let left = lookup(&entry.left)?;
            let right = lookup(&entry.right)?;
            let composed = left.compose(
                entry.op,
                entry.left_side,
                right,
                entry.right_side,
                entry.reason.as_deref(),
            );
            tracing::debug!(
                name = %entry.name,
                op = %entry.op,
                rows = composed.len(),
                join_error = composed.join_error(),
                "built derived view"
            );
            tables.insert(entry.name.clone(), composed);
        }

        Ok(Self { tables })
    }

    pub fn get(&self, name: &str) -> Result<&MapTable, ConfigError> {
        self.tables
            .get(name)
            .ok_or_else(|| ConfigError::UnknownView(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
