use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::mapping::{CaseMode, Direction, JoinOp, MapTable};

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    pub case: Option<CaseMode>,
    /// Named raw view texts.
    pub views: Option<BTreeMap<String, String>>,
    /// Compositions, evaluated in order. Each may refer to views and to
    /// earlier entries.
    pub derived: Option<Vec<DerivedView>>,
}

/// A table built by joining or restricting two named tables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DerivedView {
    pub name: String,
    pub op: JoinOp,
    pub left: String,
    pub left_side: Direction,
    pub right: String,
    pub right_side: Direction,
    /// emptyReason to report when the composition maps nothing.
    pub reason: Option<String>,
}

impl Config {
    /// Validate the config.
    ///
    /// Collects all validation errors and returns them at once so that users
    /// can fix every issue in a single pass.
    ///
    /// Checks:
    /// - every view text parses
    /// - derived names are unique and do not shadow a view
    /// - derived operands name a view or an earlier derived entry
    pub fn validate(&self) -> Result<(), crate::config::ConfigError> {
        let mut errors = Vec::new();

        let views = self.views.as_ref();
        for (name, text) in views.into_iter().flatten() {
            if let Err(e) = MapTable::parse(text) {
                errors.push(format!("views.{name}: {e}"));
            }
        }

        let mut known: HashSet<&str> = views
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default();
        let mut derived_names: HashSet<&str> = HashSet::new();

        for (i, entry) in self.derived.iter().flatten().enumerate() {
            for (field, operand) in [("left", &entry.left), ("right", &entry.right)] {
                if !known.contains(operand.as_str()) {
                    errors.push(format!(
                        "derived[{i}]: unknown view '{operand}' in {field}"
                    ));
                }
            }

            let name = entry.name.as_str();
            if views.is_some_and(|v| v.contains_key(name)) {
                errors.push(format!("derived[{i}]: name '{name}' shadows a view"));
            } else if !derived_names.insert(name) {
                errors.push(format!("derived[{i}]: duplicate name '{name}'"));
            }
            known.insert(name);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(crate::config::ConfigError::Validation(errors))
        }
    }

    /// Merge two configs. `self` is the base (e.g. global), `other` is the override (e.g. local).
    ///
    /// - case: override (local wins)
    /// - views: per-key override
    /// - derived: append
    pub fn merge(self, other: Config) -> Config {
        Config {
            case: other.case.or(self.case),
            views: Self::merge_maps(self.views, other.views),
            derived: Self::merge_vecs(self.derived, other.derived),
        }
    }

    /// Case handling to build tables with, unless overridden.
    pub fn case_mode(&self) -> CaseMode {
        self.case.unwrap_or_default()
    }

    fn merge_maps<V>(
        base: Option<BTreeMap<String, V>>,
        over: Option<BTreeMap<String, V>>,
    ) -> Option<BTreeMap<String, V>> {
        match (base, over) {
            (Some(mut b), Some(o)) => {
                b.extend(o);
                Some(b)
            }
            (b, o) => b.or(o),
        }
    }

    fn merge_vecs<T>(base: Option<Vec<T>>, over: Option<Vec<T>>) -> Option<Vec<T>> {
        match (base, over) {
            (Some(mut b), Some(o)) => {
                b.extend(o);
                Some(b)
            }
            (b, o) => b.or(o),
        }
    }
}

/// Parse a YAML string into a `Config`.
pub fn parse_config(yaml: &str) -> Result<Config, crate::config::ConfigError> {
    let config: Config = serde_saphyr::from_str(yaml)?;
    Ok(config)
}
