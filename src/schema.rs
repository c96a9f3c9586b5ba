//! Role-tagged column schema.
//!
//! Stages agree on which column is the label, which are pruned and which are
//! scaled or encoded through a [`Schema`] built from the table and the
//! [`FeatureConfig`], instead of each stage re-deriving it from names and dtypes.

use crate::config::FeatureConfig;
use crate::table::Table;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    Label,
    Excluded,
    Numeric,
    Categorical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<(String, ColumnRole)>,
}

impl Schema {
    pub fn infer(table: &Table, features: &FeatureConfig) -> Self {
        let columns = table
            .columns()
            .map(|(name, column)| {
                let role = if name == features.label {
                    ColumnRole::Label
                } else if features.drop_columns.iter().any(|c| c == name) {
                    ColumnRole::Excluded
                } else if column.is_numeric() {
                    ColumnRole::Numeric
                } else {
                    ColumnRole::Categorical
                };
                (name.to_string(), role)
            })
            .collect();

        Self { columns }
    }

    pub fn role(&self, name: &str) -> Option<ColumnRole> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, role)| *role)
    }

    pub fn names_with(&self, role: ColumnRole) -> Vec<String> {
        self.columns
            .iter()
            .filter(|(_, r)| *r == role)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn label(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, role)| *role == ColumnRole::Label)
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
