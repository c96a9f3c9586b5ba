use crate::error::{Error, Result};
use crate::table::{Column, Table};
use std::collections::BTreeSet;

/// Replaces categorical columns with one 0/1 indicator column per category
/// observed during fit, named `<column>_<category>`.
///
/// Categories unseen during fit, and missing cells, encode as all zeros.
#[derive(Clone, Debug, Default)]
pub struct OneHotEncoder {
    columns: Vec<String>,
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<S: AsRef<str>>(&mut self, data: &Table, columns: &[S]) -> Result<()> {
        let mut categories = Vec::with_capacity(columns.len());
        for name in columns {
            let observed: BTreeSet<&str> = data
                .categorical(name.as_ref())?
                .iter()
                .flatten()
                .map(String::as_str)
                .collect();
            categories.push(observed.into_iter().map(str::to_string).collect());
        }

        self.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.categories = Some(categories);
        Ok(())
    }

    /// Drops the fitted categorical columns and appends their indicators.
    pub fn transform(&self, data: &Table) -> Result<Table> {
        let categories = self.categories.as_ref().ok_or(Error::NotFitted("OneHotEncoder"))?;

        let mut result = data.drop(&self.columns)?;
        for (name, column_categories) in self.columns.iter().zip(categories) {
            let values = data.categorical(name)?;
            for category in column_categories {
                let indicator = values
                    .iter()
                    .map(|v| Some(if v.as_deref() == Some(category.as_str()) { 1.0 } else { 0.0 }))
                    .collect();
                result = result.with_column(format!("{name}_{category}"), Column::Numeric(indicator))?;
            }
        }

        Ok(result)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, data: &Table, columns: &[S]) -> Result<Table> {
        self.fit(data, columns)?;
        self.transform(data)
    }

    pub fn categories(&self) -> Option<&[Vec<String>]> {
        self.categories.as_deref()
    }

    pub fn feature_names_out(&self) -> Result<Vec<String>> {
        let categories = self.categories.as_ref().ok_or(Error::NotFitted("OneHotEncoder"))?;
        Ok(self
            .columns
            .iter()
            .zip(categories)
            .flat_map(|(name, cats)| cats.iter().map(move |c| format!("{name}_{c}")))
            .collect())
    }
}
