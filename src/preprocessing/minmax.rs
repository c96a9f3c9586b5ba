use crate::Vector;
use crate::error::{Error, Result};
use crate::table::{Column, Table};

/// Rescales numeric columns so each column's observed minimum maps to 0 and
/// maximum to 1. A constant column maps to 0. Missing cells stay missing.
#[derive(Clone, Debug, Default)]
pub struct MinMaxScaler {
    columns: Vec<String>,
    data_min: Option<Vector>,
    data_max: Option<Vector>,
}

impl MinMaxScaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit<S: AsRef<str>>(&mut self, data: &Table, columns: &[S]) -> Result<()> {
        let mut mins = Vec::with_capacity(columns.len());
        let mut maxs = Vec::with_capacity(columns.len());

        for name in columns {
            let name = name.as_ref();
            let observed: Vec<f64> = data.numeric(name)?.iter().flatten().copied().collect();
            if observed.is_empty() {
                return Err(Error::EmptyData(format!(
                    "cannot fit MinMaxScaler on column {name} without observed values"
                )));
            }

            mins.push(observed.iter().copied().fold(f64::INFINITY, f64::min));
            maxs.push(observed.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        }

        self.columns = columns.iter().map(|c| c.as_ref().to_string()).collect();
        self.data_min = Some(Vector::from(mins));
        self.data_max = Some(Vector::from(maxs));
        Ok(())
    }

    /// Scales the fitted columns of `data`; every other column passes through.
    pub fn transform(&self, data: &Table) -> Result<Table> {
        let data_min = self.data_min.as_ref().ok_or(Error::NotFitted("MinMaxScaler"))?;
        let data_max = self.data_max.as_ref().ok_or(Error::NotFitted("MinMaxScaler"))?;

        for name in &self.columns {
            data.numeric(name)?;
        }

        let mut result = Table::new();
        for (name, column) in data.columns() {
            let column = match self.columns.iter().position(|c| c == name) {
                Some(j) => {
                    let values = data.numeric(name)?;
                    let (min, range) = (data_min[j], data_max[j] - data_min[j]);
                    Column::Numeric(
                        values
                            .iter()
                            .map(|v| v.map(|x| if range == 0.0 { 0.0 } else { (x - min) / range }))
                            .collect(),
                    )
                }
                None => column.clone(),
            };
            result = result.with_column(name, column)?;
        }

        Ok(result)
    }

    pub fn fit_transform<S: AsRef<str>>(&mut self, data: &Table, columns: &[S]) -> Result<Table> {
        self.fit(data, columns)?;
        self.transform(data)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data_min(&self) -> Option<&Vector> {
        self.data_min.as_ref()
    }

    pub fn data_max(&self) -> Option<&Vector> {
        self.data_max.as_ref()
    }
}
