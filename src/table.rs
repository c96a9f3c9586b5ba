//! In-memory tabular data.
//!
//! A [`Table`] is an ordered set of uniquely named, equally long columns. Each
//! column is either numeric or categorical and stores `None` for a missing
//! cell, so cleaning can reason about missing values without sentinel floats.

use crate::error::{Error, Result};
use crate::{Matrix, Vector};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Cell contents treated as missing when reading CSV.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "None"];

#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Categorical(_) => "categorical",
        }
    }

    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Column::Numeric(values) => values[row].is_none_or(f64::is_nan),
            Column::Categorical(values) => values[row].is_none(),
        }
    }

    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_null(row)).count()
    }

    pub fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(indices.iter().map(|&i| values[i]).collect()),
            Column::Categorical(values) => {
                Column::Categorical(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }

    fn filter(&self, mask: &[bool]) -> Column {
        let indices: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| i)
            .collect();
        self.take(&indices)
    }
}

/// NaN cells are stored as missing.
impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Numeric(values.into_iter().map(present).collect())
    }
}

impl From<Vec<Option<f64>>> for Column {
    fn from(values: Vec<Option<f64>>) -> Self {
        Column::Numeric(values.into_iter().map(|v| v.and_then(present)).collect())
    }
}

fn present(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::Categorical(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(values: Vec<Option<&str>>) -> Self {
        Column::Categorical(values.into_iter().map(|v| v.map(str::to_string)).collect())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(Self::new(), |table, (name, column)| table.with_column(name, column))
    }

    /// Appends a column, rejecting duplicate names and ragged lengths.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(Error::LengthMismatch {
                name,
                expected: self.n_rows(),
                got: column.len(),
            });
        }

        self.names.push(name);
        self.columns.push(column);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Categorical(_) => Err(Error::NotNumeric(name.to_string())),
        }
    }

    pub fn categorical(&self, name: &str) -> Result<&[Option<String>]> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(values),
            Column::Numeric(_) => Err(Error::InvalidParameter {
                name: name.to_string(),
                value: "numeric".to_string(),
                reason: "expected a categorical column".to_string(),
            }),
        }
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns()
            .filter(|(_, column)| column.is_numeric())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn categorical_column_names(&self) -> Vec<String> {
        self.columns()
            .filter(|(_, column)| !column.is_numeric())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Returns a copy without the named columns. Every name must exist.
    pub fn drop<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        for name in names {
            self.column(name.as_ref())?;
        }

        let mut result = Table::new();
        for (name, column) in self.columns() {
            if names.iter().all(|n| n.as_ref() != name) {
                result = result.with_column(name, column.clone())?;
            }
        }
        Ok(result)
    }

    /// Returns the named columns in the given order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table> {
        names.iter().try_fold(Table::new(), |table, name| {
            let name = name.as_ref();
            table.with_column(name, self.column(name)?.clone())
        })
    }

    pub fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    pub fn filter_rows(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.n_rows() {
            return Err(Error::ShapeMismatch {
                expected: format!("mask of length {}", self.n_rows()),
                actual: format!("mask of length {}", mask.len()),
            });
        }

        Ok(Table {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.filter(mask)).collect(),
        })
    }

    pub fn row_has_missing(&self, row: usize) -> bool {
        self.columns.iter().any(|c| c.is_null(row))
    }

    pub fn has_missing(&self) -> bool {
        (0..self.n_rows()).any(|row| self.row_has_missing(row))
    }

    /// Converts every column into a dense feature matrix.
    pub fn to_matrix(&self) -> Result<Matrix> {
        let mut matrix = Matrix::zeros((self.n_rows(), self.n_cols()));
        for (j, (name, column)) in self.columns().enumerate() {
            let Column::Numeric(values) = column else {
                return Err(Error::NotNumeric(name.to_string()));
            };
            for (i, value) in values.iter().enumerate() {
                matrix[[i, j]] = value
                    .and_then(present)
                    .ok_or_else(|| Error::MissingValues(name.to_string()))?;
            }
        }
        Ok(matrix)
    }

    pub fn to_vector(&self, name: &str) -> Result<Vector> {
        self.numeric(name)?
            .iter()
            .map(|v| v.and_then(present).ok_or_else(|| Error::MissingValues(name.to_string())))
            .collect::<Result<Vec<f64>>>()
            .map(Vector::from)
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
        let file = File::open(path)?;
        Self::from_csv_reader(BufReader::new(file))
    }

    /// Parses a headered CSV. A column is numeric when every non-missing
    /// cell parses as `f64`, otherwise categorical.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Table> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for record in rdr.records() {
            let record = record?;
            for (cells, field) in raw.iter_mut().zip(record.iter()) {
                if MISSING_MARKERS.contains(&field) {
                    cells.push(None);
                } else {
                    cells.push(Some(field.to_string()));
                }
            }
        }

        let mut table = Table::new();
        for (name, cells) in headers.iter().zip(raw) {
            table = table.with_column(name, infer_column(cells))?;
        }
        Ok(table)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.to_csv_writer(BufWriter::new(file))
    }

    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.names)?;

        for row in 0..self.n_rows() {
            let record: Vec<String> = self
                .columns
                .iter()
                .map(|column| match column {
                    Column::Numeric(values) => values[row].map(|v| v.to_string()).unwrap_or_default(),
                    Column::Categorical(values) => values[row].clone().unwrap_or_default(),
                })
                .collect();
            wtr.write_record(&record)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn infer_column(cells: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => text.parse::<f64>().ok().map(Some),
        })
        .collect();

    match parsed {
        Some(values) => Column::Numeric(values),
        None => Column::Categorical(cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_columns([
            ("sqft", Column::from(vec![1000.0, 1500.0, 2000.0])),
            ("zone", Column::from(vec!["A", "B", "A"])),
            ("price", Column::from(vec![Some(10.0), None, Some(30.0)])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_creation() {
        let table = sample_table();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_names(), &["sqft", "zone", "price"]);
        assert_eq!(table.numeric_column_names(), vec!["sqft", "price"]);
        assert_eq!(table.categorical_column_names(), vec!["zone"]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = sample_table().with_column("sqft", Column::from(vec![1.0, 2.0, 3.0]));
        assert!(matches!(result, Err(Error::DuplicateColumn(name)) if name == "sqft"));
    }

    #[test]
    fn test_ragged_column_rejected() {
        let result = sample_table().with_column("beds", Column::from(vec![1.0, 2.0]));
        assert!(matches!(result, Err(Error::LengthMismatch { expected: 3, got: 2, .. })));
    }

    #[test]
    fn test_drop_and_select() {
        let table = sample_table();

        let dropped = table.drop(&["zone"]).unwrap();
        assert_eq!(dropped.column_names(), &["sqft", "price"]);

        let selected = table.select(&["price", "sqft"]).unwrap();
        assert_eq!(selected.column_names(), &["price", "sqft"]);

        assert!(matches!(table.drop(&["date"]), Err(Error::ColumnNotFound(_))));
    }

    #[test]
    fn test_filter_and_take_rows() {
        let table = sample_table();

        let filtered = table.filter_rows(&[true, false, true]).unwrap();
        assert_eq!(filtered.n_rows(), 2);
        assert!(!filtered.has_missing());

        let taken = table.take_rows(&[2, 0]);
        assert_eq!(taken.numeric("sqft").unwrap(), &[Some(2000.0), Some(1000.0)]);

        assert!(table.filter_rows(&[true]).is_err());
    }

    #[test]
    fn test_to_matrix_requires_numeric_complete_columns() {
        let table = sample_table();
        assert!(matches!(table.to_matrix(), Err(Error::NotNumeric(_))));

        let numeric = table.select(&["sqft", "price"]).unwrap();
        assert!(matches!(numeric.to_matrix(), Err(Error::MissingValues(_))));

        let complete = numeric.filter_rows(&[true, false, true]).unwrap();
        let matrix = complete.to_matrix().unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert_eq!(matrix[[1, 0]], 2000.0);
    }

    #[test]
    fn test_nan_cells_are_missing() {
        let column = Column::from(vec![1.0, f64::NAN, 3.0]);
        assert_eq!(column, Column::Numeric(vec![Some(1.0), None, Some(3.0)]));
        assert_eq!(column.null_count(), 1);

        // built directly, bypassing the conversions
        let table = Table::from_columns([(
            "sqft",
            Column::Numeric(vec![Some(1.0), Some(f64::NAN)]),
        )])
        .unwrap();
        assert!(table.row_has_missing(1));
        assert!(matches!(table.to_matrix(), Err(Error::MissingValues(_))));
        assert!(matches!(table.to_vector("sqft"), Err(Error::MissingValues(_))));
    }

    #[test]
    fn test_read_csv_infers_types_and_missing() {
        let csv = "price,sqft,date\n221900,1180,20141013T000000\n0,NA,20141209T000000\n538000,2570,\n";
        let table = Table::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.shape(), (3, 3));
        assert!(table.column("price").unwrap().is_numeric());
        assert_eq!(table.numeric("sqft").unwrap()[1], None);
        assert_eq!(table.column("date").unwrap().dtype(), "categorical");
        assert_eq!(table.column("date").unwrap().null_count(), 1);
    }

    #[test]
    fn test_csv_write_then_read() {
        let table = sample_table();
        let mut buffer = Vec::new();
        table.to_csv_writer(&mut buffer).unwrap();

        let restored = Table::from_csv_reader(buffer.as_slice()).unwrap();
        assert_eq!(restored, table);
    }
}
