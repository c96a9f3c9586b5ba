use crate::error::Result;
use crate::table::Table;
use tracing::info;

/// Keeps only complete rows whose label is non-zero.
///
/// Fails with [`crate::Error::ColumnNotFound`] when the label column is absent
/// and [`crate::Error::NotNumeric`] when it is categorical.
pub fn clean_data(data: &Table, label: &str) -> Result<Table> {
    let labels = data.numeric(label)?;

    let mask: Vec<bool> = labels
        .iter()
        .enumerate()
        .map(|(row, value)| !data.row_has_missing(row) && *value != Some(0.0))
        .collect();

    let cleaned = data.filter_rows(&mask)?;
    info!(
        rows_in = data.n_rows(),
        rows_out = cleaned.n_rows(),
        "Dropped incomplete and zero-label rows"
    );
    Ok(cleaned)
}
