use crate::config::ModelOptions;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::Vector;
use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Features and labels of both partitions, row-aligned.
#[derive(Clone, Debug)]
pub struct SplitData {
    pub x_train: Table,
    pub x_test: Table,
    pub y_train: Vector,
    pub y_test: Vector,
}

/// Shuffles `0..n_rows` with a seeded RNG and returns `(train, test)` indices.
///
/// The test side gets `ceil(test_size * n_rows)` rows. Both sides must end up
/// non-empty.
pub fn partition_indices(n_rows: usize, options: &ModelOptions) -> Result<(Vec<usize>, Vec<usize>)> {
    let test_size = options.test_size;
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::invalid_parameter(
            "test_size",
            test_size,
            "must be between 0 and 1",
        ));
    }

    let n_test = (n_rows as f64 * test_size).ceil() as usize;
    let n_train = n_rows.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(Error::invalid_parameter(
            "test_size",
            test_size,
            format!("leaves an empty partition for {n_rows} rows"),
        ));
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = StdRng::seed_from_u64(options.random_state);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok((train, indices))
}

/// Splits a whole table into `(train, test)` row subsets.
pub fn train_test_split_table(data: &Table, options: &ModelOptions) -> Result<(Table, Table)> {
    let (train_idx, test_idx) = partition_indices(data.n_rows(), options)?;
    Ok((data.take_rows(&train_idx), data.take_rows(&test_idx)))
}

/// Returns the numeric feature columns (everything numeric except `label`)
/// and the label vector.
pub fn separate_features(data: &Table, label: &str) -> Result<(Table, Vector)> {
    let y = data.to_vector(label)?;
    let feature_names: Vec<String> = data
        .numeric_column_names()
        .into_iter()
        .filter(|name| name != label)
        .collect();
    Ok((data.select(&feature_names)?, y))
}

/// Separates numeric features from `label` and partitions the rows.
///
/// The label and every categorical column are left out of the feature tables.
pub fn split_data(data: &Table, options: &ModelOptions, label: &str) -> Result<SplitData> {
    let (x, y) = separate_features(data, label)?;

    let (train_idx, test_idx) = partition_indices(data.n_rows(), options)?;
    info!(
        train_rows = train_idx.len(),
        test_rows = test_idx.len(),
        features = x.n_cols(),
        "Split model input table"
    );

    Ok(SplitData {
        x_train: x.take_rows(&train_idx),
        x_test: x.take_rows(&test_idx),
        y_train: y.select(Axis(0), &train_idx),
        y_test: y.select(Axis(0), &test_idx),
    })
}
