use super::{MinMaxScaler, OneHotEncoder};
use crate::config::FeatureConfig;
use crate::error::Result;
use crate::schema::{ColumnRole, Schema};
use crate::table::Table;
use tracing::debug;

pub fn drop_cols<S: AsRef<str>>(data: &Table, columns: &[S]) -> Result<Table> {
    data.drop(columns)
}

/// Min-max scales `num_cols`, fitting on `data` itself.
pub fn scale<S: AsRef<str>>(data: &Table, num_cols: &[S]) -> Result<Table> {
    MinMaxScaler::new().fit_transform(data, num_cols)
}

/// One-hot encodes `cat_cols`, fitting on `data` itself.
pub fn one_hot_encode<S: AsRef<str>>(data: &Table, cat_cols: &[S]) -> Result<Table> {
    OneHotEncoder::new().fit_transform(data, cat_cols)
}

/// Prunes, scales and encodes `data` with statistics fitted on `data`.
///
/// Use [`FeatureProcessor::fit`] on a training partition and
/// [`FittedFeatureProcessor::transform`] on both partitions to keep test
/// rows out of the scaling and encoding statistics.
pub fn processing(data: &Table, features: &FeatureConfig) -> Result<Table> {
    FeatureProcessor::new(features.clone()).fit(data)?.transform(data)
}

#[derive(Clone, Debug, Default)]
pub struct FeatureProcessor {
    config: FeatureConfig,
}

impl FeatureProcessor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    pub fn fit(&self, data: &Table) -> Result<FittedFeatureProcessor> {
        let pruned = drop_cols(data, &self.config.drop_columns)?;
        let schema = Schema::infer(data, &self.config);

        let mut num_cols = Vec::new();
        let mut cat_cols = Vec::new();
        for (name, column) in pruned.columns() {
            match schema.role(name) {
                Some(ColumnRole::Numeric) => num_cols.push(name.to_string()),
                Some(ColumnRole::Categorical) => cat_cols.push(name.to_string()),
                Some(ColumnRole::Label) if self.config.scale_label && column.is_numeric() => {
                    num_cols.push(name.to_string())
                }
                _ => {}
            }
        }

        let mut scaler = MinMaxScaler::new();
        scaler.fit(&pruned, &num_cols)?;

        let mut encoder = OneHotEncoder::new();
        encoder.fit(&pruned, &cat_cols)?;

        debug!(
            numeric = ?num_cols,
            categorical = ?cat_cols,
            "Fitted feature processor"
        );

        Ok(FittedFeatureProcessor {
            drop_columns: self.config.drop_columns.clone(),
            schema,
            scaler,
            encoder,
        })
    }
}

#[derive(Clone, Debug)]
pub struct FittedFeatureProcessor {
    drop_columns: Vec<String>,
    schema: Schema,
    scaler: MinMaxScaler,
    encoder: OneHotEncoder,
}

impl FittedFeatureProcessor {
    pub fn transform(&self, data: &Table) -> Result<Table> {
        let pruned = drop_cols(data, &self.drop_columns)?;
        let scaled = self.scaler.transform(&pruned)?;
        let encoded = self.encoder.transform(&scaled)?;

        debug!(
            rows = encoded.n_rows(),
            columns = encoded.n_cols(),
            "Processed feature table"
        );
        Ok(encoded)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }
}
