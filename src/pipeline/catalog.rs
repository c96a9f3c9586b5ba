use crate::Vector;
use crate::config::{CatalogConfig, FeatureConfig, ModelOptions, PipelineConfig};
use crate::error::{Error, Result};
use crate::evaluation::EvaluationReport;
use crate::linear_model::LinearRegression;
use crate::preprocessing::FittedFeatureProcessor;
use crate::table::Table;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

pub const RAW_DATA: &str = "data";
pub const MODEL_INPUT_TABLE: &str = "model_input_table";
pub const REGRESSOR: &str = "regressor";
pub const METRICS: &str = "metrics";
pub const PARAMS_MODEL_OPTIONS: &str = "params:model_options";
pub const PARAMS_FEATURES: &str = "params:features";

/// A value flowing between pipeline nodes.
#[derive(Clone, Debug)]
pub enum Dataset {
    Table(Table),
    Vector(Vector),
    Model(LinearRegression),
    ModelOptions(ModelOptions),
    Features(FeatureConfig),
    Processor(FittedFeatureProcessor),
    Report(EvaluationReport),
}

impl Dataset {
    pub fn kind(&self) -> &'static str {
        match self {
            Dataset::Table(_) => "table",
            Dataset::Vector(_) => "vector",
            Dataset::Model(_) => "model",
            Dataset::ModelOptions(_) => "model options",
            Dataset::Features(_) => "feature config",
            Dataset::Processor(_) => "feature processor",
            Dataset::Report(_) => "evaluation report",
        }
    }

    fn type_error(&self, expected: &str) -> Error {
        Error::Pipeline(format!("expected a {expected} dataset, found a {}", self.kind()))
    }

    pub fn as_table(&self) -> Result<&Table> {
        match self {
            Dataset::Table(table) => Ok(table),
            other => Err(other.type_error("table")),
        }
    }

    pub fn as_vector(&self) -> Result<&Vector> {
        match self {
            Dataset::Vector(vector) => Ok(vector),
            other => Err(other.type_error("vector")),
        }
    }

    pub fn as_model(&self) -> Result<&LinearRegression> {
        match self {
            Dataset::Model(model) => Ok(model),
            other => Err(other.type_error("model")),
        }
    }

    pub fn as_model_options(&self) -> Result<&ModelOptions> {
        match self {
            Dataset::ModelOptions(options) => Ok(options),
            other => Err(other.type_error("model options")),
        }
    }

    pub fn as_features(&self) -> Result<&FeatureConfig> {
        match self {
            Dataset::Features(features) => Ok(features),
            other => Err(other.type_error("feature config")),
        }
    }

    pub fn as_processor(&self) -> Result<&FittedFeatureProcessor> {
        match self {
            Dataset::Processor(processor) => Ok(processor),
            other => Err(other.type_error("feature processor")),
        }
    }

    pub fn as_report(&self) -> Result<&EvaluationReport> {
        match self {
            Dataset::Report(report) => Ok(report),
            other => Err(other.type_error("evaluation report")),
        }
    }
}

impl From<Table> for Dataset {
    fn from(table: Table) -> Self {
        Dataset::Table(table)
    }
}

impl From<Vector> for Dataset {
    fn from(vector: Vector) -> Self {
        Dataset::Vector(vector)
    }
}

impl From<LinearRegression> for Dataset {
    fn from(model: LinearRegression) -> Self {
        Dataset::Model(model)
    }
}

impl From<ModelOptions> for Dataset {
    fn from(options: ModelOptions) -> Self {
        Dataset::ModelOptions(options)
    }
}

impl From<FeatureConfig> for Dataset {
    fn from(features: FeatureConfig) -> Self {
        Dataset::Features(features)
    }
}

impl From<FittedFeatureProcessor> for Dataset {
    fn from(processor: FittedFeatureProcessor) -> Self {
        Dataset::Processor(processor)
    }
}

impl From<EvaluationReport> for Dataset {
    fn from(report: EvaluationReport) -> Self {
        Dataset::Report(report)
    }
}

/// Named datasets shared by the nodes of a run.
#[derive(Clone, Debug, Default)]
pub struct DataCatalog {
    datasets: BTreeMap<String, Dataset>,
}

impl DataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog holding only the `params:` entries of `config`.
    pub fn with_parameters(config: &PipelineConfig) -> Self {
        let mut catalog = Self::new();
        catalog.save(PARAMS_MODEL_OPTIONS, config.model_options.clone());
        catalog.save(PARAMS_FEATURES, config.features.clone());
        catalog
    }

    /// Parameters plus the raw table read from `config.catalog.raw_data`.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let raw = Table::read_csv(&config.catalog.raw_data)?;
        info!(
            path = %config.catalog.raw_data.display(),
            rows = raw.n_rows(),
            columns = raw.n_cols(),
            "Loaded raw dataset"
        );

        let mut catalog = Self::with_parameters(config);
        catalog.save(RAW_DATA, raw);
        Ok(catalog)
    }

    pub fn save(&mut self, name: impl Into<String>, data: impl Into<Dataset>) {
        self.datasets.insert(name.into(), data.into());
    }

    pub fn load(&self, name: &str) -> Result<&Dataset> {
        self.datasets
            .get(name)
            .ok_or_else(|| Error::Pipeline(format!("dataset '{name}' not found in the catalog")))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    pub fn list(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    /// Writes the model input table, regressor and metrics to the paths
    /// configured for them, skipping entries this run did not produce.
    pub fn persist(&self, config: &CatalogConfig) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if let (Some(path), Some(data)) = (&config.processed_output, self.datasets.get(MODEL_INPUT_TABLE)) {
            ensure_parent(path)?;
            data.as_table()?.write_csv(path)?;
            written.push(path.clone());
        }

        if let (Some(path), Some(data)) = (&config.model_output, self.datasets.get(REGRESSOR)) {
            ensure_parent(path)?;
            data.as_model()?.save_json(path)?;
            written.push(path.clone());
        }

        if let (Some(path), Some(data)) = (&config.metrics_output, self.datasets.get(METRICS)) {
            ensure_parent(path)?;
            data.as_report()?.save_json(path)?;
            written.push(path.clone());
        }

        for path in &written {
            info!(path = %path.display(), "Saved dataset");
        }
        Ok(written)
    }
}

fn ensure_parent(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
