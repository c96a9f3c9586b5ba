//! Named-dataset pipelines.
//!
//! A [`Node`] wraps a function with named inputs and outputs, a [`Pipeline`]
//! is a set of nodes, and the [`SequentialRunner`] executes them in
//! dependency order against a [`DataCatalog`].
//!
//! # Examples
//!
//! ```rust
//! use pricepipe::config::PipelineConfig;
//! use pricepipe::datasets::make_housing;
//! use pricepipe::pipeline::{DataCatalog, SequentialRunner, register_pipelines};
//!
//! let config = PipelineConfig::default();
//! let mut catalog = DataCatalog::with_parameters(&config);
//! catalog.save("data", make_housing(50, 3).unwrap());
//!
//! let pipelines = register_pipelines();
//! SequentialRunner::new().run(&pipelines["__default__"], &mut catalog).unwrap();
//!
//! let report = catalog.load("metrics").unwrap().as_report().unwrap();
//! assert!(report.rmse < 1e-6);
//! ```

mod catalog;
mod node;
#[allow(clippy::module_inception)]
mod pipeline;
mod registry;
mod runner;

pub use catalog::{
    DataCatalog, Dataset, METRICS, MODEL_INPUT_TABLE, PARAMS_FEATURES, PARAMS_MODEL_OPTIONS,
    RAW_DATA, REGRESSOR,
};
pub use node::{Node, node};
pub use pipeline::Pipeline;
pub use registry::{
    DEFAULT_PIPELINE, data_cleaning_pipeline, data_science_holdout_pipeline,
    data_science_pipeline, register_pipelines,
};
pub use runner::SequentialRunner;
