//! The project's pipelines and the node functions that adapt the pure stage
//! functions to catalog datasets.

use super::catalog::{
    Dataset, METRICS, MODEL_INPUT_TABLE, PARAMS_FEATURES, PARAMS_MODEL_OPTIONS, RAW_DATA,
    REGRESSOR,
};
use super::node::node;
use super::pipeline::Pipeline;
use crate::cleaning::clean_data;
use crate::error::Result;
use crate::evaluation::evaluate_model;
use crate::linear_model::train_model;
use crate::preprocessing::{FeatureProcessor, processing};
use crate::split::{separate_features, split_data, train_test_split_table};
use std::collections::BTreeMap;

pub const DEFAULT_PIPELINE: &str = "__default__";

fn clean_data_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let features = inputs[1].as_features()?;
    Ok(vec![clean_data(inputs[0].as_table()?, &features.label)?.into()])
}

fn process_data_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    Ok(vec![processing(inputs[0].as_table()?, inputs[1].as_features()?)?.into()])
}

fn split_data_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let features = inputs[2].as_features()?;
    let split = split_data(inputs[0].as_table()?, inputs[1].as_model_options()?, &features.label)?;
    Ok(vec![
        split.x_train.into(),
        split.x_test.into(),
        split.y_train.into(),
        split.y_test.into(),
    ])
}

fn train_model_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    Ok(vec![train_model(inputs[0].as_table()?, inputs[1].as_vector()?)?.into()])
}

fn evaluate_model_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let report = evaluate_model(
        inputs[0].as_model()?,
        inputs[1].as_table()?,
        inputs[2].as_vector()?,
    )?;
    Ok(vec![report.into()])
}

fn split_table_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let (train, test) = train_test_split_table(inputs[0].as_table()?, inputs[1].as_model_options()?)?;
    Ok(vec![train.into(), test.into()])
}

fn fit_processor_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let processor = FeatureProcessor::new(inputs[1].as_features()?.clone());
    Ok(vec![processor.fit(inputs[0].as_table()?)?.into()])
}

fn transform_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    Ok(vec![inputs[0].as_processor()?.transform(inputs[1].as_table()?)?.into()])
}

fn separate_features_node(inputs: &[&Dataset]) -> Result<Vec<Dataset>> {
    let features = inputs[1].as_features()?;
    let (x, y) = separate_features(inputs[0].as_table()?, &features.label)?;
    Ok(vec![x.into(), y.into()])
}

/// `data` → `cleaned_data`
pub fn data_cleaning_pipeline() -> Pipeline {
    Pipeline::new(vec![node(
        clean_data_node,
        &[RAW_DATA, PARAMS_FEATURES],
        &["cleaned_data"],
        "clean_data_node",
    )])
}

/// `cleaned_data` → `model_input_table` → split → `regressor` → `metrics`.
///
/// Scaling and encoding statistics are fitted on all cleaned rows before the
/// split.
pub fn data_science_pipeline() -> Pipeline {
    Pipeline::new(vec![
        node(
            process_data_node,
            &["cleaned_data", PARAMS_FEATURES],
            &[MODEL_INPUT_TABLE],
            "process_data_node",
        ),
        node(
            split_data_node,
            &[MODEL_INPUT_TABLE, PARAMS_MODEL_OPTIONS, PARAMS_FEATURES],
            &["X_train", "X_test", "y_train", "y_test"],
            "split_data_node",
        ),
        node(train_model_node, &["X_train", "y_train"], &[REGRESSOR], "train_model_node"),
        node(
            evaluate_model_node,
            &[REGRESSOR, "X_test", "y_test"],
            &[METRICS],
            "evaluate_model_node",
        ),
    ])
}

/// Like [`data_science_pipeline`], but splits the cleaned rows first and fits
/// the feature processor on the training rows only.
pub fn data_science_holdout_pipeline() -> Pipeline {
    Pipeline::new(vec![
        node(
            split_table_node,
            &["cleaned_data", PARAMS_MODEL_OPTIONS],
            &["train_table", "test_table"],
            "split_table_node",
        ),
        node(
            fit_processor_node,
            &["train_table", PARAMS_FEATURES],
            &["feature_processor"],
            "fit_processor_node",
        ),
        node(
            transform_node,
            &["feature_processor", "train_table"],
            &["train_input_table"],
            "transform_train_node",
        ),
        node(
            transform_node,
            &["feature_processor", "test_table"],
            &["test_input_table"],
            "transform_test_node",
        ),
        node(
            separate_features_node,
            &["train_input_table", PARAMS_FEATURES],
            &["X_train", "y_train"],
            "separate_train_node",
        ),
        node(
            separate_features_node,
            &["test_input_table", PARAMS_FEATURES],
            &["X_test", "y_test"],
            "separate_test_node",
        ),
        node(train_model_node, &["X_train", "y_train"], &[REGRESSOR], "train_model_node"),
        node(
            evaluate_model_node,
            &[REGRESSOR, "X_test", "y_test"],
            &[METRICS],
            "evaluate_model_node",
        ),
    ])
}

/// All named pipelines. `__default__` is cleaning followed by data science.
pub fn register_pipelines() -> BTreeMap<String, Pipeline> {
    let data_cleaning = data_cleaning_pipeline();
    let data_science = data_science_pipeline();

    BTreeMap::from([
        (DEFAULT_PIPELINE.to_string(), data_cleaning.clone() + data_science.clone()),
        ("data_cleaning".to_string(), data_cleaning.clone()),
        ("data_science".to_string(), data_science),
        (
            "data_science_holdout".to_string(),
            data_cleaning + data_science_holdout_pipeline(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::datasets::make_housing;
    use crate::pipeline::{DataCatalog, SequentialRunner};

    #[test]
    fn test_registered_pipelines_are_valid() {
        let pipelines = register_pipelines();
        assert_eq!(
            pipelines.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["__default__", "data_cleaning", "data_science", "data_science_holdout"]
        );

        for (name, pipeline) in &pipelines {
            assert!(pipeline.validate().is_ok(), "{name}");
            assert!(pipeline.toposort().is_ok(), "{name}");
        }
    }

    #[test]
    fn test_default_pipeline_inputs_and_outputs() {
        let pipelines = register_pipelines();
        let pipeline = &pipelines[DEFAULT_PIPELINE];

        let inputs: Vec<String> = pipeline.inputs().into_iter().collect();
        assert_eq!(inputs, vec![RAW_DATA, PARAMS_FEATURES, PARAMS_MODEL_OPTIONS]);
        assert_eq!(pipeline.outputs().into_iter().collect::<Vec<_>>(), vec![METRICS]);
    }

    #[test]
    fn test_holdout_pipeline_runs() {
        let config = PipelineConfig::default();
        let mut catalog = DataCatalog::with_parameters(&config);
        catalog.save(RAW_DATA, make_housing(60, 1).unwrap());

        let pipelines = register_pipelines();
        SequentialRunner::new().run(&pipelines["data_science_holdout"], &mut catalog).unwrap();

        let report = catalog.load(METRICS).unwrap().as_report().unwrap();
        assert!(report.rmse < 1e-6, "rmse = {}", report.rmse);
        assert!(catalog.exists("feature_processor"));
        assert!(!catalog.exists(MODEL_INPUT_TABLE));
    }
}
