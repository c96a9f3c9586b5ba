use approx::assert_abs_diff_eq;
use pricepipe::config::PipelineConfig;
use pricepipe::datasets::make_housing;
use pricepipe::pipeline::{
    DEFAULT_PIPELINE, DataCatalog, METRICS, MODEL_INPUT_TABLE, RAW_DATA, REGRESSOR,
    SequentialRunner, register_pipelines,
};
use pricepipe::{Error, LinearRegression, Table};
use std::path::PathBuf;

fn sample_csv() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/01_raw/houses.csv")
}

fn run(name: &str, catalog: &mut DataCatalog) -> pricepipe::Result<()> {
    let pipelines = register_pipelines();
    SequentialRunner::new().run(&pipelines[name], catalog)
}

#[test]
fn test_default_pipeline_recovers_linear_price() {
    let config = PipelineConfig::default();
    let mut catalog = DataCatalog::with_parameters(&config);
    catalog.save(RAW_DATA, make_housing(200, 11).unwrap());

    run(DEFAULT_PIPELINE, &mut catalog).unwrap();

    let report = catalog.load(METRICS).unwrap().as_report().unwrap();
    assert_eq!(report.n_samples, 40);
    assert!(report.rmse < 1e-6, "rmse = {}", report.rmse);
    assert_abs_diff_eq!(report.r2, 1.0, epsilon = 1e-6);
}

#[test]
fn test_default_pipeline_on_sample_csv() {
    let config = PipelineConfig {
        catalog: pricepipe::config::CatalogConfig {
            raw_data: sample_csv(),
            ..Default::default()
        },
        ..PipelineConfig::default()
    };
    let mut catalog = DataCatalog::from_config(&config).unwrap();
    assert_eq!(catalog.load(RAW_DATA).unwrap().as_table().unwrap().n_rows(), 40);

    run(DEFAULT_PIPELINE, &mut catalog).unwrap();

    // one zero price and one missing sqft_living are removed
    let cleaned = catalog.load("cleaned_data").unwrap().as_table().unwrap();
    assert_eq!(cleaned.n_rows(), 38);

    let input = catalog.load(MODEL_INPUT_TABLE).unwrap().as_table().unwrap();
    assert_eq!(
        input.column_names(),
        &[
            "price",
            "bedrooms",
            "sqft_living",
            "sqft_lot",
            "floors",
            "waterfront_N",
            "waterfront_Y",
            "condition_average",
            "condition_excellent",
            "condition_good",
        ]
    );
    let price = input.to_vector("price").unwrap();
    assert!(price.iter().all(|p| (0.0..=1.0).contains(p)));

    let x_train = catalog.load("X_train").unwrap().as_table().unwrap();
    let x_test = catalog.load("X_test").unwrap().as_table().unwrap();
    assert_eq!(x_test.n_rows(), 8);
    assert_eq!(x_train.n_rows(), 30);
    assert!(!x_train.contains("price"));
    assert_eq!(x_train.column_names(), x_test.column_names());

    let report = catalog.load(METRICS).unwrap().as_report().unwrap();
    assert!(report.rmse.is_finite());
    assert!(report.rmse >= 0.0);
}

#[test]
fn test_pipeline_is_deterministic() {
    let rmse = |seed| {
        let config = PipelineConfig::default();
        let mut catalog = DataCatalog::with_parameters(&config);
        let mut raw = make_housing(80, seed).unwrap();
        // break the exact fit so the RMSE depends on the split
        let noise: Vec<f64> = (0..80).map(|i| ((i * 37) % 11) as f64 * 1000.0).collect();
        let price: Vec<f64> = raw
            .to_vector("price")
            .unwrap()
            .iter()
            .zip(&noise)
            .map(|(p, n)| p + n)
            .collect();
        raw = raw
            .drop(&["price"])
            .unwrap()
            .with_column("price", price.into())
            .unwrap();
        catalog.save(RAW_DATA, raw);
        run(DEFAULT_PIPELINE, &mut catalog).unwrap();
        catalog.load(METRICS).unwrap().as_report().unwrap().rmse
    };

    assert_eq!(rmse(5), rmse(5));
}

#[test]
fn test_holdout_pipeline_matches_on_exact_data() {
    let config = PipelineConfig::default();
    let mut catalog = DataCatalog::with_parameters(&config);
    catalog.save(RAW_DATA, make_housing(150, 2).unwrap());

    run("data_science_holdout", &mut catalog).unwrap();

    let report = catalog.load(METRICS).unwrap().as_report().unwrap();
    assert_eq!(report.n_samples, 30);
    assert!(report.rmse < 1e-6, "rmse = {}", report.rmse);
}

#[test]
fn test_data_science_alone_needs_cleaned_data() {
    let mut catalog = DataCatalog::with_parameters(&PipelineConfig::default());
    catalog.save(RAW_DATA, make_housing(20, 1).unwrap());

    let result = run("data_science", &mut catalog);
    assert!(matches!(result, Err(Error::Pipeline(msg)) if msg.contains("cleaned_data")));
}

#[test]
fn test_bad_test_size_aborts_run() {
    let mut config = PipelineConfig::default();
    config.model_options.test_size = 1.5;
    let mut catalog = DataCatalog::with_parameters(&config);
    catalog.save(RAW_DATA, make_housing(20, 1).unwrap());

    let result = run(DEFAULT_PIPELINE, &mut catalog);
    assert!(matches!(result, Err(Error::InvalidParameter { .. })));
    assert!(!catalog.exists(METRICS));
}

#[test]
fn test_config_file_run_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let raw_path = dir.path().join("houses.csv");
    make_housing(60, 4).unwrap().write_csv(&raw_path).unwrap();

    let config_path = dir.path().join("parameters.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[model_options]
test_size = 0.25
random_state = 9

[catalog]
raw_data = "{raw}"
processed_output = "{out}/03_primary/model_input_table.csv"
model_output = "{out}/06_models/regressor.json"
metrics_output = "{out}/08_reporting/metrics.json"
"#,
            raw = raw_path.display(),
            out = dir.path().display()
        ),
    )
    .unwrap();

    let config = PipelineConfig::load(Some(&config_path)).unwrap();
    assert_eq!(config.model_options.random_state, 9);

    let mut catalog = DataCatalog::from_config(&config).unwrap();
    run(DEFAULT_PIPELINE, &mut catalog).unwrap();
    let written = catalog.persist(&config.catalog).unwrap();
    assert_eq!(written.len(), 3);

    let processed = Table::read_csv(dir.path().join("03_primary/model_input_table.csv")).unwrap();
    assert_eq!(processed.n_rows(), 60);

    let model = LinearRegression::load_json(dir.path().join("06_models/regressor.json")).unwrap();
    let x_test = catalog.load("X_test").unwrap().as_table().unwrap();
    let expected = catalog
        .load(REGRESSOR)
        .unwrap()
        .as_model()
        .unwrap()
        .predict_table(x_test)
        .unwrap();
    let restored = model.predict_table(x_test).unwrap();
    for (a, b) in expected.iter().zip(restored.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    let metrics = std::fs::read_to_string(dir.path().join("08_reporting/metrics.json")).unwrap();
    assert!(metrics.contains("rmse"));
}
