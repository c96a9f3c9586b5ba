use pricepipe::cleaning::clean_data;
use pricepipe::config::PipelineConfig;
use pricepipe::datasets::make_housing;
use pricepipe::preprocessing::processing;
use pricepipe::split::split_data;
use pricepipe::{evaluate_model, train_model};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = PipelineConfig::default();

    // Step 1: Generate a raw housing table
    let raw = make_housing(500, 7)?;
    println!("Raw data: {} rows, {} columns", raw.n_rows(), raw.n_cols());

    // Step 2: Drop incomplete rows and zero prices
    let cleaned = clean_data(&raw, &config.features.label)?;

    // Step 3: Drop unused columns, scale numerics, one-hot encode categoricals
    let model_input = processing(&cleaned, &config.features)?;
    println!("Model input columns: {:?}", model_input.column_names());

    // Step 4: Split into train/test
    let split = split_data(&model_input, &config.model_options, &config.features.label)?;
    println!(
        "Train: {} rows, test: {} rows",
        split.x_train.n_rows(),
        split.x_test.n_rows()
    );

    // Step 5: Train linear regression model
    let model = train_model(&split.x_train, &split.y_train)?;

    // Step 6: Evaluate model
    let report = evaluate_model(&model, &split.x_test, &split.y_test)?;
    println!("Results:");
    println!("  Test RMSE: {:.6}", report.rmse);
    println!("  Test MAE: {:.6}", report.mae);
    println!("  Test R² score: {:.4}", report.r2);

    // Step 7: Inspect model parameters
    if let (Some(names), Some(coeffs)) = (model.feature_names(), &model.coefficients) {
        for (name, coef) in names.iter().zip(coeffs.iter()) {
            println!("  {name:<24} {coef:>12.6}");
        }
        println!("  Intercept: {:.6}", model.intercept.unwrap_or(0.0));
    }

    Ok(())
}
