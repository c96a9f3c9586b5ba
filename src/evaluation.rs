use crate::Vector;
use crate::error::Result;
use crate::linear_model::LinearRegression;
use crate::metrics;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Hold-out scores of a fitted regressor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub n_samples: usize,
}

impl EvaluationReport {
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Scores `regressor` on the test partition and logs its RMSE.
///
/// The test feature columns must match the training columns by name and order,
/// so `regressor` must carry feature names (see [`crate::train_model`]).
pub fn evaluate_model(
    regressor: &LinearRegression,
    x_test: &Table,
    y_test: &Vector,
) -> Result<EvaluationReport> {
    let predicted = regressor.predict_table(x_test)?;

    let report = EvaluationReport {
        rmse: metrics::root_mean_squared_error(y_test, &predicted)?,
        mae: metrics::mean_absolute_error(y_test, &predicted)?,
        r2: metrics::r2_score(y_test, &predicted)?,
        n_samples: y_test.len(),
    };

    info!(
        rmse = report.rmse,
        "Model has RMSE equal to {:.6} on test data.",
        report.rmse
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::linear_model::train_model;
    use crate::table::Column;
    use ndarray::array;

    fn sqft_table(values: Vec<f64>) -> Table {
        Table::from_columns([("sqft", Column::from(values))]).unwrap()
    }

    #[test]
    fn test_exact_relationship_has_zero_rmse() {
        let train_sqft = vec![1.0, 2.0, 4.0, 7.0, 9.0];
        let y_train = Vector::from(train_sqft.iter().map(|s| 2.0 * s + 3.0).collect::<Vec<_>>());
        let regressor = train_model(&sqft_table(train_sqft), &y_train).unwrap();

        let test_sqft = vec![3.0, 5.5, 12.0];
        let y_test = Vector::from(test_sqft.iter().map(|s| 2.0 * s + 3.0).collect::<Vec<_>>());
        let report = evaluate_model(&regressor, &sqft_table(test_sqft), &y_test).unwrap();

        assert!(report.rmse < 1e-9);
        assert!(report.r2 > 0.999_999);
        assert_eq!(report.n_samples, 3);
    }

    #[test]
    fn test_evaluate_rejects_mismatched_features() {
        let regressor = train_model(&sqft_table(vec![1.0, 2.0, 3.0]), &array![1.0, 2.0, 3.0]).unwrap();
        let other = Table::from_columns([("floors", Column::from(vec![1.0, 2.0]))]).unwrap();

        assert!(matches!(
            evaluate_model(&regressor, &other, &array![1.0, 2.0]),
            Err(Error::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_evaluate_rejects_model_without_feature_names() {
        let x = sqft_table(vec![1.0, 2.0, 3.0]);
        let mut regressor = LinearRegression::new();
        regressor.fit(&x.to_matrix().unwrap(), &array![1.0, 2.0, 3.0]).unwrap();

        assert!(matches!(
            evaluate_model(&regressor, &x, &array![1.0, 2.0, 3.0]),
            Err(Error::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_report_json() {
        let report = EvaluationReport {
            rmse: 0.5,
            mae: 0.25,
            r2: 0.75,
            n_samples: 4,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        report.save_json(&path).unwrap();

        let restored: EvaluationReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, report);
    }
}
