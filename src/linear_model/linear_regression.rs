use crate::error::{Error, Result};
use crate::table::Table;
use crate::{Matrix, Vector};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Pivots of the unit-diagonal system smaller than this are treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-10;

#[derive(Clone, Debug)]
pub struct LinearRegression {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    feature_names: Option<Vec<String>>,
    fit_intercept: bool,
}

/// Serializable form of a fitted [`LinearRegression`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionParams {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            feature_names: None,
            fit_intercept: true,
        }
    }

    pub fn with_intercept(fit_intercept: bool) -> Self {
        Self {
            fit_intercept,
            ..Self::new()
        }
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} labels", x.nrows()),
                actual: format!("{} labels", y.len()),
            });
        }

        if x.nrows() == 0 {
            return Err(Error::EmptyData("X must have at least one sample".to_string()));
        }

        let (coeffs, intercept) = if self.fit_intercept {
            self.fit_with_intercept(x, y)?
        } else {
            (self.solve_normal_equation(x, y)?, 0.0)
        };

        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        self.feature_names = None;
        Ok(())
    }

    /// Fits on a numeric feature table and remembers its column order.
    pub fn fit_table(&mut self, x: &Table, y: &Vector) -> Result<()> {
        self.fit(&x.to_matrix()?, y)?;
        self.feature_names = Some(x.column_names().to_vec());
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        let coeffs = self
            .coefficients
            .as_ref()
            .ok_or(Error::NotFitted("LinearRegression"))?;
        let intercept = self.intercept.unwrap_or(0.0);

        if x.ncols() != coeffs.len() {
            return Err(Error::ShapeMismatch {
                expected: format!("{} features", coeffs.len()),
                actual: format!("{} features", x.ncols()),
            });
        }

        Ok(x.dot(coeffs) + intercept)
    }

    /// Predicts from a feature table whose columns must match the training
    /// columns by name and order.
    ///
    /// A model fitted on a bare matrix has no feature names, so every table is
    /// a [`Error::FeatureMismatch`] for it; use [`LinearRegression::predict`].
    pub fn predict_table(&self, x: &Table) -> Result<Vector> {
        if self.coefficients.is_none() {
            return Err(Error::NotFitted("LinearRegression"));
        }

        let expected = self.feature_names.as_deref().unwrap_or_default();
        if expected != x.column_names() {
            return Err(Error::FeatureMismatch {
                expected: expected.to_vec(),
                actual: x.column_names().to_vec(),
            });
        }

        self.predict(&x.to_matrix()?)
    }

    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let y_pred = self.predict(x)?;
        crate::metrics::r2_score(y, &y_pred)
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn to_params(&self) -> Result<LinearRegressionParams> {
        let coeffs = self
            .coefficients
            .as_ref()
            .ok_or(Error::NotFitted("LinearRegression"))?;

        Ok(LinearRegressionParams {
            feature_names: self.feature_names.clone().unwrap_or_default(),
            coefficients: coeffs.to_vec(),
            intercept: self.intercept.unwrap_or(0.0),
        })
    }

    pub fn from_params(params: LinearRegressionParams) -> Self {
        Self {
            coefficients: Some(Vector::from(params.coefficients)),
            intercept: Some(params.intercept),
            feature_names: (!params.feature_names.is_empty()).then_some(params.feature_names),
            fit_intercept: true,
        }
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_params()?)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_params(serde_json::from_str(&json)?))
    }

    fn fit_with_intercept(&self, x: &Matrix, y: &Vector) -> Result<(Vector, f64)> {
        let y_mean = y.mean().ok_or_else(|| Error::EmptyData("y".to_string()))?;
        let x_means = x
            .mean_axis(ndarray::Axis(0))
            .ok_or_else(|| Error::EmptyData("X".to_string()))?;

        let mut x_centered = x.clone();
        for mut row in x_centered.axis_iter_mut(ndarray::Axis(0)) {
            row -= &x_means;
        }

        let y_centered = y - y_mean;

        let coeffs = self.solve_normal_equation(&x_centered, &y_centered)?;
        let intercept = y_mean - coeffs.dot(&x_means);

        Ok((coeffs, intercept))
    }

    fn solve_normal_equation(&self, x: &Matrix, y: &Vector) -> Result<Vector> {
        let xt = x.t();
        solve_least_squares_system(&xt.dot(x), &xt.dot(y))
    }
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

/// Solves the normal equations `a · w = b` by Gaussian elimination with
/// partial pivoting.
///
/// The system is first rescaled to a unit diagonal so the pivot cutoff is
/// relative to each column's own spread. Normal equations are always
/// consistent, so a column without a usable pivot (collinear features, e.g. a
/// full set of one-hot indicators) is a free variable and is fixed to zero.
/// The result is still a least-squares solution.
fn solve_least_squares_system(a: &Matrix, b: &Vector) -> Result<Vector> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return Err(Error::ShapeMismatch {
            expected: format!("square system of size {n}"),
            actual: format!("{:?} with rhs {}", a.shape(), b.len()),
        });
    }

    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Singular);
    }

    // zero-variance columns get a zero scale and never yield a pivot
    let scale: Vector = (0..n)
        .map(|i| {
            let d = a[(i, i)];
            if d > 0.0 { 1.0 / d.sqrt() } else { 0.0 }
        })
        .collect();

    let mut aug = Matrix::zeros((n, n + 1));
    for i in 0..n {
        for j in 0..n {
            aug[(i, j)] = a[(i, j)] * scale[i] * scale[j];
        }
        aug[(i, n)] = b[i] * scale[i];
    }

    let mut pivots = Vec::with_capacity(n);
    let mut row = 0;
    for col in 0..n {
        if row == n {
            break;
        }

        let mut max_row = row;
        for k in (row + 1)..n {
            if aug[(k, col)].abs() > aug[(max_row, col)].abs() {
                max_row = k;
            }
        }

        if aug[(max_row, col)].abs() <= PIVOT_TOLERANCE {
            continue;
        }

        if max_row != row {
            for j in 0..=n {
                aug.swap((row, j), (max_row, j));
            }
        }

        for k in (row + 1)..n {
            let factor = aug[(k, col)] / aug[(row, col)];
            for j in col..=n {
                aug[(k, j)] -= factor * aug[(row, j)];
            }
        }

        pivots.push(col);
        row += 1;
    }

    let mut w = Vector::zeros(n);
    for (r, &col) in pivots.iter().enumerate().rev() {
        let mut value = aug[(r, n)];
        for j in (col + 1)..n {
            value -= aug[(r, j)] * w[j];
        }
        w[col] = value / aug[(r, col)];
    }
    let w = w * &scale;

    if w.iter().any(|v| !v.is_finite()) {
        return Err(Error::Singular);
    }

    Ok(w)
}

/// Fits ordinary least squares on the training partition.
pub fn train_model(x_train: &Table, y_train: &Vector) -> Result<LinearRegression> {
    let mut regressor = LinearRegression::new();
    regressor.fit_table(x_train, y_train)?;

    info!(
        rows = x_train.n_rows(),
        features = x_train.n_cols(),
        intercept = regressor.intercept.unwrap_or(0.0),
        "Trained linear regression"
    );
    Ok(regressor)
}
