//! Linear models for regression.
//!
//! `LinearRegression` fits ordinary least squares by solving the normal
//! equations directly, so fitting is deterministic.
//!
//! # Examples
//!
//! ```rust
//! use pricepipe::LinearRegression;
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0]];
//! let y = array![5.0, 7.0, 9.0];
//!
//! let mut model = LinearRegression::new();
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! assert!((predictions[2] - 9.0).abs() < 1e-9);
//! ```

mod linear_regression;

pub use linear_regression::{LinearRegression, LinearRegressionParams, train_model};
