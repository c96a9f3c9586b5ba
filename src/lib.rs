pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod cleaning;
pub mod config;
pub mod datasets;
pub mod error;
pub mod evaluation;
pub mod linear_model;
pub mod metrics;
pub mod pipeline;
pub mod preprocessing;
pub mod schema;
pub mod split;
pub mod table;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use evaluation::{EvaluationReport, evaluate_model};
pub use linear_model::{LinearRegression, train_model};
pub use table::{Column, Table};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_types_work() {
        let vec = Vector::zeros(5);
        let mat = Matrix::zeros((3, 4));
        assert_eq!(vec.len(), 5);
        assert_eq!(mat.shape(), &[3, 4]);
    }
}
