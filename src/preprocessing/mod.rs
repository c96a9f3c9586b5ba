//! Feature processing for the cleaned housing table.
//!
//! This module provides:
//! - `MinMaxScaler`: per-column [0, 1] rescaling of numeric columns
//! - `OneHotEncoder`: indicator columns for categorical columns
//! - `FeatureProcessor`: pruning + scaling + encoding with a separate fit step
//!
//! # Examples
//!
//! ```rust
//! use pricepipe::config::FeatureConfig;
//! use pricepipe::preprocessing::FeatureProcessor;
//! use pricepipe::table::{Column, Table};
//!
//! let table = Table::from_columns([
//!     ("price", Column::from(vec![100.0, 200.0, 300.0])),
//!     ("sqft_living", Column::from(vec![800.0, 1200.0, 1000.0])),
//!     ("waterfront", Column::from(vec!["N", "Y", "N"])),
//! ])
//! .unwrap();
//!
//! let config = FeatureConfig { drop_columns: vec![], ..FeatureConfig::default() };
//! let fitted = FeatureProcessor::new(config).fit(&table).unwrap();
//! let processed = fitted.transform(&table).unwrap();
//!
//! assert_eq!(
//!     processed.column_names(),
//!     &["price", "sqft_living", "waterfront_N", "waterfront_Y"]
//! );
//! ```

mod minmax;
mod one_hot;
mod processing;

pub use minmax::MinMaxScaler;
pub use one_hot::OneHotEncoder;
pub use processing::{
    FeatureProcessor, FittedFeatureProcessor, drop_cols, one_hot_encode, processing, scale,
};
