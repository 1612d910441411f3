// crates/kingcounty-core/src/error.rs

use polars::prelude::DataType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}' has unsupported type {dtype}; expected a numeric column")]
    InvalidColumnType { column: String, dtype: DataType },

    #[error("step '{step}' failed: {source}")]
    Step {
        step: &'static str,
        #[source]
        source: Box<PreprocessError>,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl PreprocessError {
    /// True for the schema family: a column is absent or not numeric.
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::MissingColumn { .. } | Self::InvalidColumnType { .. } => true,
            Self::Step { source, .. } => source.is_schema_error(),
            Self::Polars(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
