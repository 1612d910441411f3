use polars::prelude::*;

use crate::error::{PreprocessError, Result};

pub const REQUIRED_COLUMNS: [&str; 12] = [
    "price",
    "sqft_living",
    "sqft_lot",
    "sqft_above",
    "bathrooms",
    "bedrooms",
    "lat",
    "long",
    "waterfront",
    "view",
    "yr_built",
    "yr_renovated",
];

pub const NULLABLE_COLUMNS: [&str; 3] = ["waterfront", "view", "yr_renovated"];

pub const BOOLEAN_COLUMNS: [&str; 2] = ["waterfront", "view"];

pub fn validate_input(df: &DataFrame) -> Result<()> {
    for name in REQUIRED_COLUMNS {
        let column = require_column(df, name)?;
        let dtype = column.dtype();
        let accepted = match dtype {
            DataType::Null => NULLABLE_COLUMNS.contains(&name),
            DataType::Boolean => BOOLEAN_COLUMNS.contains(&name),
            other => other.is_integer() || other.is_float(),
        };
        if !accepted {
            return Err(PreprocessError::InvalidColumnType {
                column: name.to_string(),
                dtype: dtype.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| PreprocessError::MissingColumn {
        column: name.to_string(),
    })
}

/// Reads a numeric column as `f64`, whatever its stored width.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = require_column(df, name)?;
    let casted = column.cast(&DataType::Float64)?;
    Ok(casted.f64()?.clone())
}
