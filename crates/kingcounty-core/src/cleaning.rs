use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::pipeline::TableStep;
use crate::schema::{float_column, require_column};

pub const MIN_BATH_BED_RATIO: f64 = 0.10;
pub const MAX_BATH_BED_RATIO: f64 = 2.0;

/// Undefined ratios (null counts, zero bedrooms) are outliers and dropped.
pub fn filter_bath_bed_ratio(df: &DataFrame) -> Result<DataFrame> {
    let bathrooms = float_column(df, "bathrooms")?;
    let bedrooms = float_column(df, "bedrooms")?;

    let mut ratios = Vec::with_capacity(df.height());
    let mut keep = Vec::with_capacity(df.height());
    for (baths, beds) in bathrooms.into_iter().zip(bedrooms.into_iter()) {
        let ratio = match (baths, beds) {
            (Some(baths), Some(beds)) => Some(baths / beds),
            _ => None,
        };
        keep.push(ratio.is_some_and(is_plausible_ratio));
        ratios.push(ratio);
    }

    let mut output = df.clone();
    output.with_column(Series::new("bath_bed_ratio".into(), ratios))?;

    let mask = BooleanChunked::new("keep".into(), keep.as_slice());
    let filtered = output.filter(&mask)?;

    debug!(
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "bath/bed ratio outlier filter applied"
    );

    Ok(filtered)
}

fn is_plausible_ratio(ratio: f64) -> bool {
    // NaN fails both comparisons, infinities fail the upper one.
    ratio > MIN_BATH_BED_RATIO && ratio < MAX_BATH_BED_RATIO
}

pub fn normalize_basement(df: &DataFrame) -> Result<DataFrame> {
    let living = float_column(df, "sqft_living")?;
    let above = float_column(df, "sqft_above")?;

    let basement: Vec<Option<f64>> = living
        .into_iter()
        .zip(above.into_iter())
        .map(|(living, above)| Some(living? - above?))
        .collect();

    let mut output = df.clone();
    output.with_column(Series::new("sqft_basement".into(), basement))?;
    Ok(output)
}

pub fn fill_view_waterfront(df: &DataFrame) -> Result<DataFrame> {
    let mut output = df.clone();
    for name in ["view", "waterfront"] {
        let filled = fill_missing_with_zero(df, name)?;
        output.with_column(filled)?;
    }
    Ok(output)
}

fn fill_missing_with_zero(df: &DataFrame, name: &str) -> Result<Series> {
    let dtype = match require_column(df, name)?.dtype() {
        DataType::Null => DataType::Float64,
        other => other.clone(),
    };

    let filled: Float64Chunked = float_column(df, name)?
        .into_iter()
        .map(|value| Some(value.filter(|v| !v.is_nan()).unwrap_or(0.0)))
        .collect();

    Ok(filled.with_name(name.into()).into_series().cast(&dtype)?)
}

pub fn consolidate_last_change(df: &DataFrame) -> Result<DataFrame> {
    let renovated = float_column(df, "yr_renovated")?;
    let built = float_column(df, "yr_built")?;

    let last_change: Vec<Option<i64>> = renovated
        .into_iter()
        .zip(built.into_iter())
        .map(|(renovated, built)| match renovated {
            Some(year) if !year.is_nan() && year != 0.0 => Some(year.trunc() as i64),
            _ => built.map(|year| year as i64),
        })
        .collect();

    let mut output = df.clone();
    output.with_column(Series::new("last_known_change".into(), last_change))?;
    output.drop_in_place("yr_renovated")?;
    output.drop_in_place("yr_built")?;
    Ok(output)
}

pub struct BathBedRatioFilter;

impl TableStep for BathBedRatioFilter {
    fn name(&self) -> &'static str {
        "bathroom_bedroom_ratio"
    }

    fn description(&self) -> &'static str {
        "Drop rows whose bathrooms/bedrooms ratio falls outside (0.10, 2.0)"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        filter_bath_bed_ratio(df)
    }
}

pub struct BasementNormalizer;

impl TableStep for BasementNormalizer {
    fn name(&self) -> &'static str {
        "sqft_basement"
    }

    fn description(&self) -> &'static str {
        "Recompute sqft_basement as sqft_living - sqft_above"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        normalize_basement(df)
    }
}

pub struct ViewWaterfrontFiller;

impl TableStep for ViewWaterfrontFiller {
    fn name(&self) -> &'static str {
        "view_and_waterfront"
    }

    fn description(&self) -> &'static str {
        "Fill missing view and waterfront values with 0"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        fill_view_waterfront(df)
    }
}

pub struct LastKnownChange;

impl TableStep for LastKnownChange {
    fn name(&self) -> &'static str {
        "last_known_change"
    }

    fn description(&self) -> &'static str {
        "Replace yr_built/yr_renovated with last_known_change"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        consolidate_last_change(df)
    }
}
