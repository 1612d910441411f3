use polars::prelude::*;
use tracing::warn;

use crate::error::Result;
use crate::geo;
use crate::pipeline::TableStep;
use crate::schema::float_column;

pub const NON_PREDICTIVE_COLUMNS: [&str; 5] =
    ["sqft_price", "date", "delta_lat", "delta_long", "bath_bed_ratio"];

/// A zero denominator yields a non-finite price; it is kept, not rejected.
pub fn create_sqft_price(df: &DataFrame) -> Result<DataFrame> {
    let price = float_column(df, "price")?;
    let living = float_column(df, "sqft_living")?;
    let lot = float_column(df, "sqft_lot")?;

    let mut non_finite = 0usize;
    let sqft_price: Vec<Option<f64>> = price
        .into_iter()
        .zip(living.into_iter())
        .zip(lot.into_iter())
        .map(|((price, living), lot)| {
            let value = round_to_cents(price? / (living? + lot?));
            if !value.is_finite() {
                non_finite += 1;
            }
            Some(value)
        })
        .collect();

    if non_finite > 0 {
        warn!(rows = non_finite, "sqft_price is not finite for some rows");
    }

    let mut output = df.clone();
    output.with_column(Series::new("sqft_price".into(), sqft_price))?;
    Ok(output)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn create_center_distance(df: &DataFrame) -> Result<DataFrame> {
    let lat = float_column(df, "lat")?;
    let long = float_column(df, "long")?;

    let len = df.height();
    let mut delta_lat = Vec::with_capacity(len);
    let mut delta_long = Vec::with_capacity(len);
    let mut center_distance = Vec::with_capacity(len);

    for (lat, long) in lat.into_iter().zip(long.into_iter()) {
        match (lat, long) {
            (Some(lat), Some(long)) => {
                let offset = geo::center_offsets(lat, long);
                delta_lat.push(Some(offset.delta_lat));
                delta_long.push(Some(offset.delta_long));
                center_distance.push(Some(offset.distance_km));
            }
            _ => {
                delta_lat.push(None);
                delta_long.push(None);
                center_distance.push(None);
            }
        }
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new("delta_lat".into(), delta_lat).into(),
        Series::new("delta_long".into(), delta_long).into(),
        Series::new("center_distance".into(), center_distance).into(),
    ])?;
    Ok(output)
}

/// Adds `water_distance`: km to the nearest row flagged `waterfront == 1`,
/// which is zero for waterfront rows themselves.
pub fn create_water_distance(df: &DataFrame) -> Result<DataFrame> {
    let lat = float_column(df, "lat")?;
    let long = float_column(df, "long")?;
    let waterfront = float_column(df, "waterfront")?;

    let water_points: Vec<(f64, f64)> = waterfront
        .into_iter()
        .zip(long.into_iter().zip(lat.into_iter()))
        .filter_map(|(flag, (long, lat))| match (flag, long, lat) {
            (Some(flag), Some(long), Some(lat)) if flag == 1.0 => Some((long, lat)),
            _ => None,
        })
        .collect();

    if water_points.is_empty() && df.height() > 0 {
        warn!("no waterfront rows present; water_distance left empty");
    }

    let water_distance: Vec<Option<f64>> = long
        .into_iter()
        .zip(lat.into_iter())
        .map(|(long, lat)| geo::nearest_distance_km(long?, lat?, &water_points))
        .collect();

    let mut output = df.clone();
    output.with_column(Series::new("water_distance".into(), water_distance))?;
    Ok(output)
}

pub fn drop_non_predictive(df: &DataFrame) -> Result<DataFrame> {
    let keep: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !NON_PREDICTIVE_COLUMNS.contains(&name.as_str()))
        .cloned()
        .collect();
    Ok(df.select(keep)?)
}

pub struct SqftPriceCreator;

impl TableStep for SqftPriceCreator {
    fn name(&self) -> &'static str {
        "sqft_price"
    }

    fn description(&self) -> &'static str {
        "Price per square foot of living area plus lot"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        create_sqft_price(df)
    }
}

pub struct CenterDistanceCreator;

impl TableStep for CenterDistanceCreator {
    fn name(&self) -> &'static str {
        "center_distance"
    }

    fn description(&self) -> &'static str {
        "Distance in km to the King County reference point"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        create_center_distance(df)
    }
}

pub struct WaterDistanceCreator;

impl TableStep for WaterDistanceCreator {
    fn name(&self) -> &'static str {
        "water_distance"
    }

    fn description(&self) -> &'static str {
        "Distance in km to the nearest waterfront property"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        create_water_distance(df)
    }
}

pub struct DropNonPredictive;

impl TableStep for DropNonPredictive {
    fn name(&self) -> &'static str {
        "no_pred_values"
    }

    fn description(&self) -> &'static str {
        "Drop sqft_price, date, delta_lat, delta_long and bath_bed_ratio"
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        drop_non_predictive(df)
    }
}
