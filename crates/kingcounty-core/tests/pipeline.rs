use anyhow::Result;
use kingcounty_core::geo::{distance_km, CENTER_LAT, CENTER_LONG};
use kingcounty_core::pipeline::step_descriptors;
use kingcounty_core::{PreprocessError, Preprocessor};
use polars::prelude::*;

fn sales() -> DataFrame {
    df!(
        "id" => &[7129300520i64, 6414100192, 5631500400, 2487200875, 1954400510, 7237550310],
        "date" => &["10/13/2014", "12/9/2014", "2/25/2015", "12/9/2014", "2/18/2015", "5/12/2014"],
        "price" => &[221900.0f64, 538000.0, 180000.0, 604000.0, 510000.0, 1230000.0],
        "bedrooms" => &[3i64, 3, 10, 4, 3, 4],
        "bathrooms" => &[1.0f64, 2.25, 1.0, 3.0, 2.0, 4.5],
        "sqft_living" => &[1180i64, 2570, 770, 1960, 1680, 5420],
        "sqft_lot" => &[5650i64, 7242, 10000, 5000, 8080, 101930],
        "floors" => &[1.0f64, 2.0, 1.0, 1.0, 1.0, 1.0],
        "waterfront" => &[None, Some(0.0f64), Some(0.0), Some(1.0), Some(0.0), Some(0.0)],
        "view" => &[Some(0.0f64), Some(0.0), None, Some(0.0), Some(0.0), Some(0.0)],
        "sqft_above" => &[1180i64, 2170, 770, 1050, 1680, 3890],
        "sqft_basement" => &["0.0", "400.0", "0.0", "?", "0.0", "1530.0"],
        "yr_built" => &[1955i64, 1951, 1933, 1965, 1987, 2001],
        "yr_renovated" => &[Some(0.0f64), Some(1991.0), None, Some(0.0), Some(0.0), Some(0.0)],
        "lat" => &[47.5112f64, 47.7210, 47.7379, 47.5208, 47.6168, 47.6561],
        "long" => &[-122.257f64, -122.319, -122.233, -122.393, -122.045, -122.005],
    )
    .unwrap()
}

fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn fit_transform_produces_final_schema() -> Result<()> {
    let output = Preprocessor::new().fit_transform(&sales())?;

    assert_eq!(
        column_names(&output),
        vec![
            "id",
            "price",
            "bedrooms",
            "bathrooms",
            "sqft_living",
            "sqft_lot",
            "floors",
            "waterfront",
            "view",
            "sqft_above",
            "sqft_basement",
            "lat",
            "long",
            "last_known_change",
            "center_distance",
            "water_distance",
        ]
    );

    // Row 3 (1 bath / 10 beds) sits on the lower bound and is removed.
    let ids: Vec<Option<i64>> = output.column("id")?.i64()?.into_iter().collect();
    assert_eq!(
        ids,
        vec![
            Some(7129300520),
            Some(6414100192),
            Some(2487200875),
            Some(1954400510),
            Some(7237550310)
        ]
    );

    Ok(())
}

#[test]
fn surviving_rows_satisfy_cleaning_invariants() -> Result<()> {
    let output = Preprocessor::new().transform(&sales())?;

    let baths = output.column("bathrooms")?.f64()?;
    let beds = output.column("bedrooms")?.cast(&DataType::Float64)?;
    let beds = beds.f64()?;
    for (baths, beds) in baths.into_iter().zip(beds.into_iter()) {
        let ratio = baths.unwrap() / beds.unwrap();
        assert!(ratio > 0.10 && ratio < 2.0);
    }

    let living = output.column("sqft_living")?.cast(&DataType::Float64)?;
    let above = output.column("sqft_above")?.cast(&DataType::Float64)?;
    let basement = output.column("sqft_basement")?.f64()?.clone();
    for ((living, above), basement) in living
        .f64()?
        .into_iter()
        .zip(above.f64()?.into_iter())
        .zip(basement.into_iter())
    {
        assert_eq!(basement, Some(living.unwrap() - above.unwrap()));
    }

    let change: Vec<Option<i64>> = output
        .column("last_known_change")?
        .i64()?
        .into_iter()
        .collect();
    assert_eq!(
        change,
        vec![Some(1955), Some(1991), Some(1965), Some(1987), Some(2001)]
    );

    assert_eq!(output.column("waterfront")?.null_count(), 0);
    assert_eq!(output.column("view")?.null_count(), 0);

    Ok(())
}

#[test]
fn distances_follow_waterfront_and_reference_point() -> Result<()> {
    let output = Preprocessor::new().transform(&sales())?;

    let water = output.column("water_distance")?.f64()?;
    let lat = output.column("lat")?.f64()?;
    let long = output.column("long")?.f64()?;

    // The only waterfront row is id 2487200875 (third surviving row).
    assert_eq!(water.get(2), Some(0.0));
    for idx in 0..output.height() {
        let expected = distance_km(long.get(idx).unwrap(), lat.get(idx).unwrap(), -122.393, 47.5208);
        assert!((water.get(idx).unwrap() - expected).abs() < 1e-12);
    }

    let center = output.column("center_distance")?.f64()?;
    assert!(center.into_iter().flatten().all(|d| d > 0.0));

    Ok(())
}

#[test]
fn reference_point_row_has_zero_center_distance() -> Result<()> {
    let mut df = sales();
    df.with_column(Series::new(
        "lat".into(),
        vec![CENTER_LAT, 47.7210, 47.7379, 47.5208, 47.6168, 47.6561],
    ))?;
    df.with_column(Series::new(
        "long".into(),
        vec![CENTER_LONG, -122.319, -122.233, -122.393, -122.045, -122.005],
    ))?;

    let output = Preprocessor::new().transform(&df)?;
    assert_eq!(output.column("center_distance")?.f64()?.get(0), Some(0.0));

    Ok(())
}

#[test]
fn transform_and_fit_transform_agree() -> Result<()> {
    let preprocessor = Preprocessor::new();
    let a = preprocessor.transform(&sales())?;
    let b = preprocessor.fit(&sales())?.transform(&sales())?;
    let c = preprocessor.fit_transform(&sales())?;

    assert!(a.equals_missing(&b));
    assert!(a.equals_missing(&c));

    Ok(())
}

#[test]
fn running_twice_fails_schema_check() -> Result<()> {
    let preprocessor = Preprocessor::new();
    let once = preprocessor.transform(&sales())?;

    let err = preprocessor.transform(&once).unwrap_err();
    assert!(err.is_schema_error());
    assert!(matches!(
        err,
        PreprocessError::MissingColumn { ref column } if column == "yr_built"
    ));

    Ok(())
}

#[test]
fn missing_required_column_fails_before_any_step() -> Result<()> {
    let df = sales().drop("lat")?;

    let err = Preprocessor::new().transform(&df).unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::MissingColumn { ref column } if column == "lat"
    ));

    Ok(())
}

#[test]
fn non_numeric_required_column_is_rejected() -> Result<()> {
    let mut df = sales();
    df.with_column(Series::new(
        "price".into(),
        vec!["a", "b", "c", "d", "e", "f"],
    ))?;

    let err = Preprocessor::new().transform(&df).unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::InvalidColumnType { ref column, .. } if column == "price"
    ));

    Ok(())
}

#[test]
fn boolean_is_only_accepted_for_flag_columns() -> Result<()> {
    let mut df = sales();
    df.with_column(Series::new(
        "waterfront".into(),
        vec![false, false, false, true, false, false],
    ))?;

    let output = Preprocessor::new().transform(&df)?;
    let water = output.column("water_distance")?.f64()?;
    assert_eq!(water.get(2), Some(0.0));

    df.with_column(Series::new(
        "lat".into(),
        vec![true, true, false, true, false, true],
    ))?;
    let err = Preprocessor::new().transform(&df).unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::InvalidColumnType { ref column, .. } if column == "lat"
    ));

    Ok(())
}

#[test]
fn all_missing_view_column_is_accepted() -> Result<()> {
    let mut df = sales();
    df.with_column(Series::full_null("view".into(), 6, &DataType::Null))?;

    let output = Preprocessor::new().transform(&df)?;
    let view = output.column("view")?.f64()?;
    assert!(view.into_iter().all(|v| v == Some(0.0)));

    Ok(())
}

#[test]
fn registry_lists_eight_steps_in_order() {
    let steps: Vec<(&str, &str)> = step_descriptors()
        .iter()
        .map(|d| (d.stage, d.step))
        .collect();

    assert_eq!(
        steps,
        vec![
            ("data_cleaning", "bathroom_bedroom_ratio"),
            ("data_cleaning", "sqft_basement"),
            ("data_cleaning", "view_and_waterfront"),
            ("data_cleaning", "last_known_change"),
            ("feature_engineering", "sqft_price"),
            ("feature_engineering", "center_distance"),
            ("feature_engineering", "water_distance"),
            ("feature_engineering", "no_pred_values"),
        ]
    );
}
