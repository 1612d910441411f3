//! Equirectangular distance approximation for the King County region.
//!
//! Accurate to well under a percent over the county's extent, which is all the
//! features need. Not a geodesic distance.

use std::f64::consts::PI;

/// Reference point used for `center_distance`.
pub const CENTER_LAT: f64 = 47.62774;
pub const CENTER_LONG: f64 = -122.24194;

/// Latitude used for the longitude cosine correction of `center_distance`.
/// Intentionally differs from `CENTER_LAT`; existing outputs depend on the pair.
pub const CENTER_COSINE_LAT: f64 = 47.6219;

pub const EARTH_RADIUS_KM: f64 = 6378.0;

const KM_PER_DEGREE: f64 = 2.0 * PI * EARTH_RADIUS_KM / 360.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterOffset {
    pub delta_lat: f64,
    pub delta_long: f64,
    pub distance_km: f64,
}

/// Converts a (cosine-corrected) degree offset into kilometres.
pub fn degrees_to_km(delta_long_corr: f64, delta_lat: f64) -> f64 {
    (delta_long_corr.powi(2) + delta_lat.powi(2)).sqrt() * KM_PER_DEGREE
}

pub fn center_offsets(lat: f64, long: f64) -> CenterOffset {
    let delta_lat = (CENTER_LAT - lat).abs();
    let delta_long = (CENTER_LONG - long).abs();
    let distance_km = degrees_to_km(delta_long * CENTER_COSINE_LAT.to_radians().cos(), delta_lat);
    CenterOffset {
        delta_lat,
        delta_long,
        distance_km,
    }
}

/// Distance in km from `(long, lat)` to a reference location, correcting
/// longitude at the reference latitude.
pub fn distance_km(long: f64, lat: f64, ref_long: f64, ref_lat: f64) -> f64 {
    let delta_long_corr = (long - ref_long) * ref_lat.to_radians().cos();
    degrees_to_km(delta_long_corr, lat - ref_lat)
}

/// Smallest distance to any `(long, lat)` reference; `None` without references.
pub fn nearest_distance_km(long: f64, lat: f64, refs: &[(f64, f64)]) -> Option<f64> {
    refs.iter()
        .map(|&(ref_long, ref_lat)| distance_km(long, lat, ref_long, ref_lat))
        .reduce(f64::min)
}
