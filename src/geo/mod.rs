// Geo module: neighborhood table and nearest-center lookup.

pub mod index;
pub mod neighborhoods;

pub use index::{GeoIndex, NeighborhoodMatch, Region, haversine_miles};

/// Neighborhood name used when no center is close enough.
pub const UNKNOWN_NEIGHBORHOOD: &str = "Unknown";
