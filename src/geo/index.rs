use crate::geo::UNKNOWN_NEIGHBORHOOD;
use crate::geo::neighborhoods::{ADJACENT_NEIGHBORHOODS, NEIGHBORHOOD_CENTERS};
use crate::model::Coordinates;
use std::collections::HashMap;
use tracing::debug;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;
pub const DEFAULT_MAX_DISTANCE_MILES: f64 = 5.0;

/// Great-circle distance in miles.
pub fn haversine_miles(a: Coordinates, b: Coordinates) -> f64 {
    let (phi1, phi2) = (a.latitude.to_radians(), b.latitude.to_radians());
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();
    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().atan2((1.0 - h).sqrt())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub center: Coordinates,
}

/// Result of resolving a coordinate to a neighborhood.
#[derive(Debug, Clone, PartialEq)]
pub enum NeighborhoodMatch {
    Known { name: String, distance_miles: f64 },
    /// Nothing within range; `nearest` keeps the closest center for logging.
    Unknown { nearest: Option<(String, f64)> },
}

impl NeighborhoodMatch {
    pub fn name(&self) -> &str {
        match self {
            NeighborhoodMatch::Known { name, .. } => name,
            NeighborhoodMatch::Unknown { .. } => UNKNOWN_NEIGHBORHOOD,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, NeighborhoodMatch::Known { .. })
    }
}

#[derive(Debug, Clone)]
pub struct GeoIndex {
    regions: Vec<Region>,
    adjacency: HashMap<String, Vec<String>>,
    max_distance_miles: f64,
}

impl GeoIndex {
    pub fn new(
        regions: Vec<Region>,
        adjacency: HashMap<String, Vec<String>>,
        max_distance_miles: f64,
    ) -> Self {
        Self {
            regions,
            adjacency,
            max_distance_miles,
        }
    }

    /// Index over the built-in Miami neighborhood table.
    pub fn miami(max_distance_miles: f64) -> Self {
        let regions = NEIGHBORHOOD_CENTERS
            .iter()
            .map(|(name, lat, lng)| Region {
                name: (*name).to_string(),
                center: Coordinates::new(*lat, *lng),
            })
            .collect();
        let adjacency = ADJACENT_NEIGHBORHOODS
            .iter()
            .map(|(name, adjacent)| {
                (
                    (*name).to_string(),
                    adjacent.iter().map(|n| (*n).to_string()).collect(),
                )
            })
            .collect();
        Self::new(regions, adjacency, max_distance_miles)
    }

    pub fn max_distance_miles(&self) -> f64 {
        self.max_distance_miles
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Closest center regardless of the distance cutoff. Strict `<` keeps the first minimum.
    pub fn nearest(&self, point: Coordinates) -> Option<(&Region, f64)> {
        let mut best: Option<(&Region, f64)> = None;
        for region in &self.regions {
            let distance = haversine_miles(point, region.center);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((region, distance)),
            }
        }
        best
    }

    pub fn lookup(&self, point: Coordinates) -> NeighborhoodMatch {
        match self.nearest(point) {
            Some((region, distance)) if distance <= self.max_distance_miles => {
                NeighborhoodMatch::Known {
                    name: region.name.clone(),
                    distance_miles: distance,
                }
            }
            Some((region, distance)) => {
                debug!(
                    "({:.4}, {:.4}) is {:.1} mi from {}, beyond {:.1} mi cutoff",
                    point.latitude, point.longitude, distance, region.name, self.max_distance_miles
                );
                NeighborhoodMatch::Unknown {
                    nearest: Some((region.name.clone(), distance)),
                }
            }
            None => NeighborhoodMatch::Unknown { nearest: None },
        }
    }

    /// Resolves a user-supplied name to the table's spelling, ignoring case and spacing.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        let wanted = region_key(name);
        self.regions
            .iter()
            .find(|region| region_key(&region.name) == wanted)
            .map(|region| region.name.as_str())
    }

    pub fn adjacent(&self, name: &str) -> &[String] {
        self.canonical_name(name)
            .and_then(|canonical| self.adjacency.get(canonical))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::miami(DEFAULT_MAX_DISTANCE_MILES)
    }
}

fn region_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
