use std::fmt::Debug;
use std::str::FromStr;

use rustc_hash::FxHashMap;

use crate::errors::{Result, RoadGraphError};


/// Road type used for unknown tags
pub const UNCLASSIFIED: &str = "unclassified";

/// Speed (km/h) used when even `unclassified` is missing from the table
pub const UNCLASSIFIED_SPEED: f64 = 50.0;

const DEFAULT_LIMITS: [(&str, f64); 13] = [
    ("motorway", 180.0),
    ("trunk", 120.0),
    ("primary", 90.0),
    ("secondary", 70.0),
    ("tertiary", 70.0),
    (UNCLASSIFIED, UNCLASSIFIED_SPEED),
    ("residential", 40.0),
    ("motorway_link", 50.0),
    ("trunk_link", 50.0),
    ("primary_link", 50.0),
    ("secondary_link", 50.0),
    ("tertiary_link", 50.0),
    ("living_street", 40.0),
];


/// Maps a raw edge length to the cost used by weighted searches
/// Implementations must be pure: same input, same cost
pub trait EdgeWeightPolicy: Debug + Send + Sync {
    fn cost(&self, length: f64, road_type: &str) -> f64;
}


/// Cost is the length itself (kilometers)
#[derive(Clone, Copy, Debug, Default)]
pub struct LengthPolicy;

impl EdgeWeightPolicy for LengthPolicy {
    fn cost(&self, length: f64, _road_type: &str) -> f64 {
        length
    }
}


/// Cost is the travel time in minutes at the road type's speed limit
#[derive(Clone, Debug, Default)]
pub struct DurationPolicy {
    limits: SpeedLimits,
}

impl DurationPolicy {
    pub fn new(limits: SpeedLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &SpeedLimits {
        &self.limits
    }
}

impl EdgeWeightPolicy for DurationPolicy {
    fn cost(&self, length: f64, road_type: &str) -> f64 {
        length * 60.0 / self.limits.limit(road_type)
    }
}


/// Road type -> speed limit (km/h) table
/// Lookups ignore case; unknown types fall back to `unclassified`
#[derive(Clone, Debug)]
pub struct SpeedLimits {
    limits: FxHashMap<String, f64>,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        let limits = DEFAULT_LIMITS
            .iter()
            .map(|&(road_type, speed)| (road_type.to_string(), speed))
            .collect();
        Self { limits }
    }
}

impl SpeedLimits {

    /// Table with no entries, every road type gets the unclassified speed
    pub fn empty() -> Self {
        Self { limits: FxHashMap::default() }
    }

    /// Set (or replace) the limit for a road type
    pub fn with_limit(mut self, road_type: &str, speed: f64) -> Result<Self> {
        self.set_limit(road_type, speed)?;
        Ok(self)
    }

    /// Apply a list of overrides on top of this table
    pub fn with_overrides<'a, I>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a SpeedOverride>,
    {
        for o in overrides {
            self.set_limit(&o.road_type, o.speed)?;
        }
        Ok(self)
    }

    pub fn set_limit(&mut self, road_type: &str, speed: f64) -> Result<()> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(RoadGraphError::invalid(format!(
                "speed limit for `{road_type}` must be positive, got {speed}"
            )));
        }
        self.limits.insert(road_type.to_lowercase(), speed);
        Ok(())
    }

    /// Speed limit for a road type
    pub fn limit(&self, road_type: &str) -> f64 {
        self.limits
            .get(&road_type.to_lowercase())
            .or_else(|| self.limits.get(UNCLASSIFIED))
            .copied()
            .unwrap_or(UNCLASSIFIED_SPEED)
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}


/// A single `road_type=speed` override, as given on the command line
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedOverride {
    pub road_type: String,
    pub speed: f64,
}

impl FromStr for SpeedOverride {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (road_type, speed) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `road_type=speed`, got `{s}`"))?;
        let road_type = road_type.trim();
        if road_type.is_empty() {
            return Err(format!("missing road type in `{s}`"));
        }
        let speed = speed
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad speed in `{s}`: {e}"))?;
        Ok(Self { road_type: road_type.to_string(), speed })
    }
}
