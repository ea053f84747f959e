use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_traits::Float;


/// Euclidean distance
pub fn euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}

/// Squared Euclidean distance
pub fn squared_euclidean<T>(x1: T, y1: T, x2: T, y2: T) -> T
where
    T: Float,
    {
    (x1 - x2).powi(2) + (y1 - y2).powi(2)
}


/// 2D Coordinate of an intersection
/// Equality and hashing are by exact value, so a coordinate is also the
/// public identity of a vertex
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in the plane
    pub fn distance(&self, other: &Coordinate) -> f64 {
        euclidean(self.x, self.y, other.x, other.y)
    }

    /// Both components are finite (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub(crate) fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

// NaN never reaches the graph, it is rejected on insertion
impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // -0.0 == 0.0 so both must hash alike
        fn bits(v: f64) -> u64 {
            if v == 0.0 { 0 } else { v.to_bits() }
        }
        bits(self.x).hash(state);
        bits(self.y).hash(state);
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses `x,y`
impl FromStr for Coordinate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
        let x = x.trim().parse::<f64>().map_err(|e| format!("bad x in `{s}`: {e}"))?;
        let y = y.trim().parse::<f64>().map_err(|e| format!("bad y in `{s}`: {e}"))?;
        Ok(Self::new(x, y))
    }
}
