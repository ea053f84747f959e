use std::sync::Arc;

use crate::errors::{Result, RoadGraphError};
use crate::weight::EdgeWeightPolicy;
use super::VertexId;


/// Directed road segment, stored in the adjacency list of its source vertex
#[derive(Clone, Debug)]
pub struct Edge {
    target: VertexId,
    length: f64,
    road_name: String,
    road_type: String,
    policy: Arc<dyn EdgeWeightPolicy>,
}

impl Edge {

    /// Fails if `length` is negative or not finite
    pub fn new(
        target: VertexId,
        length: f64,
        road_name: impl Into<String>,
        road_type: impl Into<String>,
        policy: Arc<dyn EdgeWeightPolicy>,
    ) -> Result<Self> {
        if !length.is_finite() || length < 0.0 {
            return Err(RoadGraphError::invalid(format!(
                "edge length must be finite and non-negative, got {length}"
            )));
        }
        Ok(Self {
            target,
            length,
            road_name: road_name.into(),
            road_type: road_type.into(),
            policy,
        })
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Raw length (km)
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn road_name(&self) -> &str {
        &self.road_name
    }

    pub fn road_type(&self) -> &str {
        &self.road_type
    }

    /// Effective cost under the policy this edge was built with
    pub fn cost(&self) -> f64 {
        self.policy.cost(self.length, &self.road_type)
    }
}
