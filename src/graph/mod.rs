pub mod edge;
pub mod search;

pub use edge::Edge;

use std::fmt;
use std::sync::Arc;

use kdtree::KdTree;
use kdtree::distance::squared_euclidean as kt_squared_euclidean;

use crate::collections::FxIndexMap;
use crate::errors::{Result, RoadGraphError};
use crate::geometry::Coordinate;
use crate::weight::{EdgeWeightPolicy, LengthPolicy};


/// Dense vertex id, the insertion index of the vertex's coordinate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    pub fn index(&self) -> usize {
        self.0
    }
}


/// Directed road network
/// Vertices are intersections identified by their coordinate, edges are road
/// segments stored in the adjacency list of their source vertex.
///
/// Searches borrow the graph immutably and keep their own state, so any
/// number of them may run on a shared `&RoadGraph`.
pub struct RoadGraph {
    // coordinate -> outgoing edges, index is the VertexId
    vertices: FxIndexMap<Coordinate, Vec<Edge>>,
    edge_count: usize,
    // policy given to every edge added from now on
    policy: Arc<dyn EdgeWeightPolicy>,
    // point -> VertexId, for nearest intersection lookups
    spatial: KdTree<f64, usize, [f64; 2]>,
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadGraph")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edge_count)
            .field("policy", &self.policy)
            .finish()
    }
}

impl RoadGraph {

    /// Empty graph weighing edges by length
    pub fn new() -> Self {
        Self::with_policy(LengthPolicy)
    }

    /// Empty graph weighing edges with `policy`
    pub fn with_policy<P>(policy: P) -> Self
    where
        P: EdgeWeightPolicy + 'static,
    {
        Self {
            vertices: FxIndexMap::default(),
            edge_count: 0,
            policy: Arc::new(policy),
            spatial: KdTree::new(2),
        }
    }

    /// Replace the active weight policy
    /// Edges already in the graph keep the policy they were added with
    pub fn set_weight_policy(&mut self, policy: Arc<dyn EdgeWeightPolicy>) {
        self.policy = policy;
    }

    pub fn weight_policy(&self) -> &Arc<dyn EdgeWeightPolicy> {
        &self.policy
    }

    /// Add an intersection
    /// Returns false, leaving the graph untouched, if it is already present
    pub fn add_vertex(&mut self, point: Coordinate) -> Result<bool> {
        if !point.is_finite() {
            return Err(RoadGraphError::invalid(format!("vertex {point} is not finite")));
        }
        if self.vertices.contains_key(&point) {
            return Ok(false);
        }
        let id = self.vertices.len();
        self.spatial.add(point.as_array(), id)?;
        self.vertices.insert(point, Vec::new());
        Ok(true)
    }

    /// Add a directed road segment from `from` to `to`
    /// Both endpoints must already be vertices; nothing changes on failure
    pub fn add_edge(
        &mut self,
        from: Coordinate,
        to: Coordinate,
        road_name: &str,
        road_type: &str,
        length: f64,
    ) -> Result<()> {
        let from_id = self.require_vertex(&from, "from")?;
        let to_id = self.require_vertex(&to, "to")?;
        let edge = Edge::new(to_id, length, road_name, road_type, Arc::clone(&self.policy))?;

        let Some((_, edges)) = self.vertices.get_index_mut(from_id.0) else {
            return Err(RoadGraphError::invalid(format!("vertex {from} is not in the graph")));
        };
        edges.push(edge);
        self.edge_count += 1;
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Intersections in insertion order
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &Coordinate> + '_ {
        self.vertices.keys()
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        self.vertices.contains_key(point)
    }

    pub fn vertex_id(&self, point: &Coordinate) -> Option<VertexId> {
        self.vertices.get_index_of(point).map(VertexId)
    }

    pub fn coordinate(&self, id: VertexId) -> Option<&Coordinate> {
        self.vertices.get_index(id.0).map(|(point, _)| point)
    }

    /// Outgoing edges of an intersection
    pub fn edges_from(&self, point: &Coordinate) -> Option<&[Edge]> {
        self.vertices.get(point).map(Vec::as_slice)
    }

    /// Closest intersection to `point`, None on an empty graph
    pub fn nearest_vertex(&self, point: &Coordinate) -> Result<Option<Coordinate>> {
        if !point.is_finite() {
            return Err(RoadGraphError::invalid(format!("query point {point} is not finite")));
        }
        let closest = self.spatial.nearest(&point.as_array(), 1, &kt_squared_euclidean)?;
        Ok(closest
            .first()
            .and_then(|&(_, &id)| self.coordinate(VertexId(id)))
            .copied())
    }

    /// Summed cost of walking `path`, taking the cheapest edge between each
    /// consecutive pair
    /// None if some pair has no connecting edge
    pub fn path_cost(&self, path: &[Coordinate]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |total, pair| {
            let to_id = self.vertex_id(&pair[1])?;
            let cheapest = self
                .edges_from(&pair[0])?
                .iter()
                .filter(|e| e.target() == to_id)
                .map(Edge::cost)
                .min_by(f64::total_cmp)?;
            Some(total + cheapest)
        })
    }

    pub(crate) fn require_vertex(&self, point: &Coordinate, role: &str) -> Result<VertexId> {
        if !point.is_finite() {
            return Err(RoadGraphError::invalid(format!("{role} point {point} is not finite")));
        }
        self.vertex_id(point)
            .ok_or_else(|| RoadGraphError::invalid(format!("{role} point {point} is not in the graph")))
    }

    pub(crate) fn adjacency(&self, id: VertexId) -> &[Edge] {
        self.vertices
            .get_index(id.0)
            .map(|(_, edges)| edges.as_slice())
            .unwrap_or(&[])
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::DurationPolicy;

    fn pt(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn test_add_vertex_twice() {
        let mut graph = RoadGraph::new();
        assert!(graph.add_vertex(pt(1.0, 1.0)).unwrap());
        assert_eq!(graph.vertex_count(), 1);
        assert!(!graph.add_vertex(pt(1.0, 1.0)).unwrap());
        assert_eq!(graph.vertex_count(), 1);
        assert!(graph.contains(&pt(1.0, 1.0)));
    }

    #[test]
    fn test_add_vertex_rejects_non_finite() {
        let mut graph = RoadGraph::new();
        let result = graph.add_vertex(pt(f64::NAN, 0.0));
        assert!(matches!(result, Err(RoadGraphError::InvalidArgument(_))));
        assert!(graph.add_vertex(pt(0.0, f64::NEG_INFINITY)).is_err());
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_add_edge_unknown_vertex() {
        let mut graph = RoadGraph::new();
        graph.add_vertex(pt(0.0, 0.0)).unwrap();

        let result = graph.add_edge(pt(0.0, 0.0), pt(5.0, 5.0), "Main", "residential", 1.0);
        assert!(matches!(result, Err(RoadGraphError::InvalidArgument(_))));
        let result = graph.add_edge(pt(5.0, 5.0), pt(0.0, 0.0), "Main", "residential", 1.0);
        assert!(matches!(result, Err(RoadGraphError::InvalidArgument(_))));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.edges_from(&pt(0.0, 0.0)).unwrap().is_empty());
    }

    #[test]
    fn test_add_edge_negative_length() {
        let mut graph = RoadGraph::new();
        graph.add_vertex(pt(0.0, 0.0)).unwrap();
        graph.add_vertex(pt(1.0, 0.0)).unwrap();

        let result = graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "Main", "residential", -0.5);
        assert!(matches!(result, Err(RoadGraphError::InvalidArgument(_))));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_are_counted() {
        let mut graph = RoadGraph::new();
        graph.add_vertex(pt(0.0, 0.0)).unwrap();
        graph.add_vertex(pt(1.0, 0.0)).unwrap();
        graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "Main", "residential", 1.0).unwrap();
        graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "Bypass", "primary", 1.5).unwrap();
        graph.add_edge(pt(1.0, 0.0), pt(0.0, 0.0), "Main", "residential", 1.0).unwrap();

        assert_eq!(graph.edge_count(), 3);
        let edges = graph.edges_from(&pt(0.0, 0.0)).unwrap();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].road_name(), "Bypass");
        assert_eq!(edges[1].road_type(), "primary");
        assert_eq!(edges[1].target(), graph.vertex_id(&pt(1.0, 0.0)).unwrap());
    }

    #[test]
    fn test_vertices_in_insertion_order() {
        let mut graph = RoadGraph::new();
        for p in [pt(3.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0), pt(1.0, 0.0)] {
            graph.add_vertex(p).unwrap();
        }
        let vertices: Vec<_> = graph.vertices().copied().collect();
        assert_eq!(vertices, vec![pt(3.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)]);
        assert_eq!(graph.vertex_id(&pt(2.0, 0.0)), Some(VertexId(2)));
        assert_eq!(graph.coordinate(VertexId(1)), Some(&pt(1.0, 0.0)));
        assert_eq!(graph.coordinate(VertexId(7)), None);
    }

    #[test]
    fn test_policy_applies_to_new_edges_only() {
        let mut graph = RoadGraph::new();
        graph.add_vertex(pt(0.0, 0.0)).unwrap();
        graph.add_vertex(pt(1.0, 0.0)).unwrap();
        graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "Main", "motorway", 90.0).unwrap();

        graph.set_weight_policy(Arc::new(DurationPolicy::default()));
        graph.add_edge(pt(1.0, 0.0), pt(0.0, 0.0), "Main", "motorway", 90.0).unwrap();

        assert_eq!(graph.edges_from(&pt(0.0, 0.0)).unwrap()[0].cost(), 90.0);
        assert_eq!(graph.edges_from(&pt(1.0, 0.0)).unwrap()[0].cost(), 30.0);
    }

    #[test]
    fn test_nearest_vertex() {
        let mut graph = RoadGraph::new();
        assert_eq!(graph.nearest_vertex(&pt(0.0, 0.0)).unwrap(), None);

        for p in [pt(0.0, 0.0), pt(10.0, 0.0), pt(5.0, 5.0)] {
            graph.add_vertex(p).unwrap();
        }
        assert_eq!(graph.nearest_vertex(&pt(9.0, 1.0)).unwrap(), Some(pt(10.0, 0.0)));
        assert_eq!(graph.nearest_vertex(&pt(4.0, 4.0)).unwrap(), Some(pt(5.0, 5.0)));
        assert!(graph.nearest_vertex(&pt(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_path_cost() {
        let mut graph = RoadGraph::new();
        for p in [pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)] {
            graph.add_vertex(p).unwrap();
        }
        graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "A", "residential", 4.0).unwrap();
        graph.add_edge(pt(0.0, 0.0), pt(1.0, 0.0), "B", "residential", 2.0).unwrap();
        graph.add_edge(pt(1.0, 0.0), pt(2.0, 0.0), "C", "residential", 3.0).unwrap();

        assert_eq!(graph.path_cost(&[pt(0.0, 0.0), pt(1.0, 0.0), pt(2.0, 0.0)]), Some(5.0));
        assert_eq!(graph.path_cost(&[pt(2.0, 0.0), pt(1.0, 0.0)]), None);
        assert_eq!(graph.path_cost(&[pt(0.0, 0.0)]), Some(0.0));
        assert_eq!(graph.path_cost(&[]), Some(0.0));
    }
}
