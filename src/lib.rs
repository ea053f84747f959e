//! Road network graph with breadth-first, Dijkstra and A* path finding
//!
//! ```
//! use roadgraph::{Coordinate, RoadGraph};
//!
//! let (a, b, c) = (Coordinate::new(1.0, 1.0), Coordinate::new(4.0, 1.0), Coordinate::new(8.0, -1.0));
//! let mut graph = RoadGraph::new();
//! for p in [a, b, c] {
//!     graph.add_vertex(p)?;
//! }
//! graph.add_edge(a, b, "Main Street", "residential", 3.0)?;
//! graph.add_edge(b, c, "Main Street", "residential", 2.0)?;
//! graph.add_edge(a, c, "Bypass", "primary", 9.0)?;
//!
//! assert_eq!(graph.bfs(&a, &c)?, vec![a, c]);
//! assert_eq!(graph.dijkstra(&a, &c)?, vec![a, b, c]);
//! # Ok::<(), roadgraph::RoadGraphError>(())
//! ```

mod collections;
pub mod errors;
pub mod geometry;
pub mod graph;
pub mod graph_algos;
pub mod loader;
pub mod weight;

pub use errors::{Result, RoadGraphError};
pub use geometry::Coordinate;
pub use graph::{Edge, RoadGraph, VertexId};
pub use graph::search::{EuclideanHeuristic, Heuristic, NoopObserver, SearchObserver, ZeroHeuristic};
pub use graph_algos::weighted::{CostInjection, FoldedHeuristic, PriorityHeuristic, Tentative};
pub use loader::{load_road_map, load_road_map_file, LoadMode, LoadSummary};
pub use weight::{DurationPolicy, EdgeWeightPolicy, LengthPolicy, SpeedLimits};
