pub mod bfs;
pub mod weighted;
mod shortest_path;

use shortest_path::shortest_path;

use crate::collections::FxIndexMap;

/// Type alias for the node map used in path planning algorithms
/// N: Node - space on a graph
/// The tuple contains (parent_index, cost) where:
/// - parent_index is the index of the parent node in the map
/// - cost is the best known cost to reach this node from the start
///
/// Every search call owns its own map, nothing is stored on the graph itself
pub(crate) type GraphNodeMap<N> = FxIndexMap<N, (usize, f64)>;

/// Parent index of the start node
pub(crate) const NO_PARENT: usize = usize::MAX;
