use super::{GraphNodeMap, NO_PARENT};

/// Construct the path from the start node to the node at `goal_index`
/// Walks parent indices back to the start, then reverses
/// node_map: GraphNodeMap<N> - map of nodes with their parent index and cost
/// goal_index: usize - index of the goal node in the node_map
pub(crate) fn shortest_path<N>(node_map: &GraphNodeMap<N>, goal_index: usize) -> Vec<N>
where
    N: Clone,
{

    let mut path = Vec::new();
    let mut current_index = goal_index;

    // Trace back from goal to start
    while current_index != NO_PARENT {
        let Some((node, &(parent_index, _))) = node_map.get_index(current_index) else {
            break;
        };
        path.push(node.clone());
        current_index = parent_index;
    }

    path.reverse();
    path
}
