use crate::errors::Result;
use super::{shortest_path, GraphNodeMap, NO_PARENT};

use std::{collections::VecDeque, hash::Hash, fmt::Debug};
use indexmap::map::Entry::Vacant;


/// Breadth-first search for the path with the fewest edges
/// https://en.wikipedia.org/wiki/Breadth-first_search
///
/// `visit` is called for every dequeued node before the goal check; an error
/// from it aborts the search.
/// Returns `[start]` when start == goal and an empty path when the goal is
/// unreachable.
pub fn bfs<N, IT, NN, V>(start: N, goal: &N, neighbors: NN, mut visit: V) -> Result<Vec<N>>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT, // returns iterator of neighbors
    IT: IntoIterator<Item = N>,
    V: FnMut(&N) -> Result<()>,
    {

    if start == *goal {
        return Ok(vec![start]);
    }

    // Discovered nodes, (parent_index, hops)
    // A node enters the map when it is enqueued, so it is enqueued only once
    let mut node_map: GraphNodeMap<N> = GraphNodeMap::default();
    let start_index = node_map.insert_full(start, (NO_PARENT, 0.0)).0;

    let mut queue: VecDeque<usize> = VecDeque::new();
    queue.push_back(start_index);

    while let Some(index) = queue.pop_front() {

        let Some((node, &(_, hops))) = node_map.get_index(index) else {
            continue;
        };
        let node = node.clone();

        visit(&node)?;

        if node == *goal {
            let path = shortest_path(&node_map, index);
            tracing::debug!(discovered = node_map.len(), hops, "bfs reached goal");
            return Ok(path);
        }

        for neighbor in neighbors(&node) {
            if let Vacant(e) = node_map.entry(neighbor) {
                let neighbor_index = e.index();
                e.insert((index, hops + 1.0));
                queue.push_back(neighbor_index);
            }
        }
    }

    tracing::debug!(discovered = node_map.len(), "bfs exhausted without reaching goal");
    Ok(Vec::new())
}
