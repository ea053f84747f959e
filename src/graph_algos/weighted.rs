use crate::collections::FxHashSet;
use crate::errors::Result;
use super::{shortest_path, GraphNodeMap, NO_PARENT};

use std::{
    collections::BinaryHeap,
    hash::Hash,
    fmt::Debug,
    cmp::Ordering
};
use indexmap::map::Entry::{Occupied, Vacant};
use ordered_float::OrderedFloat;


/// Distance and frontier priority proposed for a neighbor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tentative {
    /// Recorded as the neighbor's best known distance if it improves on it
    pub distance: f64,
    /// Key of the neighbor's frontier entry
    pub priority: f64,
}

/// Decides how the heuristic estimate enters a relaxation step
pub trait CostInjection {
    fn tentative(&self, best: f64, edge_cost: f64, estimate: f64) -> Tentative;
}

/// The estimate is added into the accumulated distance itself
/// Estimates pile up along a path, so the result is a heuristic-augmented
/// cost path rather than the classical A* optimum
#[derive(Clone, Copy, Debug, Default)]
pub struct FoldedHeuristic;

impl CostInjection for FoldedHeuristic {
    fn tentative(&self, best: f64, edge_cost: f64, estimate: f64) -> Tentative {
        let distance = best + edge_cost + estimate;
        Tentative { distance, priority: distance }
    }
}

/// Classical A*: the estimate only orders the frontier
/// Optimal when the estimate never exceeds the remaining cost
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityHeuristic;

impl CostInjection for PriorityHeuristic {
    fn tentative(&self, best: f64, edge_cost: f64, estimate: f64) -> Tentative {
        let distance = best + edge_cost;
        Tentative { distance, priority: distance + estimate }
    }
}


/// Frontier entry
/// - for ordering we only need the priority and a way to identify the node
#[derive(Debug)]
struct Frontier {
    index: usize, // index in the node map
    priority: OrderedFloat<f64>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the biggest, reverse for a min-heap
        other.priority.cmp(&self.priority)
    }
}
impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for Frontier {}


/// Generic weighted search behind Dijkstra and A*
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
/// https://en.wikipedia.org/wiki/A*_search_algorithm
///
/// From start, settle nodes in order of frontier priority until the goal is
/// popped. `heuristic` estimates the remaining cost from a node and
/// `injection` decides how that estimate is combined with the edge cost.
/// `visit` is called once per settled node, after its edges are relaxed; the
/// goal itself is never reported.
///
/// Returns an empty path when start == goal or when the goal is unreachable.
pub fn find_path<N, IT, NN, H, I, V>(
    start: N,
    goal: &N,
    neighbors: NN,
    heuristic: H,
    injection: &I,
    mut visit: V,
) -> Result<Vec<N>>
where
    N: Eq + Hash + Clone + Debug,
    NN: Fn(&N) -> IT, // returns iterator of neighbors + costs
    IT: IntoIterator<Item = (N, f64)>, // Iterator of neighbors + edge cost to neighbor node
    H: Fn(&N) -> f64, // estimated cost from a node to the goal
    I: CostInjection + ?Sized,
    V: FnMut(&N) -> Result<()>,
    {

    if start == *goal {
        return Ok(Vec::new());
    }

    // Best known distances, local to this call
    // The tuple contains (parent_index, distance), the start has no parent
    let mut node_map: GraphNodeMap<N> = GraphNodeMap::default();
    let start_index = node_map.insert_full(start, (NO_PARENT, 0.0)).0;

    // Nodes whose distance is final
    let mut settled: FxHashSet<usize> = FxHashSet::default();

    let mut frontier: BinaryHeap<Frontier> = BinaryHeap::new();
    frontier.push(Frontier {
        index: start_index,
        priority: OrderedFloat(0.0),
    });

    while let Some(Frontier { index, .. }) = frontier.pop() {

        // An improved entry for this node was popped earlier
        if settled.contains(&index) {
            continue;
        }

        let Some((node, &(_, best))) = node_map.get_index(index) else {
            continue;
        };
        let node = node.clone();

        if node == *goal {
            let path = shortest_path(&node_map, index);
            tracing::debug!(settled = settled.len(), cost = best, hops = path.len().saturating_sub(1), "weighted search reached goal");
            return Ok(path);
        }

        for (neighbor, edge_cost) in neighbors(&node) {

            if node_map
                .get_index_of(&neighbor)
                .is_some_and(|i| settled.contains(&i))
            {
                continue;
            }

            let estimate = heuristic(&neighbor);
            let Tentative { distance, priority } = injection.tentative(best, edge_cost, estimate);

            let neighbor_index = match node_map.entry(neighbor) {
                Vacant(e) => {
                    let i = e.index();
                    e.insert((index, distance));
                    i
                }
                Occupied(mut e) => {
                    if distance < e.get().1 {
                        e.insert((index, distance));
                        e.index()
                    } else {
                        // The existing path is better, do nothing
                        continue;
                    }
                }
            };

            frontier.push(Frontier {
                index: neighbor_index,
                priority: OrderedFloat(priority),
            });
        }

        settled.insert(index);
        tracing::trace!(node = ?node, distance = best, "settled");
        visit(&node)?;
    }

    tracing::debug!(settled = settled.len(), "weighted search exhausted without reaching goal");
    Ok(Vec::new())
}
