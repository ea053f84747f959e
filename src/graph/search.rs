use crate::errors::Result;
use crate::geometry::Coordinate;
use crate::graph_algos::bfs::bfs;
use crate::graph_algos::weighted::{find_path, CostInjection, FoldedHeuristic, PriorityHeuristic};
use super::{RoadGraph, VertexId};


/// Hook called by a search for each vertex it visits
/// Runs inline on the searching thread; an error aborts the search and is
/// returned to the caller
pub trait SearchObserver {
    fn visit(&mut self, point: &Coordinate) -> Result<()>;
}

/// Observer that ignores every visit
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn visit(&mut self, _point: &Coordinate) -> Result<()> {
        Ok(())
    }
}

impl<F> SearchObserver for F
where
    F: FnMut(&Coordinate),
{
    fn visit(&mut self, point: &Coordinate) -> Result<()> {
        self(point);
        Ok(())
    }
}


/// Estimated cost from a candidate vertex to the goal
pub trait Heuristic {
    fn cost_to_goal(&self, candidate: &Coordinate, goal: &Coordinate) -> f64;
}

/// Always zero, turns the weighted search into Dijkstra
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroHeuristic;

impl Heuristic for ZeroHeuristic {
    fn cost_to_goal(&self, _candidate: &Coordinate, _goal: &Coordinate) -> f64 {
        0.0
    }
}

/// Straight-line distance to the goal
#[derive(Clone, Copy, Debug, Default)]
pub struct EuclideanHeuristic;

impl Heuristic for EuclideanHeuristic {
    fn cost_to_goal(&self, candidate: &Coordinate, goal: &Coordinate) -> f64 {
        candidate.distance(goal)
    }
}

impl<F> Heuristic for F
where
    F: Fn(&Coordinate, &Coordinate) -> f64,
{
    fn cost_to_goal(&self, candidate: &Coordinate, goal: &Coordinate) -> f64 {
        self(candidate, goal)
    }
}


impl RoadGraph {

    /// Path with the fewest road segments from start to goal
    /// Both ends included, `[start]` when start == goal, empty if unreachable
    pub fn bfs(&self, start: &Coordinate, goal: &Coordinate) -> Result<Vec<Coordinate>> {
        self.bfs_with_observer(start, goal, &mut NoopObserver)
    }

    /// As [`RoadGraph::bfs`], reporting every dequeued vertex to `observer`
    pub fn bfs_with_observer<O>(&self, start: &Coordinate, goal: &Coordinate, observer: &mut O) -> Result<Vec<Coordinate>>
    where
        O: SearchObserver + ?Sized,
    {
        let start_id = self.require_vertex(start, "start")?;
        let goal_id = self.require_vertex(goal, "goal")?;

        let path = bfs(
            start_id,
            &goal_id,
            |&id| self.adjacency(id).iter().map(|e| e.target()),
            |&id| match self.coordinate(id) {
                Some(point) => observer.visit(point),
                None => Ok(()),
            },
        )?;
        Ok(self.to_coordinates(path))
    }

    /// Cheapest path under the edges' weight policies
    /// Empty when start == goal or when the goal is unreachable
    pub fn dijkstra(&self, start: &Coordinate, goal: &Coordinate) -> Result<Vec<Coordinate>> {
        self.dijkstra_with_observer(start, goal, &mut NoopObserver)
    }

    pub fn dijkstra_with_observer<O>(&self, start: &Coordinate, goal: &Coordinate, observer: &mut O) -> Result<Vec<Coordinate>>
    where
        O: SearchObserver + ?Sized,
    {
        self.find_path(start, goal, observer, &ZeroHeuristic, &FoldedHeuristic)
    }

    /// A* guided by the straight-line distance to the goal
    /// The distance estimate is folded into each vertex's accumulated cost,
    /// see [`FoldedHeuristic`]. Empty when start == goal or when unreachable.
    pub fn a_star_search(&self, start: &Coordinate, goal: &Coordinate) -> Result<Vec<Coordinate>> {
        self.a_star_search_with_observer(start, goal, &mut NoopObserver)
    }

    pub fn a_star_search_with_observer<O>(&self, start: &Coordinate, goal: &Coordinate, observer: &mut O) -> Result<Vec<Coordinate>>
    where
        O: SearchObserver + ?Sized,
    {
        self.find_path(start, goal, observer, &EuclideanHeuristic, &FoldedHeuristic)
    }

    /// Classical A*, the distance estimate only orders the frontier
    pub fn a_star_admissible(&self, start: &Coordinate, goal: &Coordinate) -> Result<Vec<Coordinate>> {
        self.a_star_admissible_with_observer(start, goal, &mut NoopObserver)
    }

    pub fn a_star_admissible_with_observer<O>(&self, start: &Coordinate, goal: &Coordinate, observer: &mut O) -> Result<Vec<Coordinate>>
    where
        O: SearchObserver + ?Sized,
    {
        self.find_path(start, goal, observer, &EuclideanHeuristic, &PriorityHeuristic)
    }

    /// Weighted search shared by Dijkstra and both A* flavours
    /// `observer` sees every settled vertex except the goal
    pub fn find_path<O, H, I>(
        &self,
        start: &Coordinate,
        goal: &Coordinate,
        observer: &mut O,
        heuristic: &H,
        injection: &I,
    ) -> Result<Vec<Coordinate>>
    where
        O: SearchObserver + ?Sized,
        H: Heuristic + ?Sized,
        I: CostInjection + ?Sized,
    {
        let start_id = self.require_vertex(start, "start")?;
        let goal_id = self.require_vertex(goal, "goal")?;

        let path = find_path(
            start_id,
            &goal_id,
            |&id| self.adjacency(id).iter().map(|e| (e.target(), e.cost())),
            |&id| self.coordinate(id).map_or(0.0, |point| heuristic.cost_to_goal(point, goal)),
            injection,
            |&id| match self.coordinate(id) {
                Some(point) => observer.visit(point),
                None => Ok(()),
            },
        )?;
        Ok(self.to_coordinates(path))
    }

    fn to_coordinates(&self, path: Vec<VertexId>) -> Vec<Coordinate> {
        path.into_iter()
            .filter_map(|id| self.coordinate(id).copied())
            .collect()
    }
}




#[cfg(test)]
mod random_graph_tests {
    use super::*;
    use crate::weight::{DurationPolicy, EdgeWeightPolicy, LengthPolicy};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use std::sync::Arc;

    const ROAD_TYPES: [&str; 5] = ["motorway", "primary", "residential", "living_street", "farm_track"];

    struct Segment {
        from: Coordinate,
        to: Coordinate,
        road_type: &'static str,
        length: f64,
    }

    /// Random points and segments; every length is at least the straight-line
    /// distance so the Euclidean estimate never overshoots
    fn random_network(seed: u64, vertices: usize, edges: usize) -> (Vec<Coordinate>, Vec<Segment>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<Coordinate> = (0..vertices)
            .map(|_| Coordinate::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        let segments = (0..edges)
            .map(|_| {
                let from = points[rng.random_range(0..vertices)];
                let to = points[rng.random_range(0..vertices)];
                Segment {
                    from,
                    to,
                    road_type: ROAD_TYPES[rng.random_range(0..ROAD_TYPES.len())],
                    length: from.distance(&to) * rng.random_range(1.0..2.0),
                }
            })
            .collect();
        (points, segments)
    }

    fn build(points: &[Coordinate], segments: &[Segment], policy: Arc<dyn EdgeWeightPolicy>) -> RoadGraph {
        let mut graph = RoadGraph::new();
        graph.set_weight_policy(policy);
        for &p in points {
            graph.add_vertex(p).unwrap();
        }
        for s in segments {
            graph.add_edge(s.from, s.to, "road", s.road_type, s.length).unwrap();
        }
        graph
    }

    fn pairs(points: &[Coordinate]) -> impl Iterator<Item = (Coordinate, Coordinate)> + '_ {
        points.iter().take(8).flat_map(move |&a| points.iter().map(move |&b| (a, b)))
    }

    #[test]
    fn test_policy_does_not_change_reachability() {
        for seed in 0..5 {
            let (points, segments) = random_network(seed, 25, 50);
            let by_length = build(&points, &segments, Arc::new(LengthPolicy));
            let by_time = build(&points, &segments, Arc::new(DurationPolicy::default()));

            for (a, b) in pairs(&points).filter(|(a, b)| a != b) {
                let reachable = !by_length.bfs(&a, &b).unwrap().is_empty();
                assert_eq!(!by_length.dijkstra(&a, &b).unwrap().is_empty(), reachable);
                assert_eq!(!by_time.dijkstra(&a, &b).unwrap().is_empty(), reachable);
                assert_eq!(!by_time.a_star_search(&a, &b).unwrap().is_empty(), reachable);
                assert_eq!(!by_length.a_star_admissible(&a, &b).unwrap().is_empty(), reachable);
            }
        }
    }

    #[test]
    fn test_paths_start_and_end_at_endpoints() {
        let (points, segments) = random_network(42, 30, 80);
        let graph = build(&points, &segments, Arc::new(LengthPolicy));

        for (a, b) in pairs(&points) {
            for path in [
                graph.bfs(&a, &b).unwrap(),
                graph.dijkstra(&a, &b).unwrap(),
                graph.a_star_search(&a, &b).unwrap(),
                graph.a_star_admissible(&a, &b).unwrap(),
            ] {
                if path.is_empty() {
                    continue;
                }
                assert_eq!(path.first(), Some(&a));
                assert_eq!(path.last(), Some(&b));
                // every hop follows an edge
                assert!(graph.path_cost(&path).is_some());
            }
        }
    }

    #[test]
    fn test_classical_a_star_matches_dijkstra_cost() {
        let (points, segments) = random_network(7, 30, 90);
        let graph = build(&points, &segments, Arc::new(LengthPolicy));

        for (a, b) in pairs(&points).filter(|(a, b)| a != b) {
            let dijkstra = graph.dijkstra(&a, &b).unwrap();
            let a_star = graph.a_star_admissible(&a, &b).unwrap();
            let folded = graph.a_star_search(&a, &b).unwrap();
            let bfs = graph.bfs(&a, &b).unwrap();
            if dijkstra.is_empty() {
                continue;
            }
            let best = graph.path_cost(&dijkstra).unwrap();
            let classical = graph.path_cost(&a_star).unwrap();
            assert!((best - classical).abs() < 1e-9, "{best} != {classical}");
            // the folded variant may pick a worse path, never a better one
            assert!(graph.path_cost(&folded).unwrap() >= best - 1e-9);
            assert!(bfs.len() <= dijkstra.len());
        }
    }

    #[test]
    fn test_observer_never_repeats_a_vertex() {
        let (points, segments) = random_network(3, 30, 120);
        let graph = build(&points, &segments, Arc::new(LengthPolicy));

        for (a, b) in pairs(&points) {
            for algorithm in 0..3 {
                let mut seen = Vec::new();
                let mut record = |p: &Coordinate| seen.push(*p);
                match algorithm {
                    0 => graph.bfs_with_observer(&a, &b, &mut record).unwrap(),
                    1 => graph.dijkstra_with_observer(&a, &b, &mut record).unwrap(),
                    _ => graph.a_star_search_with_observer(&a, &b, &mut record).unwrap(),
                };
                let unique: HashSet<_> = seen.iter().collect();
                assert_eq!(unique.len(), seen.len());
                assert!(seen.len() <= graph.vertex_count());
            }
        }
    }
}
