//! Road map file loading
//!
//! One directed road segment per line:
//!
//! ```text
//! x1 y1 x2 y2 "road name" road_type [length]
//! ```
//!
//! Both endpoints are registered as vertices before the edge is added. The
//! length defaults to the straight-line distance between the endpoints.
//! Blank lines and lines starting with `#` are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::errors::{Result, RoadGraphError};
use crate::geometry::Coordinate;
use crate::graph::RoadGraph;


/// What to do with a line that can't be loaded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Stop at the first bad line
    #[default]
    Strict,
    /// Log the bad line and carry on
    Lenient,
}

/// Counts gathered while loading a map
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Road segment lines seen, comments and blank lines excluded
    pub lines: usize,
    pub vertices_added: usize,
    pub edges_added: usize,
    pub skipped: usize,
}


/// A single parsed map line
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub from: Coordinate,
    pub to: Coordinate,
    pub road_name: String,
    pub road_type: String,
    pub length: f64,
}

impl FromStr for RoadSegment {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let open = line.find('"').ok_or("missing quoted road name")?;
        let close = line.rfind('"').filter(|&c| c > open).ok_or("unterminated road name")?;

        let numbers = line[..open]
            .split_whitespace()
            .map(|t| t.parse::<f64>().map_err(|e| format!("bad coordinate `{t}`: {e}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let [x1, y1, x2, y2] = numbers[..] else {
            return Err(format!("expected 4 coordinates, found {}", numbers.len()));
        };
        let from = Coordinate::new(x1, y1);
        let to = Coordinate::new(x2, y2);
        if !from.is_finite() || !to.is_finite() {
            return Err("coordinates must be finite".to_string());
        }

        let road_name = line[open + 1..close].to_string();

        let mut rest = line[close + 1..].split_whitespace();
        let road_type = rest.next().ok_or("missing road type")?.to_string();
        let length = match rest.next() {
            Some(t) => t.parse::<f64>().map_err(|e| format!("bad length `{t}`: {e}"))?,
            None => from.distance(&to),
        };
        if let Some(extra) = rest.next() {
            return Err(format!("unexpected trailing field `{extra}`"));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(format!("length must be finite and non-negative, got {length}"));
        }

        Ok(Self { from, to, road_name, road_type, length })
    }
}


/// Load every road segment from `reader` into `graph`
pub fn load_road_map<R: BufRead>(reader: R, graph: &mut RoadGraph, mode: LoadMode) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for (n, raw) in reader.split(b'\n').enumerate() {
        let raw = raw?;
        let line_no = n + 1;

        let parsed = match String::from_utf8(raw) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                trimmed.parse::<RoadSegment>()
            }
            Err(e) => Err(format!("not valid UTF-8: {}", e.utf8_error())),
        };
        summary.lines += 1;

        let segment = match parsed {
            Ok(segment) => segment,
            Err(reason) if mode == LoadMode::Lenient => {
                tracing::warn!(line = line_no, %reason, "skipping road map line");
                summary.skipped += 1;
                continue;
            }
            Err(reason) => return Err(RoadGraphError::Parse { line: line_no, reason }),
        };

        add_segment(graph, &segment, &mut summary)?;
    }

    tracing::info!(
        lines = summary.lines,
        vertices = summary.vertices_added,
        edges = summary.edges_added,
        skipped = summary.skipped,
        "road map loaded"
    );
    Ok(summary)
}

/// Open and load a road map file
pub fn load_road_map_file(path: impl AsRef<Path>, graph: &mut RoadGraph, mode: LoadMode) -> Result<LoadSummary> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening road map");
    let file = File::open(path)?;
    load_road_map(BufReader::new(file), graph, mode)
}

fn add_segment(graph: &mut RoadGraph, segment: &RoadSegment, summary: &mut LoadSummary) -> Result<()> {
    for point in [segment.from, segment.to] {
        if graph.add_vertex(point)? {
            summary.vertices_added += 1;
        }
    }
    graph.add_edge(segment.from, segment.to, &segment.road_name, &segment.road_type, segment.length)?;
    summary.edges_added += 1;
    Ok(())
}
