use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roadgraph::weight::SpeedOverride;
use roadgraph::{
    load_road_map_file, Coordinate, DurationPolicy, LengthPolicy, LoadMode, RoadGraph, RoadGraphError,
    SpeedLimits,
};


#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    Bfs,
    Dijkstra,
    Astar,
    AstarAdmissible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Weight {
    /// Edge length in kilometers
    Length,
    /// Travel time in minutes at the road type's speed limit
    Duration,
}

/// Find a route through a road map
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Road map file, one `x1 y1 x2 y2 "name" type [length]` segment per line
    map: PathBuf,

    /// Start point as `x,y`
    #[arg(long, allow_hyphen_values = true)]
    from: Coordinate,

    /// Goal point as `x,y`
    #[arg(long, allow_hyphen_values = true)]
    to: Coordinate,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Dijkstra)]
    algorithm: Algorithm,

    #[arg(short, long, value_enum, default_value_t = Weight::Length)]
    weight: Weight,

    /// Speed limit override for the duration weight, may be repeated
    #[arg(long = "speed", value_name = "TYPE=KMH")]
    speeds: Vec<SpeedOverride>,

    /// Snap start and goal to the nearest intersection
    #[arg(long)]
    snap: bool,

    /// Fail on the first malformed map line instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log filter, e.g. `debug` or `roadgraph=trace`
    #[arg(long, env = "ROADGRAPH_LOG")]
    log_level: Option<String>,
}


fn init_tracing(verbose: bool, log_level: Option<&str>) -> Result<(), Box<dyn Error>> {
    let level = match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("roadgraph={level}"),
        (true, None) => "roadgraph=debug".to_string(),
        (false, None) => "roadgraph=warn".to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

fn build_graph(args: &Args) -> Result<RoadGraph, RoadGraphError> {
    let mut graph = match args.weight {
        Weight::Length => RoadGraph::with_policy(LengthPolicy),
        Weight::Duration => {
            let limits = SpeedLimits::default().with_overrides(&args.speeds)?;
            RoadGraph::with_policy(DurationPolicy::new(limits))
        }
    };
    let mode = if args.strict { LoadMode::Strict } else { LoadMode::Lenient };
    load_road_map_file(&args.map, &mut graph, mode)?;
    Ok(graph)
}

fn endpoint(graph: &RoadGraph, point: Coordinate, snap: bool) -> Result<Coordinate, RoadGraphError> {
    if !snap {
        return Ok(point);
    }
    let snapped = graph
        .nearest_vertex(&point)?
        .ok_or_else(|| RoadGraphError::InvalidArgument("map has no intersections".to_string()))?;
    if snapped != point {
        tracing::info!(%point, %snapped, "snapped to nearest intersection");
    }
    Ok(snapped)
}

fn run(args: &Args) -> Result<(), RoadGraphError> {
    let graph = build_graph(args)?;
    let start = endpoint(&graph, args.from, args.snap)?;
    let goal = endpoint(&graph, args.to, args.snap)?;

    let mut visited = 0usize;
    let mut count = |_: &Coordinate| visited += 1;
    let path = match args.algorithm {
        Algorithm::Bfs => graph.bfs_with_observer(&start, &goal, &mut count)?,
        Algorithm::Dijkstra => graph.dijkstra_with_observer(&start, &goal, &mut count)?,
        Algorithm::Astar => graph.a_star_search_with_observer(&start, &goal, &mut count)?,
        Algorithm::AstarAdmissible => graph.a_star_admissible_with_observer(&start, &goal, &mut count)?,
    };

    println!(
        "{} intersections, {} road segments",
        graph.vertex_count(),
        graph.edge_count()
    );
    if path.is_empty() {
        println!("no route from {start} to {goal} ({visited} visited)");
        return Ok(());
    }
    for point in &path {
        println!("{point}");
    }
    let hops = path.len() - 1;
    match graph.path_cost(&path) {
        Some(cost) => println!("{hops} hops, cost {cost:.3}, {visited} visited"),
        None => println!("{hops} hops, {visited} visited"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose, args.log_level.as_deref()) {
        eprintln!("failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
