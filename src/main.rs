use petroflow::{Criterion, Leg, RouteOptimizer, SimulationConfig, WeightedGraph, simulate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,petroflow=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut network = WeightedGraph::new();
    network.add_node("Refinery_A", Some((0., 0.)));
    network.add_node("Refinery_B", Some((2., -3.)));
    network.add_node("Port", Some((4., 0.)));
    network.add_node("Distributor", Some((9., 1.)));

    network.add_edge("Refinery_A", "Port", 5., 4., 80.)?;
    network.add_edge("Port", "Distributor", 7., 5.1, 60.)?;
    network.add_edge("Refinery_B", "Port", 4., 3.6, 70.)?;
    network.add_edge("Refinery_B", "Distributor", 10., 8.1, 90.)?;

    let optimizer = RouteOptimizer::new(&network);
    let Some(route) = optimizer.find_route("Refinery_A", "Distributor", Criterion::Cost)? else {
        warn!("No route from Refinery_A to Distributor");
        return Ok(());
    };
    info!(%route, "Selected route");

    let config = SimulationConfig::default().with_until(50.);
    let history = simulate(&config, &Leg::from_route(&route))?;

    match history.summary() {
        Some(summary) => info!(
            samples = summary.samples,
            failures = summary.failures,
            min_flow = summary.min_flow,
            mean_flow = summary.mean_flow,
            max_flow = summary.max_flow,
            "Simulation complete"
        ),
        None => warn!("No flow data recorded during the simulation"),
    }
    Ok(())
}
