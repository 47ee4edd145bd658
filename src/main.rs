use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use traffic_flow::simulation::{load_network, parse_network, NetworkBuilder};

#[derive(Parser)]
#[command(name = "traffic_flow")]
#[command(about = "Discrete-time traffic microsimulation")]
struct Cli {
    /// Network description file; a built-in demo network is used when omitted
    #[arg(long)]
    network: Option<PathBuf>,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value = "0.1")]
    delta: f32,

    /// Random seed; omit for a nondeterministic run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let builder = match &cli.network {
        Some(path) => load_network(path)?,
        None => demo_network()?,
    };
    let mut world = builder.build(cli.seed)?;

    println!("Ticks: {}, Delta: {}s", cli.ticks, cli.delta);
    println!("Initial state:");
    world.print_summary();
    println!();

    // Print a summary once per simulated second
    let ticks_per_second = (1.0 / cli.delta).ceil().max(1.0) as u32;
    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = ticks_per_second.min(cli.ticks - tick);
        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(cli.delta)?;
        }
        println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time());
        world.print_summary();
        println!();
    }

    println!("=== Final State ===");
    world.print_summary();
    let completed = world.drain_trip_records();
    if !completed.is_empty() {
        let total: f32 = completed.iter().map(|r| r.duration).sum();
        println!(
            "Average trip duration: {:.1}s over {} trips",
            total / completed.len() as f32,
            completed.len()
        );
    }
    Ok(())
}

/// Small two-town demo network used when no file is given.
fn demo_network() -> Result<NetworkBuilder> {
    parse_network(
        "\
# demo: two towns joined through a midpoint junction
node,west_town,0,0,800
node,junction,2000,0,0
node,east_town,4000,0,600
road,west_out,west_town,junction,2000,25,2
road,west_in,junction,west_town,2000,25,2
road,east_out,east_town,junction,2000,30,1
road,east_in,junction,east_town,2000,30,1
route,west_town,junction,east_town
",
    )
}
