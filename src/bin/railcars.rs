//! Count the cars of random circular trains without being told their length.

use anyhow::{bail, Result};
use clap::Parser;
use linkwork::challenges::{close_loop, count_railcars};
use linkwork::{ChainNode, DoubleNode, NodeArena, Value};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// railcars - walk circular trains of switched lights and count the cars
#[derive(Debug, Parser)]
#[command(name = "railcars", version, about, long_about = None)]
struct Cli {
    /// Train lengths to try, each with random lights.
    #[arg(short, long, value_delimiter = ',', default_values_t = [0, 1, 2, 5, 10, 50, 100])]
    sizes: Vec<usize>,

    /// Length of the two extra trains with every light on and every light off.
    #[arg(long, default_value_t = 10)]
    uniform: usize,

    /// Seed for the light pattern, random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("linkwork", level)
        .filter_module("railcars", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!("light pattern seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut trains: Vec<Vec<bool>> = cli
        .sizes
        .iter()
        .map(|&size| (0..size).map(|_| rng.gen_bool(0.5)).collect())
        .collect();
    trains.push(vec![true; cli.uniform]);
    trains.push(vec![false; cli.uniform]);

    for lights in &trains {
        check_train(lights)?;
    }
    info!("counted all {} trains", trains.len());
    Ok(())
}

fn check_train(lights: &[bool]) -> Result<()> {
    let mut arena = NodeArena::with_capacity(lights.len());
    let start = DoubleNode::from_sequence(&mut arena, lights.iter().copied());
    if let Some(head) = start {
        close_loop(&mut arena, head);
    }
    if let Some(rendered) = render_train(lights) {
        println!("{}", rendered);
    }

    let Some(count) = count_railcars(&mut arena, start) else {
        bail!("the train of {} cars is not circular", lights.len());
    };
    if count != lights.len() {
        bail!("expected {} cars, counted {}", lights.len(), count);
    }
    info!("counted {} railcars", count);
    Ok(())
}

/// Render the lights as `True`/`False` on a loop of their own.
fn render_train(lights: &[bool]) -> Option<String> {
    let mut arena = NodeArena::with_capacity(lights.len());
    let head = DoubleNode::from_sequence(&mut arena, lights.iter().map(|&on| Value::from(on)))?;
    close_loop(&mut arena, head);
    Some(head.render_chain(&arena))
}
