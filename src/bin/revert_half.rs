//! Reverse the second half of the list `1..=size` and show both versions.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use linkwork::challenges::{halves, reverse_second_half};
use linkwork::{ChainNode, NodeArena, SingleNode};

/// revert-half - reverse the second half of a list in place
#[derive(Debug, Parser)]
#[command(name = "revert-half", version, about, long_about = None)]
struct Cli {
    /// Number of nodes, the list holds 1 to SIZE.
    #[arg(value_name = "SIZE")]
    size: usize,

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
        .filter_module("revert_half", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();

    ensure!(cli.size > 0, "the list needs at least one node");

    let mut arena = NodeArena::with_capacity(cli.size);
    let head = SingleNode::from_sequence(&mut arena, 1..=cli.size)
        .context("failed to build the list")?;

    println!("Original list:");
    println!("{}", head.render_chain(&arena));

    let (mid, second) = halves(&arena, head);
    println!("Last node of first half: {}", mid.payload(&arena));
    match second {
        Some(second) => println!("First node of second half: {}", second.payload(&arena)),
        None => println!("First node of second half: None"),
    }

    reverse_second_half(&mut arena, head);

    println!("List with reversed second half:");
    println!("{}", head.render_chain(&arena));
    Ok(())
}
