//! SparkConf CLI - Spark Executor Sizing
//!
//! Computes executor settings from cluster size and prints them in the
//! requested configuration dialects.

use clap::Parser;
use sparkconf::config::{CliArgs, Commands, DetectSource, GenerateArgs};
use sparkconf::error::Result;
use sparkconf::render::render;
use sparkconf::sizing::{
    clean_megabyte_step, parse_memory, plan_allocation, round_to_clean_megabytes, ExecutorPolicy,
    BYTES_PER_MB,
};
use sparkconf::system::{detect_topology, Detection};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging; RUST_LOG overrides -v/-q
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Handle result
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(if e.is_input_error() { 2 } else { 1 });
    }
}

fn run(args: CliArgs) -> Result<()> {
    match &args.command {
        Some(Commands::Profiles) => cmd_profiles(),
        Some(Commands::Memory { size }) => cmd_memory(size),
        Some(Commands::Detect { source }) => cmd_detect(*source),
        None => cmd_generate(&args.generate),
    }
}

fn cmd_generate(args: &GenerateArgs) -> Result<()> {
    let detected = args.detect.map(detect_topology).transpose()?;
    let topology = args.topology(detected)?;

    tracing::info!(
        "Sizing {} nodes x {} cores x {} with profile {:?}",
        topology.node_count,
        topology.cores_per_node,
        topology.memory_per_node,
        args.profile
    );

    let plan = plan_allocation(&topology, args.profile)?;
    print!("{}", render(&plan, args.format)?);

    Ok(())
}

fn cmd_profiles() -> Result<()> {
    println!("=== Executor Profiles ===\n");
    for policy in ExecutorPolicy::ALL {
        println!(
            "{:12} max {} cores/executor  {}",
            policy.cli_name(),
            policy.max_cores_per_executor(),
            policy.name()
        );
    }
    Ok(())
}

fn cmd_memory(size: &str) -> Result<()> {
    let bytes = parse_memory(size)?;
    let mem_in_mb = bytes / BYTES_PER_MB;

    println!("Input:    {}", size);
    println!("Bytes:    {}", bytes);
    println!("MiB:      {:.3}", mem_in_mb);
    println!("Human:    {}", humansize::format_size(bytes as u64, humansize::BINARY));
    println!("Step:     {} MB", clean_megabyte_step(mem_in_mb));
    println!("Rounded:  {}M", round_to_clean_megabytes(bytes));
    Ok(())
}

fn cmd_detect(source: DetectSource) -> Result<()> {
    let detection = Detection::collect(source);
    detection.print_summary();

    let topology = detection.to_topology()?;
    println!("\n=== Detected Topology ===\n");
    println!(
        "{}",
        serde_json::to_string_pretty(&topology)
            .map_err(|e| sparkconf::error::SparkConfError::config(e.to_string()))?
    );
    Ok(())
}
