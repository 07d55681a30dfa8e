#![forbid(unsafe_code)]

//! Load test binary - simulated planning poker players against a running game service
//!
//! Usage:
//!   cargo run --bin load_test -- --users 10 --duration 30
//!   cargo run --bin load_test -- --host https://poker.example.com --users 200 --duration 300
//!   cargo run --bin load_test -- --users 50 --min-wait 0.2 --max-wait 0.5 --weights 1,3,5,2

use anyhow::Result;
use planning_poker_load::config::{print_usage, Command, LoadConfig};
use planning_poker_load::harness::run_load_test;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match LoadConfig::from_env().parse_args(&args) {
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Run(config) => config,
    };
    config.validate()?;

    println!("\n=== Starting Load Test ===");
    println!("Host: {}", config.host);
    println!("Realtime: {}", config.realtime_url()?);
    println!("Users: {}", config.users);
    println!("Duration: {}s", config.duration.as_secs());
    println!(
        "Wait: {:.1}s - {:.1}s",
        config.min_wait.as_secs_f64(),
        config.max_wait.as_secs_f64()
    );
    println!(
        "Weights: create={} join={} vote={} state={}",
        config.weights.create_game,
        config.weights.join_game,
        config.weights.submit_vote,
        config.weights.get_game_state
    );
    println!("========================\n");

    let summary_path = config.summary_path.clone();
    let summary = run_load_test(config).await?;
    summary.print_summary();

    match summary.write_json(&summary_path) {
        Ok(()) => info!("Summary saved to: {}", summary_path.display()),
        Err(e) => error!("Failed to write summary: {}", e),
    }

    Ok(())
}
