//! The binary entry point for the wayfarer random teleport service.
//!
//! Loads `teleport.ron`, applies CLI overrides, pre-caches if enabled, and
//! serves a number of random location requests against simulated terrain.
//!
//! Run with: `cargo run -p wayfarer-server -- --requests 10`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use wayfarer_config::{CliArgs, Config, default_config_dir};
use wayfarer_engine::{CandidateGenerator, RandomTeleport};
use wayfarer_world::{NoiseTerrain, WorldId};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_dir.display());
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    wayfarer_log::init_logging(Some(log_dir.as_path()), cfg!(debug_assertions), Some(&config));

    let workers = num_cpus::get().max(2);
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name("wayfarer-worker")
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(args, config, config_dir));
    ExitCode::SUCCESS
}

async fn run(args: CliArgs, config: Config, config_dir: PathBuf) {
    let terrain = NoiseTerrain::new(config.terrain.seed).with_latency(Duration::from_millis(
        config.terrain.chunk_load_latency_ms,
    ));
    let service = RandomTeleport::with_config(
        Arc::new(terrain),
        CandidateGenerator::from_entropy(),
        config,
        config_dir,
    );

    let scopes = service.pre_cache_all().await;
    if scopes > 0 {
        info!(scopes, "pre-cache scheduled");
    }

    let world = args.world.as_deref().map(WorldId::new);
    let Some(center) = service.center(world.as_ref()).await else {
        tracing::error!("no worlds available");
        return;
    };
    let min_range = service.min_range(world.as_ref());
    let max_range = service.max_range(world.as_ref()).await;
    info!(
        world = %center.world,
        x = center.x,
        z = center.z,
        min_range,
        max_range,
        "serving random locations"
    );

    for request in 1..=args.requests {
        let location = service
            .get_random_location(&center, min_range, max_range)
            .await;
        let distance = location.horizontal_distance(center.x, center.z);
        println!(
            "#{request}: {} ({:.1}, {:.1}, {:.1}) yaw {:.1} distance {distance:.1}",
            location.world, location.x, location.y, location.z, location.yaw
        );
    }
}
