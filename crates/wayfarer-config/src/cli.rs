//! Command-line argument parsing for the wayfarer server.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Wayfarer command-line arguments.
///
/// CLI values override settings loaded from `teleport.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "wayfarer", about = "Random safe-location teleport service")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Seed for the simulated terrain.
    #[arg(long)]
    pub seed: Option<u64>,

    /// World to search in (defaults to the configured center's world).
    #[arg(long)]
    pub world: Option<String>,

    /// Inner search radius.
    #[arg(long)]
    pub min_range: Option<f64>,

    /// Outer search radius.
    #[arg(long)]
    pub max_range: Option<f64>,

    /// Maximum candidate rounds per request.
    #[arg(long)]
    pub find_attempts: Option<u32>,

    /// Queue depth below which a refill is scheduled.
    #[arg(long)]
    pub cache_threshold: Option<u32>,

    /// Enable pre-caching on startup.
    #[arg(long)]
    pub pre_cache: Option<bool>,

    /// Number of random locations to request.
    #[arg(long, default_value_t = 5)]
    pub requests: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// Range overrides land in the scope that applies to `--world`.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(attempts) = args.find_attempts {
            self.teleport.find_attempts = attempts;
        }
        if let Some(threshold) = args.cache_threshold {
            self.teleport.cache_threshold = threshold;
        }
        if let Some(pre_cache) = args.pre_cache {
            self.teleport.pre_cache = pre_cache;
        }
        if args.min_range.is_some() || args.max_range.is_some() {
            let scope = self.teleport.scope_mut(args.world.as_deref());
            if let Some(min) = args.min_range {
                scope.min_range = Some(min);
            }
            if let Some(max) = args.max_range {
                scope.max_range = Some(max);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            find_attempts: Some(3),
            max_range: Some(500.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.seed, 99);
        assert_eq!(config.teleport.find_attempts, 3);
        assert_eq!(config.teleport.global.max_range, Some(500.0));
        // Non-overridden fields retain defaults
        assert_eq!(config.teleport.cache_threshold, 10);
        assert_eq!(config.teleport.global.min_range, None);
    }

    #[test]
    fn test_cli_range_override_per_world() {
        let mut config = Config::default();
        config.teleport.per_world = true;
        let args = CliArgs {
            world: Some("nether".to_string()),
            min_range: Some(20.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.teleport.worlds["nether"].min_range, Some(20.0));
        assert_eq!(config.teleport.global.min_range, None);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "wayfarer",
            "--world",
            "overworld",
            "--min-range",
            "10",
            "--requests",
            "2",
        ]);
        assert_eq!(args.world.as_deref(), Some("overworld"));
        assert_eq!(args.min_range, Some(10.0));
        assert_eq!(args.requests, 2);
    }
}
