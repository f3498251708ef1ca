//! Game Booster - live CPU and memory monitor
//!
//! Streams samples to the terminal with rolling sparklines of recent usage.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use futures_util::StreamExt;
use game_booster::{
    render, MetricsHistory, Sample, Sampler, SamplerConfig, SystemCollector,
    DEFAULT_CANCELLATION_CHECK_MS, DEFAULT_HISTORY_CAPACITY, DEFAULT_TICK_INTERVAL_MS,
};
use tracing::{info, level_filters::LevelFilter, Level, Subscriber};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "game_booster")]
#[command(about = "Live CPU and memory monitor with rolling history")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Samples CPU and memory usage at a fixed interval and renders recent history")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Sampling interval in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    interval: u64,

    /// Number of readings kept per metric
    #[arg(short, long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    capacity: usize,

    /// How often the sampler checks for cancellation while sleeping, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CANCELLATION_CHECK_MS)]
    check_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream samples until interrupted (default)
    Watch(WatchArgs),

    /// Take a single sample and exit
    Snapshot(SnapshotArgs),
}

#[derive(Args)]
struct WatchArgs {
    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    format: String,

    /// Stop after this many samples
    #[arg(short = 'n', long)]
    count: Option<u64>,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Watch(args)) => watch_command(&cli, args).await?,
        Some(Commands::Snapshot(args)) => snapshot_command(args).await?,
        None => {
            let watch_args = WatchArgs {
                format: "pretty".to_string(),
                count: None,
            };
            watch_command(&cli, &watch_args).await?;
        }
    }

    Ok(())
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// `RUST_LOG` wins when it parses, otherwise the level picked by the flags.
fn log_filter(cli: &Cli, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| {
            EnvFilter::default().add_directive(LevelFilter::from_level(log_level(cli)).into())
        })
}

fn build_subscriber(cli: &Cli, rust_log: Option<&str>) -> impl Subscriber + Send + Sync {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(cli, rust_log))
        .with_target(false)
        .compact()
        .finish()
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing::subscriber::set_global_default(build_subscriber(cli, rust_log.as_deref()))?;

    Ok(())
}

fn sampler_config(cli: &Cli) -> anyhow::Result<SamplerConfig> {
    let config = SamplerConfig::new(cli.interval, cli.capacity)
        .with_cancellation_check_ms(cli.check_ms);
    config.validate()?;
    Ok(config)
}

fn check_format(format: &str) -> anyhow::Result<()> {
    match format {
        "pretty" | "json" => Ok(()),
        other => bail!("Unsupported format: {}. Use 'json' or 'pretty'", other),
    }
}

async fn watch_command(cli: &Cli, args: &WatchArgs) -> anyhow::Result<()> {
    check_format(&args.format)?;
    let config = sampler_config(cli)?;

    let history = MetricsHistory::new(config.history_capacity)?;
    let mut sampler = Sampler::new(config).context("failed to initialise system sampler")?;
    let mut stream = sampler.start_stream()?;

    info!("Started sampling with {}ms interval", cli.interval);
    info!("  - History capacity: {}", cli.capacity);
    info!("  - Cancellation check: {}ms", cli.check_ms);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut received = 0u64;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping sampler");
                break;
            }
            next = stream.next() => {
                let Some(sample) = next else { break };
                history.record(&sample);
                print_sample(&sample, &history, &args.format)?;

                received += 1;
                if args.count.is_some_and(|count| received >= count) {
                    break;
                }
            }
        }
    }

    // stop() joins the sampler thread, bounded by one cancellation check
    tokio::task::block_in_place(|| sampler.stop());

    let counters = sampler.counters();
    info!(
        "Sampler stopped: {} delivered, {} skipped, {} dropped",
        counters.delivered, counters.skipped, counters.dropped
    );

    Ok(())
}

async fn snapshot_command(args: &SnapshotArgs) -> anyhow::Result<()> {
    check_format(&args.format)?;

    let sample = tokio::task::spawn_blocking(|| {
        let mut collector = SystemCollector::new()?;
        collector.single_sample()
    })
    .await??;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&sample)?);
    } else {
        println!("{}", render::status_line(&sample));
    }

    Ok(())
}

fn print_sample(sample: &Sample, history: &MetricsHistory, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string(sample)?);
        return Ok(());
    }

    let snapshot = history.snapshot();
    println!(
        "[{}] {}",
        sample.captured_at.format("%H:%M:%S"),
        render::status_line(sample)
    );
    println!("  CPU {}", render::sparkline(&snapshot.cpu));
    println!("  RAM {}", render::sparkline(&snapshot.ram));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["game_booster", "--interval", "250"]).unwrap();
        assert_eq!(cli.interval, 250);
    }

    #[test]
    fn test_default_values() {
        let cli = Cli::try_parse_from(["game_booster"]).unwrap();
        assert_eq!(cli.interval, DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(cli.capacity, DEFAULT_HISTORY_CAPACITY);
        assert_eq!(cli.check_ms, DEFAULT_CANCELLATION_CHECK_MS);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_watch_count() {
        let cli = Cli::try_parse_from(["game_booster", "watch", "-n", "3", "--format", "json"])
            .unwrap();
        match cli.command {
            Some(Commands::Watch(args)) => {
                assert_eq!(args.count, Some(3));
                assert_eq!(args.format, "json");
            }
            _ => panic!("expected watch command"),
        }
    }

    /// (error, warn, info, debug, trace) as seen by the subscriber built from `args`
    fn enabled_levels(args: &[&str], rust_log: Option<&str>) -> [bool; 5] {
        let cli = Cli::try_parse_from(args).unwrap();
        tracing::subscriber::with_default(build_subscriber(&cli, rust_log), || {
            [
                tracing::enabled!(Level::ERROR),
                tracing::enabled!(Level::WARN),
                tracing::enabled!(Level::INFO),
                tracing::enabled!(Level::DEBUG),
                tracing::enabled!(Level::TRACE),
            ]
        })
    }

    #[test]
    fn test_debug_flag_enables_debug_logs() {
        let levels = enabled_levels(&["game_booster", "--debug"], None);
        assert_eq!(levels, [true, true, true, true, false]);
    }

    #[test]
    fn test_default_log_level_is_warn() {
        let levels = enabled_levels(&["game_booster"], None);
        assert_eq!(levels, [true, true, false, false, false]);

        let levels = enabled_levels(&["game_booster", "--verbose"], None);
        assert_eq!(levels, [true, true, true, false, false]);
    }

    #[test]
    fn test_rust_log_overrides_flags() {
        let levels = enabled_levels(&["game_booster", "--debug"], Some("error"));
        assert_eq!(levels, [true, false, false, false, false]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cli = Cli::try_parse_from(["game_booster", "--capacity", "0"]).unwrap();
        assert!(sampler_config(&cli).is_err());
        assert!(check_format("yaml").is_err());
    }
}
