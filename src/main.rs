use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use party_time::demo::demo_snapshot;
use party_time::http_cache::HttpCache;
use party_time::logging;
use party_time::persist::{self, Bundle, build_bundle};
use party_time::projection::ProjectionConfig;
use party_time::provider::{self, ProviderConfig};
use party_time::snapshot::{Snapshot, load_snapshot};
use party_time::state::{AppState, ProviderCommand, apply_delta};

#[derive(Parser, Debug)]
#[command(name = "party_time", version, about = "Playoff clinch and party-time projections")]
struct Cli {
    /// Also write a daily rolling log file here.
    #[arg(long, env = "PARTY_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project one snapshot and print the bundle.
    Project {
        /// Snapshot file path or http(s) URL.
        #[arg(long, env = "PARTY_SOURCE")]
        source: String,
        #[arg(long, env = "PARTY_OUT_DIR")]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        bracket: BracketArgs,
    },
    /// Poll a snapshot source and publish a bundle whenever it changes.
    Watch {
        #[arg(long, env = "PARTY_SOURCE")]
        source: String,
        #[arg(long, env = "PARTY_OUT_DIR")]
        out_dir: Option<PathBuf>,
        /// Stop the poller after the first published bundle.
        #[arg(long)]
        once: bool,
        #[command(flatten)]
        bracket: BracketArgs,
    },
    /// Project a generated league.
    Demo {
        #[arg(long, default_value_t = 2021)]
        seed: u64,
        #[arg(long, default_value_t = 60)]
        day: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        bracket: BracketArgs,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct BracketArgs {
    /// Playoff field size per subleague.
    #[arg(long, default_value_t = 4)]
    bracket_size: usize,
    /// Bottom teams tracked as the underbracket (0 disables it).
    #[arg(long, default_value_t = 0)]
    underbracket: usize,
}

impl BracketArgs {
    fn config(self) -> ProjectionConfig {
        ProjectionConfig {
            bracket_size: self.bracket_size,
            underbracket_size: self.underbracket,
            ..ProjectionConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();
    let _guard = logging::init(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Project {
            source,
            out_dir,
            bracket,
        } => {
            let mut http = HttpCache::new();
            let loaded = load_snapshot(&source, &mut http)?;
            publish_once(&loaded.snapshot, bracket.config(), out_dir)
        }
        Command::Watch {
            source,
            out_dir,
            once,
            bracket,
        } => {
            let out_dir = out_dir
                .or_else(persist::default_out_dir)
                .ok_or_else(|| anyhow!("no output directory; pass --out-dir"))?;
            run_watch(ProviderConfig::from_env(source, bracket.config()), out_dir, once)
        }
        Command::Demo {
            seed,
            day,
            out_dir,
            bracket,
        } => publish_once(&demo_snapshot(seed, day), bracket.config(), out_dir),
    }
}

fn publish_once(snapshot: &Snapshot, config: ProjectionConfig, out_dir: Option<PathBuf>) -> Result<()> {
    let projection = snapshot.project(&config).context("projection failed")?;
    let bundle = build_bundle(snapshot, projection);
    if let Some(dir) = out_dir {
        let path = persist::write_bundle(&dir, &bundle)?;
        info!(path = %path.display(), "bundle written");
    }
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(())
}

fn run_watch(config: ProviderConfig, out_dir: PathBuf, once: bool) -> Result<()> {
    info!(
        source = %config.source,
        poll_secs = config.poll.as_secs(),
        out_dir = %out_dir.display(),
        "watching snapshot source"
    );

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = provider::spawn_provider(config, tx, cmd_rx);

    let mut state = AppState::new();
    for delta in rx {
        apply_delta(&mut state, delta);
        if let Some(bundle) = state.take_pending() {
            publish(&out_dir, bundle);
            if once {
                // The poller may already be gone; join below either way.
                let _ = cmd_tx.send(ProviderCommand::Stop);
                break;
            }
        }
    }

    handle
        .join()
        .map_err(|_| anyhow!("provider thread panicked"))?;
    Ok(())
}

fn publish(out_dir: &std::path::Path, bundle: &Bundle) {
    match persist::write_bundle(out_dir, bundle) {
        Ok(path) => info!(
            season = bundle.season + 1,
            day = bundle.day + 1,
            path = %path.display(),
            "bundle published"
        ),
        Err(err) => warn!("bundle write failed: {err:#}"),
    }
}
