//! pairlens - Uniswap V2 pair inspector
//!
//! Run with: cargo run -- <PAIR_ADDRESS>
//!
//! Batches the pair's read-only calls through the Multicall2 aggregator:
//! two RPC round trips per pair instead of ten individual calls.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod abi;
mod config;
mod display;
mod error;
mod fetcher;
mod format;
mod multicall;
mod session;
mod types;

use abi::EXAMPLE_PAIR;
use config::Config;
use error::FetchError;
use fetcher::PairFetcher;
use multicall::{BatchMode, HttpTransport, MulticallClient};
use session::FetchGuard;
use types::PairSnapshot;

#[derive(Parser, Debug)]
#[command(
    name = "pairlens",
    about = "Inspect the on-chain state of a Uniswap V2 pair",
    version
)]
struct Cli {
    /// Pair contract address to inspect
    address: Option<String>,

    /// Use the well-known ETH-USDC pair
    #[arg(long)]
    example: bool,

    /// Emit the snapshot as JSON instead of styled text
    #[arg(long)]
    json: bool,

    /// Read addresses interactively from stdin
    #[arg(long)]
    watch: bool,

    /// Attribute batch failures per call via tryAggregate
    #[arg(long)]
    tolerant: bool,

    /// Override the RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Load configuration from a TOML file
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🔍 PAIRLENS - Uniswap V2 Pair Inspector").cyan().bold()
    );
    println!(
        "{}",
        style("    Multicall-batched reads | 2 round trips per pair").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pairlens=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if cli.tolerant {
        config.batch_mode = BatchMode::Tolerant;
    }
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        return Err(e);
    }

    let transport = HttpTransport::new(config.rpc_url.clone(), config.request_timeout());
    let client = MulticallClient::new(transport, config.multicall_address(), config.batch_mode);
    let fetcher = Arc::new(PairFetcher::new(client));

    if cli.watch {
        print_banner();
        return run_interactive(fetcher, cli.json).await;
    }

    let address = if cli.example {
        EXAMPLE_PAIR.to_string()
    } else {
        match cli.address {
            Some(address) => address,
            None => {
                return Err(eyre::eyre!(
                    "provide a pair address, or use --example / --watch"
                ))
            }
        }
    };

    if !cli.json {
        print_banner();
    }
    run_once(fetcher, &address, cli.json).await
}

async fn run_once(
    fetcher: Arc<PairFetcher<HttpTransport>>,
    address: &str,
    json: bool,
) -> Result<()> {
    let spinner = loading_spinner();
    let result = fetcher.fetch_pair(address).await;
    spinner.finish_and_clear();

    match result {
        Ok(snapshot) => print_snapshot(&snapshot, json),
        Err(err) => {
            debug!(error = %err, "pair fetch failed");
            eprintln!("{} {}", style("✗").red(), err.user_message());
            std::process::exit(1);
        }
    }
}

/// Prompt loop: one fetch task per submitted address. Tasks are never
/// cancelled; the generation guard discards any result that was superseded
/// by a newer submission while in flight.
async fn run_interactive(fetcher: Arc<PairFetcher<HttpTransport>>, json: bool) -> Result<()> {
    println!(
        "Enter a pair address per line ({} fills in the ETH-USDC pair, {} leaves).",
        style("example").bold(),
        style("quit").bold()
    );

    let guard = Arc::new(FetchGuard::new());
    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, Result<PairSnapshot, FetchError>)>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim().to_string();
                if input.is_empty() {
                    prompt();
                    continue;
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
                    break;
                }
                let address = if input.eq_ignore_ascii_case("example") {
                    EXAMPLE_PAIR.to_string()
                } else {
                    input
                };

                let generation = guard.begin();
                println!("{}", style("fetching...").dim());
                let fetcher = fetcher.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = fetcher.fetch_pair(&address).await;
                    let _ = tx.send((generation, result));
                });
            }
            Some((generation, result)) = rx.recv() => {
                if !guard.is_current(generation) {
                    debug!(generation, "discarding superseded fetch result");
                    continue;
                }
                match result {
                    Ok(snapshot) => print_snapshot(&snapshot, json)?,
                    Err(err) => {
                        debug!(error = %err, "pair fetch failed");
                        println!("{} {}", style("✗").red(), err.user_message());
                    }
                }
                prompt();
            }
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &PairSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", display::render_json(snapshot)?);
    } else {
        print!("{}", display::render_text(snapshot));
    }
    Ok(())
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Fetching pair data...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn prompt() {
    print!("{} ", style("pair>").cyan().bold());
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
