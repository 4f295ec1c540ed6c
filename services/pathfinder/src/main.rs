//! Pathfinder command-line service

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::PathfinderConfig;
use orderbook::{
    add_liquidity_pools, CancellationToken, FixedDestinationRequest, FixedSourceRequest,
    OrderBookGraph, SearchLimits,
};
use tracing::info;
use types::{Amount, Asset};

use pathfinder::logging::init_logging;
use pathfinder::query::{run_query_with_token, to_json, PathQuery};
use pathfinder::{
    load_events, log_error, log_ledger, log_metrics, log_pool, log_success, log_warning, replay,
};

/// Reserves given to each synthesized pool, per side
const SYNTHETIC_POOL_RESERVE: Amount = 1_000_000_000;
const SYNTHETIC_POOL_FEE_BPS: u32 = 30;

#[derive(Parser, Debug)]
#[command(name = "pathfinder")]
#[command(about = "Multi-hop path search over ledger offers and liquidity pools")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger events file, overriding the configured one
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,

    /// Add a constant-product pool to every offer pair without one
    #[arg(long)]
    synthesize_pools: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Best destination amounts for a fixed source amount
    FindFixed {
        /// Asset being sent, `native` or `CODE:ISSUER`
        #[arg(long)]
        source: Asset,
        #[arg(long)]
        amount: Amount,
        /// Destination assets, in result order
        #[arg(long = "destination", required = true)]
        destinations: Vec<Asset>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Minimal source amounts for a fixed destination amount
    FindPaths {
        /// Asset being received
        #[arg(long)]
        destination: Asset,
        #[arg(long)]
        amount: Amount,
        /// Candidate source assets, in result order
        #[arg(long = "source", required = true)]
        sources: Vec<Asset>,
        #[command(flatten)]
        limits: LimitArgs,
    },
    /// Print graph statistics after replay
    Stats,
}

#[derive(Args, Debug)]
struct LimitArgs {
    #[arg(long)]
    max_path_length: Option<usize>,
    #[arg(long)]
    max_assets_per_path: Option<usize>,
    /// Search offer books only
    #[arg(long)]
    no_pools: bool,
    /// Search deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl LimitArgs {
    fn resolve(&self, config: &PathfinderConfig) -> (SearchLimits, Duration) {
        let limits = SearchLimits::new(
            self.max_path_length.unwrap_or(config.search.max_path_length),
            self.max_assets_per_path
                .unwrap_or(config.search.max_assets_per_path),
            config.search.include_pools && !self.no_pools,
        );
        let timeout = Duration::from_millis(self.timeout_ms.unwrap_or(config.search.timeout_ms));
        (limits, timeout)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.global.log_level.clone());
    init_logging(&log_level, cli.json_logs || config.global.json_logs)?;

    info!("🚀 Starting pathfinder v{}", env!("CARGO_PKG_VERSION"));

    let graph = build_graph(&cli, &config)?;

    let (query, timeout) = match cli.command {
        Command::Stats => return print_stats(&graph),
        Command::FindFixed {
            source,
            amount,
            destinations,
            limits,
        } => {
            let (limits, timeout) = limits.resolve(&config);
            let request = FixedSourceRequest {
                source_asset: source,
                source_amount: amount,
                destination_assets: destinations,
                limits,
            };
            (PathQuery::FixedSource(request), timeout)
        }
        Command::FindPaths {
            destination,
            amount,
            sources,
            limits,
        } => {
            let (limits, timeout) = limits.resolve(&config);
            let request = FixedDestinationRequest {
                destination_asset: destination,
                destination_amount: amount,
                source_assets: sources,
                limits,
            };
            (PathQuery::FixedDestination(request), timeout)
        }
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log_warning!("Received Ctrl+C, cancelling search");
            shutdown.cancel();
        }
    });

    match run_query_with_token(Arc::new(graph), query, timeout, cancel).await {
        Ok(response) => {
            println!("{}", to_json(&response)?);
            Ok(())
        }
        Err(e) => {
            log_error!("Search failed: {}", e);
            Err(e.into())
        }
    }
}

fn build_graph(cli: &Cli, config: &PathfinderConfig) -> Result<OrderBookGraph> {
    let events_path = cli
        .events
        .clone()
        .unwrap_or_else(|| config.ingestion.events_path.clone());

    let mut graph = OrderBookGraph::new();
    let events = load_events(&events_path)?;
    log_ledger!("Loaded {} events from {}", events.len(), events_path.display());

    let summary = replay(&mut graph, events)?;
    if summary.rejected_entries > 0 || summary.skipped_ledgers > 0 {
        log_warning!(
            "Replay rejected {} entries and skipped {} ledgers",
            summary.rejected_entries, summary.skipped_ledgers
        );
    }
    let pending = graph.pending_changes();
    if pending > 0 {
        log_warning!(
            "Discarding {} changes staged after the last ledger close",
            pending
        );
        graph.discard();
    }
    log_success!(
        "Graph at ledger {} with {} offers and {} pools",
        graph.current_version(),
        graph.offers().len(),
        graph.pools().len()
    );

    if cli.synthesize_pools || config.ingestion.synthesize_pools {
        let next_ledger = graph
            .current_version()
            .checked_add(1)
            .context("Ledger sequence exhausted")?;
        let added = add_liquidity_pools(
            &graph,
            SYNTHETIC_POOL_RESERVE,
            SYNTHETIC_POOL_FEE_BPS,
            next_ledger,
        )?;
        log_pool!("Synthesized {} pools at ledger {}", added, next_ledger);
    }

    Ok(graph)
}

fn print_stats(graph: &OrderBookGraph) -> Result<()> {
    let snapshot = graph.snapshot();
    graph.verify().context("Graph failed consistency check")?;
    log_metrics!(
        "ledger={} version={} offers={} pools={} books={}",
        snapshot.ledger_sequence(),
        snapshot.version(),
        snapshot.offer_count(),
        snapshot.pool_count(),
        snapshot.index().book_count()
    );
    let stats = serde_json::json!({
        "ledger_sequence": snapshot.ledger_sequence(),
        "version": snapshot.version(),
        "offers": snapshot.offer_count(),
        "pools": snapshot.pool_count(),
        "books": snapshot.index().book_count(),
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
