//! `animechan` - collect anime quotes into a JSON file.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use animechan_http::{
    cli::{Cli, CollectArgs, Command},
    collect::{self, CollectionReport},
    Quote, QuoteClient, ResponseCache, DEFAULT_CACHE_TTL,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "animechan_http=info,animechan=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Collect(args) => run_collect(args).await,
    }
}

async fn run_collect(args: CollectArgs) -> anyhow::Result<()> {
    let quotes = if args.offline {
        load_sample(args.sample.as_deref())?
    } else {
        collect_live(&args).await?
    };

    let report = CollectionReport::new(args.characters, args.shows, quotes);
    collect::write_report(&args.output, &report)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Written {} quotes to {}",
        report.meta.record_count,
        args.output.display()
    );
    Ok(())
}

async fn collect_live(args: &CollectArgs) -> anyhow::Result<Vec<Quote>> {
    let cache = Arc::new(open_cache(args.cache_file.as_deref()));
    let client = build_client(args)?.with_cache(Arc::clone(&cache));

    let characters = args.characters.clone().unwrap_or_default();
    let shows = args.shows.clone().unwrap_or_default();
    let outcome = collect::bulk_fetch(&client, &characters, &shows, Some(args.limit)).await;

    if let Some(path) = &args.cache_file {
        cache
            .save(path)
            .with_context(|| format!("failed to flush cache to {}", path.display()))?;
    }

    if outcome.all_failed() {
        tracing::warn!("API fetch failed, falling back to sample data");
        return load_sample(args.sample.as_deref());
    }
    Ok(collect::dedupe(outcome.quotes))
}

fn build_client(args: &CollectArgs) -> anyhow::Result<QuoteClient> {
    let client = QuoteClient::from_env().map_err(anyhow::Error::msg)?;
    let client = match &args.base_url {
        Some(url) => client.override_base_url(url.as_str()),
        None => client,
    };
    Ok(client.with_options(args.client_options()))
}

fn open_cache(path: Option<&Path>) -> ResponseCache {
    let Some(path) = path.filter(|path| path.exists()) else {
        return ResponseCache::with_ttl(DEFAULT_CACHE_TTL);
    };
    match ResponseCache::load(path, Some(DEFAULT_CACHE_TTL)) {
        Ok(cache) => {
            tracing::debug!(path = %path.display(), entries = cache.len(), "cache loaded");
            cache
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable cache file: {err}");
            ResponseCache::with_ttl(DEFAULT_CACHE_TTL)
        }
    }
}

fn load_sample(path: Option<&Path>) -> anyhow::Result<Vec<Quote>> {
    match path {
        Some(path) => collect::load_sample(path)
            .with_context(|| format!("sample data not found or invalid: {}", path.display())),
        None => collect::bundled_sample().context("bundled sample data is invalid"),
    }
}
