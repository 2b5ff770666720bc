//! Keyword Crawler main entry point
//!
//! This is the command-line interface for the keyword crawler.

use anyhow::Context;
use clap::Parser;
use keyword_crawler::config::{compute_config_hash, read_config, validate, Config};
use keyword_crawler::crawler::run_crawl;
use keyword_crawler::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keyword Crawler: find pages that mention your keywords
///
/// Crawls each base URL breadth-first, staying on its host, and writes every
/// page whose text mentions a keyword to a CSV file. Links that fail to load
/// are appended to an error log together with the page that referenced them.
#[derive(Parser, Debug)]
#[command(name = "keyword-crawler")]
#[command(version)]
#[command(about = "Find pages containing keywords and report broken links", long_about = None)]
struct Cli {
    /// Base URLs to start crawling from
    #[arg(value_name = "URL")]
    base_urls: Vec<String>,

    /// Comma-separated list of keywords to search for
    #[arg(short, long)]
    keywords: Option<String>,

    /// Path to a TOML or JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Results CSV path
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Broken-link log path
    #[arg(long, value_name = "FILE")]
    error_log: Option<String>,

    /// Maximum link depth from each base URL
    #[arg(long)]
    max_depth: Option<u32>,

    /// Also follow links to subdomains of the base host
    #[arg(long)]
    include_subdomains: bool,

    /// Follow links to any host (combine with --max-depth)
    #[arg(long)]
    allow_external: bool,

    /// Drop query strings from discovered links
    #[arg(long)]
    strip_query: bool,

    /// Start each base URL with an empty visited set
    #[arg(long)]
    per_seed_visited: bool,

    /// Maximum number of requests in flight
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Skip URLs disallowed by robots.txt
    #[arg(long)]
    respect_robots: bool,

    /// Only match keywords on word boundaries
    #[arg(long)]
    whole_words: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("keyword_crawler=info,warn"),
            1 => EnvFilter::new("keyword_crawler=debug,info"),
            2 => EnvFilter::new("keyword_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, if any, and layers the command line on top
///
/// Base URLs and keywords from the command line are appended to those from
/// the file; every other flag overrides the file's value.
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = read_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.base_urls.extend(cli.base_urls.iter().cloned());
    if let Some(keywords) = &cli.keywords {
        config
            .keywords
            .extend(keywords.split(',').map(|k| k.trim().to_string()));
    }

    if let Some(path) = &cli.output {
        config.output.results_path = path.clone();
    }
    if let Some(path) = &cli.error_log {
        config.output.error_log_path = path.clone();
    }

    let crawler = &mut config.crawler;
    if cli.max_depth.is_some() {
        crawler.max_depth = cli.max_depth;
    }
    if let Some(concurrency) = cli.concurrency {
        crawler.concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        crawler.timeout_seconds = timeout;
    }
    crawler.include_subdomains |= cli.include_subdomains;
    crawler.same_host_only &= !cli.allow_external;
    crawler.strip_query |= cli.strip_query;
    crawler.shared_visited &= !cli.per_seed_visited;
    crawler.respect_robots |= cli.respect_robots;
    config.matching.whole_words |= cli.whole_words;

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Keyword Crawler Dry Run ===\n");

    println!("Base URLs ({}):", config.base_urls.len());
    for url in &config.base_urls {
        println!("  - {}", url);
    }

    println!("\nKeywords ({}):", config.keywords.len());
    for keyword in &config.keywords {
        println!("  - {}", keyword);
    }

    let crawler = &config.crawler;
    println!("\nCrawler Configuration:");
    match crawler.max_depth {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Scope: {:?}", crawler.scope_policy());
    println!("  Shared visited set: {}", crawler.shared_visited);
    println!("  Concurrency: {}", crawler.concurrency);
    println!("  Timeout: {}s", crawler.timeout_seconds);
    println!("  Respect robots.txt: {}", crawler.respect_robots);
    println!("  User agent: {}", crawler.user_agent);
    println!("  Whole words: {}", config.matching.whole_words);

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);
    println!("  Error log: {}", config.output.error_log_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Crawling {} base URL(s) for {} keyword(s)",
        config.base_urls.len(),
        config.keywords.len()
    );

    match run_crawl(config).await {
        Ok(stats) => {
            print_statistics(&stats);
            println!(
                "\nCrawling complete. Results saved to {}",
                config.output.results_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
