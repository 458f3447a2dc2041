// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, controlled by RUST_LOG, printed to stderr)
// 2. Parse command-line arguments using clap
// 3. Crawl the site, printing each link's verdict as soon as it's known
// 4. Exit with proper code (0 = all healthy, 1 = broken links, 2 = fatal error)
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Traits: ConsoleSink implements ResultSink, the crawler doesn't care how
//   results are shown
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - fetching, link extraction, classification
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - frozen run settings
mod crawl; // src/crawl/ - frontier, dispatcher and the crawl loop
mod error; // src/error.rs - error types

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use tracing_subscriber::EnvFilter;

use checker::{classify, HttpFetcher};
use cli::Cli;
use crawl::{CollectingSink, CrawlResult, CrawlSummary, Crawler, ResultSink};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    init_tracing();

    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Bad seed URL, bad filter... nothing was fetched
            eprintln!("Fatal: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with results (or JSON) on stdout.
// Default level is warn; use RUST_LOG=link_health=debug to see every request
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = every link is healthy
//   Ok(1) = at least one link is down or unreachable
//   Err = fatal startup error
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version and a missing URL
    let cli = Cli::parse();
    let json = cli.json;

    let config = cli.into_config().context("cannot start crawl")?;
    let fetcher = HttpFetcher::new(&config)?;
    let crawler = Crawler::new(config, fetcher);

    let summary = if json {
        let mut sink = CollectingSink::default();
        let summary = crawler.run(&mut sink).await?;
        print_json(&sink, &summary)?;
        summary
    } else {
        println!("🔍 Crawling: {}", crawler.config().seed);
        println!("📊 Max crawl depth: {}\n", crawler.config().max_depth);

        let mut sink = ConsoleSink;
        let summary = crawler.run(&mut sink).await?;
        print_summary(&summary);
        summary
    };

    if summary.has_unhealthy() {
        Ok(1) // Exit code 1 = broken links found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Prints one line per result, as soon as the crawler reports it
struct ConsoleSink;

impl ResultSink for ConsoleSink {
    fn healthy(&mut self, result: &CrawlResult) {
        println!("✅ Link to {} is healthy", result.url);
    }

    fn unhealthy(&mut self, result: &CrawlResult, status: u16) {
        println!("❌ Link to {} is down with status {}", result.url, status);
    }

    fn error(&mut self, url: &str, reason: &str) {
        println!("{}", error_line(url, reason));
    }

    fn setup_error(&mut self, seed: &str, reason: &str) {
        println!("{}", setup_error_line(seed, reason));
    }
}

fn error_line(url: &str, reason: &str) -> String {
    format!("⚠️  Error: Request to {} failed. Reason: {}", url, reason)
}

// Nothing was requested here, so don't word it like a broken link
fn setup_error_line(seed: &str, reason: &str) -> String {
    format!("⚙️  Setup problem for crawl of {}: {}", seed, reason)
}

// Prints everything the crawl collected as a single JSON document
fn print_json(sink: &CollectingSink, summary: &CrawlSummary) -> Result<()> {
    let results: Vec<_> = sink
        .results
        .iter()
        .map(|result| {
            serde_json::json!({
                "result": result,
                "verdict": classify(result),
            })
        })
        .collect();
    let errors: Vec<_> = sink
        .errors
        .iter()
        .map(|(url, reason)| serde_json::json!({ "url": url, "reason": reason }))
        .collect();
    let setup_errors: Vec<_> = sink
        .setup_errors
        .iter()
        .map(|(seed, reason)| serde_json::json!({ "seed": seed, "reason": reason }))
        .collect();

    let output = serde_json::json!({
        "results": results,
        "errors": errors,
        "setup_errors": setup_errors,
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_summary(summary: &CrawlSummary) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Healthy: {}", summary.healthy);
    println!("   ❌ Down: {}", summary.unhealthy);
    println!("   ⚠️  Unreachable: {}", summary.failed);
    println!("   🔗 Skipped links (not http/https): {}", summary.discarded_links);
    println!("   📋 Total checked: {}", summary.fetched);
}
