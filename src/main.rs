// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the HTTP collaborators and the crawl engine
// 3. Wire Ctrl-C to the engine's cancellation flag
// 4. Run the crawl, print the summary, save any requested reports
// 5. Exit with proper code (0 = clean, 1 = problems found, 2 = error)
//
// Rust concepts used:
// - async/await: The crawl is network-bound
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Arc + AtomicBool: Sharing the cancellation flag with the signal handler
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - link extraction + HTTP collaborators
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the traversal engine and outcome records
mod report; // src/report/ - the result snapshot and file renderers

use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use checker::{HttpConfig, PageFetcher, StatusProber};
use cli::Cli;
use crawl::{CrawlConfig, CrawlEngine, LinkOutcome};
use report::ScanReport;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = scan finished, nothing broken
//   Ok(1) = broken or erroring links found
//   Err = unexpected error (invalid seed URL, report file problems)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    print_banner(&cli);

    let config = CrawlConfig {
        max_urls: cli.max_urls,
        max_depth: cli.max_depth,
        // Negative delays make no sense; clamp instead of panicking
        delay: Duration::from_secs_f64(cli.delay.max(0.0)),
        same_origin_only: !cli.external,
    };

    // One HTTP configuration feeds both collaborators
    let http = HttpConfig::default();
    let fetcher = PageFetcher::new(&http)?;
    let prober = StatusProber::new(&http)?;

    let mut engine = CrawlEngine::new(config, fetcher, prober);

    // Ctrl-C sets the cancellation flag; the engine stops issuing requests
    // and we still get a report for everything checked so far
    let cancel = engine.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n[!] Scan interrupted by user");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    engine.crawl(&cli.website_url).await?;

    let scan_report = engine.into_report();
    print_summary(&scan_report);

    // Save reports if requested
    if let Some(path) = &cli.json {
        report::save_json_report(&scan_report, path)?;
    }
    if let Some(path) = &cli.csv {
        report::save_csv_report(&scan_report, path)?;
    }

    if scan_report.has_failures() {
        Ok(1) // Exit code 1 = problems found
    } else {
        Ok(0) // Exit code 0 = all good
    }
}

// Prints the startup banner with the effective configuration
fn print_banner(cli: &Cli) {
    println!("🔍 LINKSCOUT STARTING");
    println!("{}", "=".repeat(40));
    println!("Target URL: {}", cli.website_url);
    println!("Max URLs: {}", cli.max_urls);
    println!("Max Depth: {}", cli.max_depth);
    println!("Delay: {}s", cli.delay);
    println!(
        "Domain Filter: {}",
        if cli.external {
            "All domains"
        } else {
            "Same origin only"
        }
    );
    if let Some(path) = &cli.json {
        println!("JSON Output: {}", path.display());
    }
    if let Some(path) = &cli.csv {
        println!("CSV Output: {}", path.display());
    }
    println!("{}", "=".repeat(40));
}

// Prints the end-of-scan summary with itemized broken and erroring links
fn print_summary(scan_report: &ScanReport) {
    println!("\n{}", "=".repeat(60));
    println!("🔍 LINKSCOUT SUMMARY");
    println!("{}", "=".repeat(60));

    println!(
        "Scan Duration: {:.2} seconds",
        scan_report.scan_info.duration_seconds
    );
    println!(
        "Total URLs processed: {}",
        scan_report.statistics.total_urls_processed
    );
    println!("Working links: {}", scan_report.statistics.working_links_count);
    println!("Broken links: {}", scan_report.statistics.broken_links_count);
    println!("Error links: {}", scan_report.statistics.error_links_count);

    if !scan_report.results.broken_links.is_empty() {
        println!(
            "\n❌ BROKEN LINKS ({}):",
            scan_report.results.broken_links.len()
        );
        for record in &scan_report.results.broken_links {
            if let LinkOutcome::Broken { status_code, .. } = &record.outcome {
                println!("  • {} (Status: {})", record.url, status_code);
            }
        }
    }

    if !scan_report.results.error_links.is_empty() {
        println!(
            "\n⚠️  ERROR LINKS ({}):",
            scan_report.results.error_links.len()
        );
        for record in &scan_report.results.error_links {
            if let LinkOutcome::Erroring { error, .. } = &record.outcome {
                println!("  • {} ({})", record.url, error);
            }
        }
    }

    println!("\n{}", "=".repeat(60));
}
