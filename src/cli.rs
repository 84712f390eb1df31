// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// linkscout has a single job - scan one website - so there are no
// subcommands: one positional URL plus a handful of tuning flags.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "linkscout",
    version = "0.1.0",
    about = "Crawl a website and report broken links",
    long_about = "linkscout crawls a website starting from a seed URL, checks every link it \
                  discovers, and classifies each one as working, broken, or erroring. \
                  Results can be saved as JSON or CSV reports for CI pipelines."
)]
pub struct Cli {
    /// Website URL to scan (e.g., https://example.com)
    pub website_url: String,

    /// Maximum number of URLs to check before stopping
    ///
    /// This is the global safety valve: however big the site is, the scan
    /// never issues more than this many checks.
    #[arg(long, default_value_t = 100)]
    pub max_urls: usize,

    /// Maximum crawl depth
    ///
    /// Depth 0 = check only the seed page and its links
    /// Depth 1 = also expand the pages the seed links to
    /// etc.
    #[arg(long, default_value_t = 2)]
    pub max_depth: usize,

    /// Delay in seconds between requests (politeness throttle)
    ///
    /// Fractions are allowed, e.g. --delay 0.5
    #[arg(long, default_value_t = 1.0)]
    pub delay: f64,

    /// Follow links to other domains too
    ///
    /// By default the scan stays on the seed URL's exact host[:port]
    #[arg(long)]
    pub external: bool,

    /// Save a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Save a CSV report to this file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,
}
