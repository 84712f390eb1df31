// src/checker/mod.rs
// =============================================================================
// This module contains link discovery and reachability checking.
//
// Submodules:
// - http: The HTTP collaborators (HEAD prober, page fetcher)
// - html: Extracts candidate links from HTML pages
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items to simplify imports for users of this module
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod html;
mod http;

// Re-export public items from submodules
// This lets users write `checker::extract_links()` instead of
// `checker::html::extract_links()`
pub use html::{extract_links, is_valid_url, url_authority};
pub use http::{HttpConfig, PageFetcher, ProbeResult, StatusProber};
