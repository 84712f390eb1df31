// src/checker/html.rs
// =============================================================================
// This module extracts candidate links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so malformed markup never
//   fails the parse - we always get a best-effort partial document back
//
// We also use the `url` crate to:
// - Parse and validate URLs
// - Resolve relative hrefs to absolute URLs (like a browser does)
//
// Every href found on a page goes through three gates:
// 1. Resolve it against the page URL into an absolute URL
// 2. Keep it only if it has both a scheme and a host
// 3. If an origin filter is active, keep it only if its authority
//    (host[:port]) matches the crawl origin exactly
//
// Rust concepts:
// - HashSet: Deduplicated results with O(1) membership checks
// - Option<T>: For URLs that might not resolve
// - Iterators and pattern matching
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

// Extracts all checkable links from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//   base_url: the URL of the page (for resolving relative links)
//   origin_filter: Some(authority) to keep only links on that exact
//                  host[:port], None to keep links on any host
//
// Returns: HashSet<String> of absolute, deduplicated URLs
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = {"https://example.com/docs"}
pub fn extract_links(html: &str, base_url: &str, origin_filter: Option<&str>) -> HashSet<String> {
    let mut links = HashSet::new();

    // Parse the HTML into a document
    // html5ever is tolerant: broken tags produce a partial tree, not an error
    let document = Html::parse_document(html);

    // Create a CSS selector to find all <a> tags with an href attribute
    // Selector::parse returns Result, so we use .unwrap() which panics on error
    // This is OK here because our selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    // Parse the base URL once
    // We'll use this to resolve relative links
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => {
            // If the base URL is invalid, we can't resolve relative links
            eprintln!("Warning: Invalid base URL: {}", base_url);
            return links;
        }
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            // Try to convert this href to an absolute URL
            let resolved = match resolve_url(&base, href) {
                Some(url) => url,
                None => continue,
            };

            // A URL without a host never enters any set
            // This drops mailto:, tel:, javascript:, data: and friends, since
            // none of them carry an authority component
            if !resolved.has_host() {
                continue;
            }

            // Origin scoping: exact authority equality, nothing fancier
            // "sub.example.com" is a different origin from "example.com"
            if let Some(origin) = origin_filter {
                if url_authority(&resolved).as_deref() != Some(origin) {
                    continue;
                }
            }

            links.insert(resolved.to_string());
        }
    }

    links
}

// Checks whether a string is a valid absolute URL
//
// Valid means: it parses, and it has both a non-empty scheme and a host.
//
// Examples:
//   "https://example.com" -> true
//   "ftp://example.com"   -> true  (scheme value is unconstrained)
//   "not-a-url"           -> false (no scheme)
//   "//example.com"       -> false (protocol-relative, no scheme)
//   "mailto:a@b.com"      -> false (no host)
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.has_host(),
        Err(_) => false,
    }
}

// Returns the authority (host[:port]) of a URL, if it has one
//
// This is the string the origin filter compares against. The port only
// appears when it's explicit and non-default, matching how the url crate
// normalizes URLs.
pub fn url_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}

// Resolves a possibly-relative href to an absolute URL
//
// Parameters:
//   base: the base URL (the current page)
//   href: the href value (might be relative, might be absolute)
//
// Returns: Some(Url) or None if it can't be resolved
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "//cdn.example.com/x" -> Some("https://cdn.example.com/x")
//   href = "#section" -> Some("https://example.com/page#section")
//   href = "https://other.com" -> Some("https://other.com")
fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    // Url::join implements the standard base+relative resolution rules:
    // absolute hrefs pass through, relative paths and protocol-relative
    // hrefs resolve against the base
    base.join(href).ok()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why HashSet instead of Vec?
//    - Pages often link to the same URL many times (nav bars, footers)
//    - A set deduplicates for free, and the crawler doesn't care about order
//
// 2. What is url.join()?
//    - It resolves an href the way a browser would
//    - "https://example.com/a/b" + "../c" = "https://example.com/c"
//    - Already-absolute hrefs just replace the base entirely
//
// 3. Why does has_host() do so much filtering?
//    - mailto:, tel:, javascript: and data: URLs all parse successfully,
//      but none of them have an authority component
//    - Requiring a host drops all of them in one check
// -----------------------------------------------------------------------------
