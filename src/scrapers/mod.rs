//! Site scraping: link discovery, content extraction, and per-site loops.
//!
//! Scraping follows a consistent two-phase pattern for every source:
//!
//! 1. **Discovery**: Find candidate article links on the site's listing page
//! 2. **Extraction**: Download each article page and extract its body text
//!
//! # Variants
//!
//! | Module | Sites | Method |
//! |--------|-------|--------|
//! | [`generic`] | selector-configured sites (CBC, La Presse, Guardian, ...) | per-site selector rules from the registry |
//! | [`radio_canada`] | Radio-Canada section pages | ordered fallback selectors + retrying fetcher |
//!
//! # Failure policy
//!
//! Nothing here aborts a run. Transport failures and selector misses are
//! logged and become empty results; a bad article is skipped without
//! affecting the rest of its site, and a dead site contributes zero articles
//! without affecting the crawl.

pub mod fetch;
pub mod generic;
pub mod radio_canada;
