//! Configuration module
//!
//! Loads crawl configuration from TOML (or the legacy JSON shape) and
//! validates it. Missing seeds or keywords are fatal here, before any
//! request is made.
//!
//! # Example
//!
//! ```no_run
//! use keyword_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Max depth: {:?}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, MatchingConfig, OutputConfig};

pub use parser::{compute_config_hash, load_config, read_config};
pub use validation::validate;
