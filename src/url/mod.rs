//! URL handling module
//!
//! Canonicalization of discovered links, seed parsing, host extraction and
//! the scope filter that keeps a crawl on its seed's host. Everything here
//! is a pure function.

mod host;
mod normalize;
mod scope;

pub use host::extract_host;
pub use normalize::{normalize, normalize_link, parse_seed, NormalizeOptions};
pub use scope::{in_scope, url_in_scope, ScopePolicy};
