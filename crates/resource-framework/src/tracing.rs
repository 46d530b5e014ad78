//! # Observability & Tracing
//!
//! The framework logs through `tracing` with structured fields; this module
//! installs the subscriber.
//!
//! ## What Gets Traced
//!
//! - **Client operations**: one span per call (`list`, `get_by_id`, `create`,
//!   ...) carrying the resource name, plus a `Sending request` event
//! - **HTTP**: an `outgoing_http` span per request with method, URL and status
//! - **Cache**: hits, joins of in-flight fetches, invalidations (debug level)
//! - **Facade outcomes**: `Mutation succeeded` / `Operation failed` with the
//!   resource and operation name
//!
//! ## Usage Examples
//!
//! ```bash
//! # Outcomes and failures only
//! RUST_LOG=info cargo run
//!
//! # Requests, cache decisions, retries
//! RUST_LOG=debug cargo run
//!
//! # Framework internals only
//! RUST_LOG=resource_framework=debug cargo run
//! ```
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG list: Fetch started key=[tenants, list, page, 1, page_size, 10]
//! DEBUG list: Sending request resource="tenants" context="list" method=GET url=/api/v1/tenants
//! DEBUG Cache hit key=[tenants, list, page, 1, page_size, 10]
//! DEBUG Invalidated key=[tenants, list] removed=1
//! INFO Mutation succeeded resource=tenants context="create"
//! ```

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter` when the variable is unset or invalid.
pub fn setup_tracing_with(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // resource names are carried as fields instead
        .compact()
        .init();
}

/// [`setup_tracing_with`] defaulting to `info`.
pub fn setup_tracing() {
    setup_tracing_with("info");
}
