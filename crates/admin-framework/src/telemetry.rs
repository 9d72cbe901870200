//! # Tracing Setup
//!
//! One compact subscriber for the whole process. Levels come from `RUST_LOG`
//! and default to `info`:
//!
//! ```text
//! RUST_LOG=debug cargo run -p storefront-admin
//! RUST_LOG=admin_framework=debug,storefront_admin=info cargo run -p storefront-admin
//! ```
//!
//! Stores log with a `resource` field (`products`, `tags`, ...) and domain
//! clients open an instrumented span per call, so a line such as
//! `INFO adjust_stock{id=3 delta=-2}: Updated resource="products" id=3`
//! already carries the full context without module paths.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, from the binary.
///
/// A second call is a no-op.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // the `resource` field identifies the store
        .compact()
        .try_init();
}
