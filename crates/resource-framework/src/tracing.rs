//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the subscriber every binary in the workspace uses: compact
//! output, no module prefix, level filtering through `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Store lifecycle**: `Store started` / `Shutdown` with the final collection size
//! - **Mutations**: `Created`, `Updated`, `Deleted` with `collection` and `id` fields
//! - **Sessions**: dialog opens, saves, rejections and detached responses
//! - **Uploads**: staged paths and sizes
//!
//! ```bash
//! RUST_LOG=info cargo run -p travel-admin
//! RUST_LOG=debug cargo run -p travel-admin   # payloads, HTTP verbs and URLs
//! RUST_LOG=resource_framework=trace cargo run -p travel-admin   # guard decisions
//! ```
//!
//! With `RUST_LOG=info` a successful create reads:
//!
//! ```text
//! INFO Store started collection="airports"
//! INFO create: Created collection="airports" id=7
//! INFO Saved collection="airports" id=7 verb="added"
//! ```

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
