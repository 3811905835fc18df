//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Log levels come from the `RUST_LOG` environment variable.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Subscriptions settling, mutations succeeding or failing
//! RUST_LOG=info cargo run
//!
//! # Every fetch with its generation, stale responses being discarded, mutation payloads
//! RUST_LOG=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup and shutdown of the sync actor and the memory backend
//! - **Queries**: `Subscribe`, `Fetch` (with `generation`), `Query settled` / `Query failed`
//! - **Stale responses**: `Discarding stale response` with the stale and current generation
//! - **Mutations**: `Mutate` (payload at debug), `Mutation succeeded`, `Mutation failed`
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG Subscribe id=sub_1 resource=fueling enabled=false
//! DEBUG Parameters changed id=sub_1 key_changed=false enabled=true
//! DEBUG Fetch id=sub_1 generation=1 resource=fueling
//! INFO Query settled id=sub_1 resource=fueling count=2
//! DEBUG Mutate resource=fueling action=Create payload={...}
//! INFO Mutation succeeded resource=fueling
//! DEBUG Invalidate resource=fueling count=1
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
