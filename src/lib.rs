/* src/lib.rs */

//!
//! Resolution and hot reloading of rate-limiting configuration.
//!
//! This crate integrates five components:
//!
//! - **binder**: YAML text to typed documents, with placeholder-document cleanup.
//! - **status**: Immutable snapshots pairing limiter factories with lifecycle status.
//! - **bootstrap**: One-time decision of where configuration comes from.
//! - **reload**: Background polling that publishes new snapshots atomically.
//! - **controller**: Unified interface integrating the above (`LiveLimits`).
//!
//! A failed refresh never takes working factories away: the previous snapshot
//! is republished with its update status set to error.
//!
//! ## Feature Flags
//!
//! - `http`: Enables `HttpFetcher`, a `reqwest` based fetcher used by default
//!   when a dynamic URL is configured.
//!
//! ## Basic Usage
//!
//! See `demos/basic.rs` for a complete example.

pub mod binder;
pub mod bootstrap;
pub mod clock;
pub mod controller;
pub mod reload;
pub mod status;
