/* src/controller/mod.rs */

//!
//! Top-level composition: bootstrap once, then hand off to the reload loop.

mod error;
mod live;

pub use error::LiveError;
pub use live::{LiveLimits, LiveLimitsBuilder};
