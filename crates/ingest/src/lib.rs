//! Upstream fetch layer for the three JSA game-data sources.
//!
//! Each upstream gets an explicit configuration record (base URL,
//! credentials, response transform) and its own client; there is no
//! shared mutable state, so batches of games can be fetched and decoded
//! with whatever fan-out the caller chooses.

pub mod clients;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::IngestError;
