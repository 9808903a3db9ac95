//! Decoding and normalization core for JSA shogi game records.
//!
//! Three upstream sources describe the same games in three different
//! encodings: the mobile-live API (proprietary binary, decoded by an
//! external collaborator into JKF), the AI auto-transcription JSON feed,
//! and the Meijin paid feed (`key=value` block text plus KIF downloads).
//! This crate turns each of them into one canonical JKF record with
//! identical header metadata, so that the same game decoded from any
//! source compares equal.
//!
//! All decoding is pure and synchronous; fetching, persistence and
//! scheduling live elsewhere.

pub mod ai;
pub mod error;
pub mod jkf;
pub mod meijin;
pub mod metadata;
pub mod normalize;
pub mod record;
pub mod tournament;

pub use error::DecodeError;
pub use jkf::Jkf;
pub use record::{MetadataKey, Record};
