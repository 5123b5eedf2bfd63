//! BIND statistics channel: fetching, decoding and normalization
//!
//! Documents are fetched through [`fetch::Fetch`], decoded into the
//! dialect specific types of [`wire`], and normalized into the canonical
//! [`model::Statistics`] by [`normalize`]. [`client::BindClient`] ties these
//! together for one poll.

/// Category routing of counter groups
pub mod category;
/// Polling in a pinned or detected dialect
pub mod client;
/// Deduplication of repeated counters
pub mod dedup;
pub mod errors;
/// HTTP retrieval of raw documents
pub mod fetch;
/// Operator selectable statistic groups
pub mod groups;
/// Canonical statistics model
pub mod model;
/// Wire documents into canonical statistics
pub mod normalize;
/// Packet size histograms
pub mod traffic;
/// Wire representations per dialect
pub mod wire;

pub use client::{BindClient, Client, Decoder, StatsVersion};
pub use errors::{BindError, DecodeError, MalformedBucketError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use groups::{StatisticGroup, StatisticGroups};
pub use model::Statistics;

/// Prefix of resolver counters holding round trip time buckets
pub const QRY_RTT: &str = "QryRTT";
