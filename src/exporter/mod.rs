//! Prometheus side of the exporter
//!
//! Turns canonical [`crate::bind::Statistics`] into metric families on every
//! scrape. Metric names and label schemas are fixed in [`descriptors`].

/// Scrape time collector
pub mod collector;
pub mod descriptors;
/// Statistics to metric family mapping
pub mod emit;
pub mod families;
pub mod process;
/// Resolver round trip time histogram
pub mod rtt;

pub use collector::Exporter;
pub use descriptors::{Descriptors, MetricDef, MetricKind, NAMESPACE};
pub use process::{register_build_info, register_process_collector};
pub use rtt::{rtt_histogram, RttHistogram};
