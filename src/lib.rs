//! BIND Exporter
//!
//! Polls the statistics channel of a BIND name server and exposes the
//! counters as Prometheus metrics.
//!
//! # Features
//!
//! * JSON v1, XML v2 and XML v3 statistics dialects
//! * Automatic dialect detection on every poll
//! * Operator selectable statistic groups (server, view, tasks, traffic)
//! * Resolver round trip time and packet size histograms
//!
//! # Architecture
//!
//! * `bind` - Fetching, decoding and normalization into canonical statistics
//! * `exporter` - Prometheus collector and metric catalogue
//! * `web` - HTTP exposition of the registry
//! * `config` - Command line configuration

/// BIND statistics channel client and canonical model
pub mod bind;

/// Command line configuration
pub mod config;

/// Prometheus collector
pub mod exporter;

/// HTTP server exposing metrics
pub mod web;
