//! Canonical, version independent statistics model
//!
//! Every wire dialect is normalized into these types. A `Statistics` value is
//! built from scratch on each poll and only read afterwards.

use chrono::{DateTime, Utc};

use crate::bind::traffic::BucketLayout;

/// Everything retrieved from BIND in one poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub server: Server,
    pub views: Vec<View>,
    pub zone_views: Vec<ZoneView>,
    pub task_manager: TaskManager,
    pub traffic: TrafficHistograms,
}

/// Server wide counters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    pub boot_time: Option<DateTime<Utc>>,
    pub config_time: Option<DateTime<Utc>>,
    /// Incoming queries by query type
    pub incoming_queries: Vec<Counter>,
    /// Incoming requests by opcode
    pub incoming_requests: Vec<Counter>,
    pub name_server_stats: Vec<Counter>,
    pub zone_statistics: Vec<Counter>,
    /// Responses by rcode
    pub server_rcodes: Vec<Counter>,
}

/// Resolver and cache statistics of a single view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub name: String,
    /// Cached RRsets by type
    pub cache: Vec<Gauge>,
    pub resolver_stats: Vec<Counter>,
    /// Outgoing resolver queries by type
    pub resolver_queries: Vec<Counter>,
    pub cache_stats: Vec<Counter>,
}

/// Zones configured in a single view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneView {
    pub name: String,
    pub zone_data: Vec<ZoneCounter>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneCounter {
    pub name: String,
    /// SOA serial, kept as the decimal string BIND reported
    pub serial: String,
}

impl ZoneCounter {
    pub fn new(name: &str, serial: &str) -> ZoneCounter {
        ZoneCounter {
            name: name.to_string(),
            serial: serial.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter {
    pub name: String,
    pub counter: u64,
}

impl Counter {
    pub fn new(name: &str, counter: u64) -> Counter {
        Counter {
            name: name.to_string(),
            counter,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gauge {
    pub name: String,
    pub gauge: u64,
}

impl Gauge {
    pub fn new(name: &str, gauge: u64) -> Gauge {
        Gauge {
            name: name.to_string(),
            gauge,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskManager {
    pub tasks: Vec<Task>,
    pub thread_model: ThreadModel,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub quantum: u64,
    pub references: u64,
    pub state: String,
    pub events: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadModel {
    pub model_type: String,
    pub worker_threads: u64,
    pub default_quantum: u64,
    pub tasks_running: u64,
}

/// Direction of traffic relative to the BIND server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Received,
    Sent,
}

impl Direction {
    /// Bucket layout BIND uses for this direction
    pub fn layout(self) -> BucketLayout {
        match self {
            Direction::Received => BucketLayout::INBOUND,
            Direction::Sent => BucketLayout::OUTBOUND,
        }
    }
}

/// Packet size histograms, one slot per bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficHistograms {
    pub received_udp_v4: Vec<u64>,
    pub sent_udp_v4: Vec<u64>,
    pub received_tcp_v4: Vec<u64>,
    pub sent_tcp_v4: Vec<u64>,
    pub received_udp_v6: Vec<u64>,
    pub sent_udp_v6: Vec<u64>,
    pub received_tcp_v6: Vec<u64>,
    pub sent_tcp_v6: Vec<u64>,
}

impl TrafficHistograms {
    /// Histograms of the fixed layout lengths with every slot at zero
    pub fn zeroed() -> TrafficHistograms {
        let received = vec![0; Direction::Received.layout().slots()];
        let sent = vec![0; Direction::Sent.layout().slots()];

        TrafficHistograms {
            received_udp_v4: received.clone(),
            sent_udp_v4: sent.clone(),
            received_tcp_v4: received.clone(),
            sent_tcp_v4: sent.clone(),
            received_udp_v6: received.clone(),
            sent_udp_v6: sent.clone(),
            received_tcp_v6: received,
            sent_tcp_v6: sent,
        }
    }

    /// All eight histograms with their direction and transport label
    pub fn series(&self) -> [(Direction, &'static str, &[u64]); 8] {
        [
            (Direction::Received, "udpv4", &self.received_udp_v4[..]),
            (Direction::Sent, "udpv4", &self.sent_udp_v4[..]),
            (Direction::Received, "tcpv4", &self.received_tcp_v4[..]),
            (Direction::Sent, "tcpv4", &self.sent_tcp_v4[..]),
            (Direction::Received, "udpv6", &self.received_udp_v6[..]),
            (Direction::Sent, "udpv6", &self.sent_udp_v6[..]),
            (Direction::Received, "tcpv6", &self.received_tcp_v6[..]),
            (Direction::Sent, "tcpv6", &self.sent_tcp_v6[..]),
        ]
    }
}
