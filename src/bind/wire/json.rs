use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

pub const SERVER_PATH: &str = "/json/v1/server";
pub const TASKS_PATH: &str = "/json/v1/tasks";
pub const TRAFFIC_PATH: &str = "/json/v1/traffic";
pub const ZONES_PATH: &str = "/json/v1/zones";

/// Counters keyed by name. Iteration order is unspecified.
pub type Counters = HashMap<String, u64>;

/// `/json/v1/server`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerDocument {
    pub boot_time: Option<DateTime<Utc>>,
    pub config_time: Option<DateTime<Utc>>,
    pub opcodes: Counters,
    pub qtypes: Counters,
    pub nsstats: Counters,
    pub rcodes: Counters,
    pub zonestats: Counters,
    pub views: BTreeMap<String, ViewDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewDocument {
    pub resolver: ResolverDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolverDocument {
    pub cache: Counters,
    pub qtypes: Counters,
    pub stats: Counters,
    pub cachestats: Counters,
}

/// `/json/v1/zones`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZonesDocument {
    pub views: BTreeMap<String, ZoneViewDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneViewDocument {
    pub zones: Vec<ZoneDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneDocument {
    pub name: String,
    pub class: String,
    pub serial: Serial,
}

/// Zone serial as a number, or as a string for zones without one
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Serial {
    Number(u32),
    Text(String),
}

impl Default for Serial {
    fn default() -> Self {
        Serial::Text(String::new())
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Serial::Number(serial) => write!(f, "{}", serial),
            Serial::Text(serial) => f.write_str(serial),
        }
    }
}

/// `/json/v1/tasks`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasksDocument {
    pub taskmgr: TaskManagerDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TaskManagerDocument {
    pub thread_model: String,
    pub worker_threads: u64,
    pub default_quantum: u64,
    pub tasks_running: u64,
    pub tasks: Vec<TaskDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskDocument {
    pub id: String,
    pub name: String,
    pub references: u64,
    pub state: String,
    pub quantum: u64,
    pub events: u64,
}

/// `/json/v1/traffic`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrafficDocument {
    pub traffic: TrafficSizes,
}

/// BIND names the received TCP request histograms `...-sent-...`; both
/// spellings are accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrafficSizes {
    #[serde(rename = "dns-udp-requests-sizes-received-ipv4")]
    pub received_udp_v4: Counters,
    #[serde(rename = "dns-udp-responses-sizes-sent-ipv4")]
    pub sent_udp_v4: Counters,
    #[serde(
        rename = "dns-tcp-requests-sizes-sent-ipv4",
        alias = "dns-tcp-requests-sizes-received-ipv4"
    )]
    pub received_tcp_v4: Counters,
    #[serde(rename = "dns-tcp-responses-sizes-sent-ipv4")]
    pub sent_tcp_v4: Counters,
    #[serde(rename = "dns-udp-requests-sizes-received-ipv6")]
    pub received_udp_v6: Counters,
    #[serde(rename = "dns-udp-responses-sizes-sent-ipv6")]
    pub sent_udp_v6: Counters,
    #[serde(
        rename = "dns-tcp-requests-sizes-sent-ipv6",
        alias = "dns-tcp-requests-sizes-received-ipv6"
    )]
    pub received_tcp_v6: Counters,
    #[serde(rename = "dns-tcp-responses-sizes-sent-ipv6")]
    pub sent_tcp_v6: Counters,
}
