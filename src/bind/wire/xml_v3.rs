use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::bind::wire::TaskManagerSection;

pub const SERVER_PATH: &str = "/xml/v3/server";
pub const STATUS_PATH: &str = "/xml/v3/status";
pub const TASKS_PATH: &str = "/xml/v3/tasks";
pub const TRAFFIC_PATH: &str = "/xml/v3/traffic";
pub const ZONES_PATH: &str = "/xml/v3/zones";

/// `<counters type="...">`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Counters {
    #[serde(rename = "@type")]
    pub kind: String,
    pub counter: Vec<Counter>,
}

/// `<counter name="...">value</counter>`
#[derive(Debug, Default, Deserialize)]
pub struct Counter {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "$text", default)]
    pub value: u64,
}

/// `<rrset><name>..</name><counter>..</counter></rrset>`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RRset {
    pub name: String,
    pub counter: u64,
}

/// `/xml/v3/server`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ServerDocument {
    pub server: ServerSection,
    pub views: ViewsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerSection {
    pub boot_time: Option<DateTime<Utc>>,
    pub config_time: Option<DateTime<Utc>>,
    pub counters: Vec<Counters>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewsSection {
    pub view: Vec<ViewSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    #[serde(rename = "@name")]
    pub name: String,
    pub counters: Vec<Counters>,
    pub cache: Vec<CacheSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub rrset: Vec<RRset>,
}

/// `/xml/v3/status`, only used to probe for this dialect
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusDocument {
    pub server: StatusSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StatusSection {
    pub boot_time: Option<DateTime<Utc>>,
    pub version: String,
}

/// `/xml/v3/tasks`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TasksDocument {
    pub taskmgr: TaskManagerSection,
}

/// `/xml/v3/zones`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZonesDocument {
    pub views: ZoneViewsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneViewsSection {
    pub view: Vec<ZoneViewSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneViewSection {
    #[serde(rename = "@name")]
    pub name: String,
    pub zones: ZonesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZonesSection {
    pub zone: Vec<ZoneSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneSection {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@rdataclass")]
    pub rdataclass: String,
    pub serial: String,
}

/// `/xml/v3/traffic`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrafficDocument {
    pub traffic: TrafficSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TrafficSection {
    pub ipv4: ProtocolSection,
    pub ipv6: ProtocolSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProtocolSection {
    pub udp: TransportSection,
    pub tcp: TransportSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TransportSection {
    pub counters: Vec<Counters>,
}
