use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::bind::wire::TaskManagerSection;

/// The whole v2 tree is served from the root of the statistics channel
pub const STATS_PATH: &str = "/";

/// `<opcode>`, `<rdtype>`, `<nsstat>`, ... all share this shape
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Counter {
    pub name: String,
    pub counter: u64,
}

/// `<isc><bind><statistics>`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IscDocument {
    pub bind: BindSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BindSection {
    pub statistics: StatisticsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatisticsSection {
    pub server: ServerSection,
    pub views: ViewsSection,
    pub taskmgr: TaskManagerSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerSection {
    pub boot_time: Option<DateTime<Utc>>,
    pub requests: RequestsSection,
    pub queries_in: QueriesInSection,
    pub nsstat: Vec<Counter>,
    pub zonestat: Vec<Counter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RequestsSection {
    pub opcode: Vec<Counter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QueriesInSection {
    pub rdtype: Vec<Counter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewsSection {
    pub view: Vec<ViewSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewSection {
    pub name: String,
    pub cache: Vec<CacheSection>,
    pub rdtype: Vec<Counter>,
    pub resstat: Vec<Counter>,
    pub zones: ZonesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub rrset: Vec<Counter>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZonesSection {
    pub zone: Vec<ZoneSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZoneSection {
    pub name: String,
    pub rdataclass: String,
    pub serial: String,
}
