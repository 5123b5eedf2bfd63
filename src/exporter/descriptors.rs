//! Metric descriptor registry
//!
//! All metric names, help texts and label schemas live here. The tables are
//! built once and never change, so polls running in parallel can share them.

use std::collections::HashMap;

use lazy_static::lazy_static;
use prometheus::core::Desc;
use prometheus::proto::MetricType;

use crate::bind::groups::{StatisticGroup, StatisticGroups};

pub const NAMESPACE: &str = "bind";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    pub fn metric_type(self) -> MetricType {
        match self {
            MetricKind::Counter => MetricType::COUNTER,
            MetricKind::Gauge => MetricType::GAUGE,
            MetricKind::Histogram => MetricType::HISTOGRAM,
        }
    }
}

/// Static description of one metric family
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub kind: MetricKind,
}

impl MetricDef {
    pub fn desc(&self) -> prometheus::Result<Desc> {
        Desc::new(
            self.name.to_string(),
            self.help.to_string(),
            self.labels.iter().map(|label| label.to_string()).collect(),
            HashMap::new(),
        )
    }
}

macro_rules! metric {
    ($ident:ident, $kind:ident, $name:expr, $help:expr, [$($label:expr),*]) => {
        pub static $ident: MetricDef = MetricDef {
            name: $name,
            help: $help,
            labels: &[$($label),*],
            kind: MetricKind::$kind,
        };
    };
}

metric!(UP, Gauge, "bind_up", "Was the BIND instance query successful?", []);

// Server
metric!(
    BOOT_TIME,
    Gauge,
    "bind_boot_time_seconds",
    "Start time of the BIND process since unix epoch in seconds.",
    []
);
metric!(
    CONFIG_TIME,
    Gauge,
    "bind_config_time_seconds",
    "Time of the last reconfiguration since unix epoch in seconds.",
    []
);
metric!(
    INCOMING_QUERIES,
    Counter,
    "bind_incoming_queries_total",
    "Number of incoming DNS queries.",
    ["type"]
);
metric!(
    INCOMING_REQUESTS,
    Counter,
    "bind_incoming_requests_total",
    "Number of incoming DNS requests.",
    ["opcode"]
);
metric!(
    RESPONSE_RCODES,
    Counter,
    "bind_response_rcodes_total",
    "Number of responses sent per RCODE.",
    ["rcode"]
);
metric!(QUERY_ERRORS, Counter, "bind_query_errors_total", "Number of query failures.", ["error"]);
metric!(RESPONSES, Counter, "bind_responses_total", "Number of responses sent.", ["result"]);
metric!(
    QUERY_DUPLICATES,
    Counter,
    "bind_query_duplicates_total",
    "Number of duplicated queries received.",
    []
);
metric!(
    QUERY_RECURSIONS,
    Counter,
    "bind_query_recursions_total",
    "Number of queries causing recursion.",
    []
);
metric!(
    ZONE_TRANSFER_REJECTED,
    Counter,
    "bind_zone_transfer_rejected_total",
    "Number of rejected zone transfers.",
    []
);
metric!(
    ZONE_TRANSFER_SUCCESS,
    Counter,
    "bind_zone_transfer_success_total",
    "Number of successful zone transfers.",
    []
);
metric!(
    ZONE_TRANSFER_FAILURE,
    Counter,
    "bind_zone_transfer_failure_total",
    "Number of failed zone transfers.",
    []
);
metric!(
    RECURSIVE_CLIENTS,
    Gauge,
    "bind_recursive_clients",
    "Number of current recursive clients.",
    []
);
metric!(
    RPZ_REWRITES,
    Counter,
    "bind_response_policy_zone_rewrites_total",
    "Number of response policy zone rewrites.",
    []
);

// Views
metric!(
    RESOLVER_CACHE,
    Gauge,
    "bind_resolver_cache_rrsets",
    "Number of RRsets in Cache database.",
    ["view", "type"]
);
metric!(
    RESOLVER_QUERIES,
    Counter,
    "bind_resolver_queries_total",
    "Number of outgoing DNS queries.",
    ["view", "type"]
);
metric!(
    RESOLVER_CACHE_STATS,
    Counter,
    "bind_resolver_cache_stats",
    "Cache statistics counters.",
    ["view", "type"]
);
metric!(
    RESOLVER_QUERY_DURATION,
    Histogram,
    "bind_resolver_query_duration_seconds",
    "Resolver query round-trip time in seconds.",
    ["view"]
);
metric!(
    RESOLVER_QUERY_ERRORS,
    Counter,
    "bind_resolver_query_errors_total",
    "Number of failed resolver queries.",
    ["view", "error"]
);
metric!(
    RESOLVER_RESPONSE_ERRORS,
    Counter,
    "bind_resolver_response_errors_total",
    "Number of resolver response errors received.",
    ["view", "error"]
);
metric!(
    RESOLVER_DNSSEC_SUCCESS,
    Counter,
    "bind_resolver_dnssec_validation_success_total",
    "Number of DNSSEC validation attempts succeeded.",
    ["view", "result"]
);
metric!(
    RESOLVER_RESPONSE_LAME,
    Counter,
    "bind_resolver_response_lame_total",
    "Number of lame delegation responses received.",
    ["view"]
);
metric!(
    RESOLVER_QUERY_EDNS0_ERRORS,
    Counter,
    "bind_resolver_query_edns0_errors_total",
    "Number of EDNS(0) query errors.",
    ["view"]
);
metric!(
    RESOLVER_RESPONSE_MISMATCH,
    Counter,
    "bind_resolver_response_mismatch_total",
    "Number of mismatch responses received.",
    ["view"]
);
metric!(
    RESOLVER_QUERY_RETRIES,
    Counter,
    "bind_resolver_query_retries_total",
    "Number of resolver query retries.",
    ["view"]
);
metric!(
    RESOLVER_RESPONSE_TRUNCATED,
    Counter,
    "bind_resolver_response_truncated_total",
    "Number of truncated responses received.",
    ["view"]
);
metric!(
    RESOLVER_DNSSEC_ERRORS,
    Counter,
    "bind_resolver_dnssec_validation_errors_total",
    "Number of DNSSEC validation attempt errors.",
    ["view"]
);
metric!(ZONE_SERIAL, Gauge, "bind_zone_serial", "Zone serial number.", ["view", "zone_name"]);

// Tasks
metric!(TASKS_RUNNING, Gauge, "bind_tasks_running", "Number of running tasks.", []);
metric!(
    WORKER_THREADS,
    Gauge,
    "bind_worker_threads",
    "Total number of available worker threads.",
    []
);

// Traffic
metric!(
    TRAFFIC_RECEIVED,
    Histogram,
    "bind_traffic_received_size",
    "Received traffic packet sizes.",
    ["transport"]
);
metric!(
    TRAFFIC_SENT,
    Histogram,
    "bind_traffic_sent_size",
    "Sent traffic packet sizes.",
    ["transport"]
);

lazy_static! {
    /// Name server and zone statistics published under a shared label
    pub static ref SERVER_LABEL_STATS: StatTable = {
        let mut stats = HashMap::new();
        stats.insert("QryDropped", &QUERY_ERRORS);
        stats.insert("QryFailure", &QUERY_ERRORS);
        stats.insert("QrySuccess", &RESPONSES);
        stats.insert("QryReferral", &RESPONSES);
        stats.insert("QryNxrrset", &RESPONSES);
        stats.insert("QrySERVFAIL", &RESPONSES);
        stats.insert("QryFORMERR", &RESPONSES);
        stats.insert("QryNXDOMAIN", &RESPONSES);
        stats
    };

    /// Name server and zone statistics published as their own metric
    pub static ref SERVER_METRIC_STATS: StatTable = {
        let mut stats = HashMap::new();
        stats.insert("QryDuplicate", &QUERY_DUPLICATES);
        stats.insert("QryRecursion", &QUERY_RECURSIONS);
        stats.insert("XfrRej", &ZONE_TRANSFER_REJECTED);
        stats.insert("XfrSuccess", &ZONE_TRANSFER_SUCCESS);
        stats.insert("XfrFail", &ZONE_TRANSFER_FAILURE);
        stats.insert("RecursClients", &RECURSIVE_CLIENTS);
        stats.insert("RPZRewrites", &RPZ_REWRITES);
        stats
    };

    /// Resolver statistics published under a shared label
    pub static ref RESOLVER_LABEL_STATS: StatTable = {
        let mut stats = HashMap::new();
        stats.insert("QueryAbort", &RESOLVER_QUERY_ERRORS);
        stats.insert("QuerySockFail", &RESOLVER_QUERY_ERRORS);
        stats.insert("QueryTimeout", &RESOLVER_QUERY_ERRORS);
        stats.insert("NXDOMAIN", &RESOLVER_RESPONSE_ERRORS);
        stats.insert("SERVFAIL", &RESOLVER_RESPONSE_ERRORS);
        stats.insert("FORMERR", &RESOLVER_RESPONSE_ERRORS);
        stats.insert("OtherError", &RESOLVER_RESPONSE_ERRORS);
        stats.insert("REFUSED", &RESOLVER_RESPONSE_ERRORS);
        stats.insert("ValOk", &RESOLVER_DNSSEC_SUCCESS);
        stats.insert("ValNegOk", &RESOLVER_DNSSEC_SUCCESS);
        stats
    };

    /// Resolver statistics published as their own metric
    pub static ref RESOLVER_METRIC_STATS: StatTable = {
        let mut stats = HashMap::new();
        stats.insert("Lame", &RESOLVER_RESPONSE_LAME);
        stats.insert("EDNS0Fail", &RESOLVER_QUERY_EDNS0_ERRORS);
        stats.insert("Mismatch", &RESOLVER_RESPONSE_MISMATCH);
        stats.insert("Retry", &RESOLVER_QUERY_RETRIES);
        stats.insert("Truncated", &RESOLVER_RESPONSE_TRUNCATED);
        stats.insert("ValFail", &RESOLVER_DNSSEC_ERRORS);
        stats
    };
}

static SERVER_METRICS: [&MetricDef; 14] = [
    &BOOT_TIME,
    &CONFIG_TIME,
    &INCOMING_QUERIES,
    &INCOMING_REQUESTS,
    &RESPONSE_RCODES,
    &QUERY_ERRORS,
    &RESPONSES,
    &QUERY_DUPLICATES,
    &QUERY_RECURSIONS,
    &ZONE_TRANSFER_REJECTED,
    &ZONE_TRANSFER_SUCCESS,
    &ZONE_TRANSFER_FAILURE,
    &RECURSIVE_CLIENTS,
    &RPZ_REWRITES,
];

static VIEW_METRICS: [&MetricDef; 14] = [
    &RESOLVER_CACHE,
    &RESOLVER_QUERIES,
    &RESOLVER_CACHE_STATS,
    &RESOLVER_QUERY_DURATION,
    &RESOLVER_QUERY_ERRORS,
    &RESOLVER_RESPONSE_ERRORS,
    &RESOLVER_DNSSEC_SUCCESS,
    &RESOLVER_RESPONSE_LAME,
    &RESOLVER_QUERY_EDNS0_ERRORS,
    &RESOLVER_RESPONSE_MISMATCH,
    &RESOLVER_QUERY_RETRIES,
    &RESOLVER_RESPONSE_TRUNCATED,
    &RESOLVER_DNSSEC_ERRORS,
    &ZONE_SERIAL,
];

static TASK_METRICS: [&MetricDef; 2] = [&TASKS_RUNNING, &WORKER_THREADS];

static TRAFFIC_METRICS: [&MetricDef; 2] = [&TRAFFIC_RECEIVED, &TRAFFIC_SENT];

/// Every metric family a group can emit
pub fn group_metrics(group: StatisticGroup) -> &'static [&'static MetricDef] {
    match group {
        StatisticGroup::Server => &SERVER_METRICS,
        StatisticGroup::View => &VIEW_METRICS,
        StatisticGroup::Tasks => &TASK_METRICS,
        StatisticGroup::Traffic => &TRAFFIC_METRICS,
    }
}

pub type StatTable = HashMap<&'static str, &'static MetricDef>;

/// Prometheus descriptors for `bind_up` and the selected groups, plus the
/// statistic name tables used while emitting
pub struct Descriptors {
    descs: Vec<Desc>,
    server_label_stats: &'static StatTable,
    server_metric_stats: &'static StatTable,
    resolver_label_stats: &'static StatTable,
    resolver_metric_stats: &'static StatTable,
}

impl Descriptors {
    pub fn new(groups: &StatisticGroups) -> prometheus::Result<Descriptors> {
        let mut descs = vec![UP.desc()?];
        for group in groups.iter() {
            for def in group_metrics(group) {
                descs.push(def.desc()?);
            }
        }

        Ok(Descriptors {
            descs,
            server_label_stats: &SERVER_LABEL_STATS,
            server_metric_stats: &SERVER_METRIC_STATS,
            resolver_label_stats: &RESOLVER_LABEL_STATS,
            resolver_metric_stats: &RESOLVER_METRIC_STATS,
        })
    }

    pub fn descs(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    /// Name server and zone statistics published under a shared label
    pub fn server_label_stat(&self, name: &str) -> Option<&'static MetricDef> {
        self.server_label_stats.get(name).copied()
    }

    /// Name server and zone statistics published as their own metric
    pub fn server_metric_stat(&self, name: &str) -> Option<&'static MetricDef> {
        self.server_metric_stats.get(name).copied()
    }

    pub fn resolver_label_stat(&self, name: &str) -> Option<&'static MetricDef> {
        self.resolver_label_stats.get(name).copied()
    }

    pub fn resolver_metric_stat(&self, name: &str) -> Option<&'static MetricDef> {
        self.resolver_metric_stats.get(name).copied()
    }
}
