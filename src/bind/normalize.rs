//! Conversion of decoded wire documents into the canonical model
//!
//! Each dialect has one entry point taking the documents fetched for the
//! selected groups. Documents for unselected groups are `None`, and fields
//! belonging to unselected groups stay empty even when a shared document
//! carries them.

use std::collections::HashMap;

use crate::bind::category::{route_server, route_view, CounterCategory};
use crate::bind::dedup::{dedup, merge_groups, non_zero_wins, CounterGroup};
use crate::bind::errors::MalformedBucketError;
use crate::bind::groups::{StatisticGroup, StatisticGroups};
use crate::bind::model::{
    Counter, Gauge, Server, Statistics, Task, TaskManager, ThreadModel, TrafficHistograms, View,
    ZoneCounter, ZoneView,
};
use crate::bind::traffic::BucketLayout;
use crate::bind::wire::{json, xml_v2, xml_v3};

/// Only zones of this class are kept
const ZONE_CLASS: &str = "IN";

/// Documents retrieved from the JSON v1 endpoints
#[derive(Debug, Default)]
pub struct JsonDocuments {
    pub server: Option<json::ServerDocument>,
    pub zones: Option<json::ZonesDocument>,
    pub tasks: Option<json::TasksDocument>,
    pub traffic: Option<json::TrafficDocument>,
}

/// Documents retrieved from the XML v3 endpoints
#[derive(Debug, Default)]
pub struct XmlV3Documents {
    pub server: Option<xml_v3::ServerDocument>,
    pub zones: Option<xml_v3::ZonesDocument>,
    pub tasks: Option<xml_v3::TasksDocument>,
    pub traffic: Option<xml_v3::TrafficDocument>,
}

pub fn from_json(
    docs: JsonDocuments,
    groups: &StatisticGroups,
) -> Result<Statistics, MalformedBucketError> {
    let mut stats = Statistics::default();

    if let Some(doc) = docs.server {
        if groups.contains(StatisticGroup::Server) {
            stats.server = json_server(&doc);
        }
        if groups.contains(StatisticGroup::View) {
            stats.views = doc.views.into_iter().map(json_view).collect();
        }
    }

    if let Some(doc) = docs.zones {
        stats.zone_views = doc
            .views
            .into_iter()
            .map(|(name, view)| ZoneView {
                name,
                zone_data: view
                    .zones
                    .into_iter()
                    .filter(|zone| zone.class == ZONE_CLASS)
                    .map(|zone| ZoneCounter {
                        serial: zone.serial.to_string(),
                        name: zone.name,
                    })
                    .collect(),
            })
            .collect();
    }

    if let Some(doc) = docs.tasks {
        let taskmgr = doc.taskmgr;
        stats.task_manager = TaskManager {
            tasks: taskmgr
                .tasks
                .into_iter()
                .map(|task| Task {
                    id: task.id,
                    name: task.name,
                    quantum: task.quantum,
                    references: task.references,
                    state: task.state,
                    events: task.events,
                })
                .collect(),
            thread_model: ThreadModel {
                model_type: taskmgr.thread_model,
                worker_threads: taskmgr.worker_threads,
                default_quantum: taskmgr.default_quantum,
                tasks_running: taskmgr.tasks_running,
            },
        };
    }

    if let Some(doc) = docs.traffic {
        stats.traffic = json_traffic(&doc.traffic)?;
    }

    Ok(stats)
}

fn json_counters(counters: &json::Counters) -> Vec<Counter> {
    counters
        .iter()
        .map(|(name, value)| Counter::new(name, *value))
        .collect()
}

fn json_server(doc: &json::ServerDocument) -> Server {
    let mut server = Server {
        boot_time: doc.boot_time,
        config_time: doc.config_time,
        ..Server::default()
    };

    let groups = vec![
        (CounterCategory::Opcode, &doc.opcodes),
        (CounterCategory::Qtype, &doc.qtypes),
        (CounterCategory::Nsstat, &doc.nsstats),
        (CounterCategory::Rcode, &doc.rcodes),
        (CounterCategory::Zonestat, &doc.zonestats),
    ];
    for (category, counters) in groups {
        if let Some(field) = category.server_field(&mut server) {
            field.extend(json_counters(counters));
        }
    }

    server
}

fn json_view((name, doc): (String, json::ViewDocument)) -> View {
    let resolver = doc.resolver;
    let mut view = View {
        name,
        cache: resolver
            .cache
            .iter()
            .map(|(name, value)| Gauge::new(name, *value))
            .collect(),
        ..View::default()
    };

    let groups = vec![
        (CounterCategory::Resqtype, &resolver.qtypes),
        (CounterCategory::Resstats, &resolver.stats),
        (CounterCategory::Cachestats, &resolver.cachestats),
    ];
    for (category, counters) in groups {
        if let Some(field) = category.view_field(&mut view) {
            field.extend(json_counters(counters));
        }
    }

    view
}

fn json_histogram(
    layout: BucketLayout,
    counters: &json::Counters,
) -> Result<Vec<u64>, MalformedBucketError> {
    layout.build(counters.iter().map(|(label, count)| (label.as_str(), *count)))
}

fn json_traffic(sizes: &json::TrafficSizes) -> Result<TrafficHistograms, MalformedBucketError> {
    let inbound = BucketLayout::INBOUND;
    let outbound = BucketLayout::OUTBOUND;

    Ok(TrafficHistograms {
        received_udp_v4: json_histogram(inbound, &sizes.received_udp_v4)?,
        sent_udp_v4: json_histogram(outbound, &sizes.sent_udp_v4)?,
        received_tcp_v4: json_histogram(inbound, &sizes.received_tcp_v4)?,
        sent_tcp_v4: json_histogram(outbound, &sizes.sent_tcp_v4)?,
        received_udp_v6: json_histogram(inbound, &sizes.received_udp_v6)?,
        sent_udp_v6: json_histogram(outbound, &sizes.sent_udp_v6)?,
        received_tcp_v6: json_histogram(inbound, &sizes.received_tcp_v6)?,
        sent_tcp_v6: json_histogram(outbound, &sizes.sent_tcp_v6)?,
    })
}

pub fn from_xml_v3(
    docs: XmlV3Documents,
    groups: &StatisticGroups,
) -> Result<Statistics, MalformedBucketError> {
    let mut stats = Statistics::default();

    if let Some(doc) = docs.server {
        if groups.contains(StatisticGroup::Server) {
            stats.server = v3_server(doc.server);
        }
        if groups.contains(StatisticGroup::View) {
            stats.views = v3_views(doc.views.view);
        }
    }

    if let Some(doc) = docs.zones {
        stats.zone_views = doc
            .views
            .view
            .into_iter()
            .map(|view| ZoneView {
                name: view.name,
                zone_data: view
                    .zones
                    .zone
                    .into_iter()
                    .filter(|zone| zone.rdataclass == ZONE_CLASS)
                    .map(|zone| ZoneCounter {
                        name: zone.name,
                        serial: zone.serial,
                    })
                    .collect(),
            })
            .collect();
    }

    if let Some(doc) = docs.tasks {
        stats.task_manager = TaskManager::from(doc.taskmgr);
    }

    if let Some(doc) = docs.traffic {
        stats.traffic = v3_traffic(doc.traffic)?;
    }

    Ok(stats)
}

fn v3_groups(counters: Vec<xml_v3::Counters>) -> Vec<CounterGroup> {
    counters
        .into_iter()
        .map(|group| CounterGroup {
            discriminator: group.kind,
            counters: group
                .counter
                .into_iter()
                .map(|counter| Counter {
                    name: counter.name,
                    counter: counter.value,
                })
                .collect(),
        })
        .collect()
}

fn v3_server(section: xml_v3::ServerSection) -> Server {
    let mut server = Server {
        boot_time: section.boot_time,
        config_time: section.config_time,
        ..Server::default()
    };

    for group in merge_groups(v3_groups(section.counters), non_zero_wins) {
        route_server(&mut server, &group.discriminator, group.counters);
    }

    server
}

/// Views repeated under one name are merged before deduplication
fn v3_views(sections: Vec<xml_v3::ViewSection>) -> Vec<View> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<(String, Vec<CounterGroup>, Vec<Gauge>)> = Vec::new();

    for section in sections {
        let cache = section
            .cache
            .into_iter()
            .flat_map(|cache| cache.rrset)
            .map(|rrset| Gauge {
                name: rrset.name,
                gauge: rrset.counter,
            });
        let groups = v3_groups(section.counters);

        let position = positions.get(&section.name).copied();
        match position {
            Some(index) => {
                merged[index].1.extend(groups);
                merged[index].2.extend(cache);
            }
            None => {
                positions.insert(section.name.clone(), merged.len());
                merged.push((section.name, groups, cache.collect()));
            }
        }
    }

    merged
        .into_iter()
        .map(|(name, groups, cache)| {
            let mut view = View {
                name,
                cache: dedup(cache, non_zero_wins),
                ..View::default()
            };
            for group in merge_groups(groups, non_zero_wins) {
                route_view(&mut view, &group.discriminator, group.counters);
            }
            view
        })
        .collect()
}

fn v3_traffic(section: xml_v3::TrafficSection) -> Result<TrafficHistograms, MalformedBucketError> {
    let (received_udp_v4, sent_udp_v4) = v3_transport(&section.ipv4.udp)?;
    let (received_tcp_v4, sent_tcp_v4) = v3_transport(&section.ipv4.tcp)?;
    let (received_udp_v6, sent_udp_v6) = v3_transport(&section.ipv6.udp)?;
    let (received_tcp_v6, sent_tcp_v6) = v3_transport(&section.ipv6.tcp)?;

    Ok(TrafficHistograms {
        received_udp_v4,
        sent_udp_v4,
        received_tcp_v4,
        sent_tcp_v4,
        received_udp_v6,
        sent_udp_v6,
        received_tcp_v6,
        sent_tcp_v6,
    })
}

/// Returns the (received, sent) histograms of one transport
fn v3_transport(
    transport: &xml_v3::TransportSection,
) -> Result<(Vec<u64>, Vec<u64>), MalformedBucketError> {
    let buckets = |kind: &str| {
        transport
            .counters
            .iter()
            .filter(move |group| group.kind == kind)
            .flat_map(|group| group.counter.iter())
            .map(|counter| (counter.name.as_str(), counter.value))
            .collect::<Vec<(&str, u64)>>()
    };

    let received = BucketLayout::INBOUND.build(buckets("request-size"))?;
    let sent = BucketLayout::OUTBOUND.build(buckets("response-size"))?;

    Ok((received, sent))
}

pub fn from_xml_v2(doc: xml_v2::IscDocument, groups: &StatisticGroups) -> Statistics {
    let statistics = doc.bind.statistics;
    let mut stats = Statistics::default();

    if groups.contains(StatisticGroup::Server) {
        let server = statistics.server;
        stats.server.boot_time = server.boot_time;

        let categories = vec![
            (CounterCategory::Opcode, server.requests.opcode),
            (CounterCategory::Qtype, server.queries_in.rdtype),
            (CounterCategory::Nsstat, server.nsstat),
            (CounterCategory::Zonestat, server.zonestat),
        ];
        for (category, counters) in categories {
            if let Some(field) = category.server_field(&mut stats.server) {
                field.extend(v2_counters(counters));
            }
        }
    }

    if groups.contains(StatisticGroup::View) {
        for section in statistics.views.view {
            stats.zone_views.push(ZoneView {
                name: section.name.clone(),
                zone_data: section
                    .zones
                    .zone
                    .into_iter()
                    .filter(|zone| zone.rdataclass == ZONE_CLASS)
                    .map(|zone| ZoneCounter {
                        name: zone.name,
                        serial: zone.serial,
                    })
                    .collect(),
            });

            let mut view = View {
                name: section.name,
                cache: section
                    .cache
                    .into_iter()
                    .flat_map(|cache| cache.rrset)
                    .map(|rrset| Gauge {
                        name: rrset.name,
                        gauge: rrset.counter,
                    })
                    .collect(),
                ..View::default()
            };

            let categories = vec![
                (CounterCategory::Resqtype, section.rdtype),
                (CounterCategory::Resstats, section.resstat),
            ];
            for (category, counters) in categories {
                if let Some(field) = category.view_field(&mut view) {
                    field.extend(v2_counters(counters));
                }
            }

            stats.views.push(view);
        }
    }

    if groups.contains(StatisticGroup::Tasks) {
        stats.task_manager = TaskManager::from(statistics.taskmgr);
    }

    // No size histograms in v2, publish empty ones of the usual shape
    if groups.contains(StatisticGroup::Traffic) {
        stats.traffic = TrafficHistograms::zeroed();
    }

    stats
}

fn v2_counters(counters: Vec<xml_v2::Counter>) -> Vec<Counter> {
    counters
        .into_iter()
        .map(|counter| Counter {
            name: counter.name,
            counter: counter.counter,
        })
        .collect()
}
