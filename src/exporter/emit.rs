//! Mapping of canonical statistics onto metric families

use crate::bind::groups::{StatisticGroup, StatisticGroups};
use crate::bind::model::{
    Counter, Direction, Server, Statistics, TaskManager, TrafficHistograms, View, ZoneView,
};
use crate::exporter::descriptors::*;
use crate::exporter::families::Families;
use crate::exporter::rtt::rtt_histogram;

/// Writes the metrics of every selected group
pub fn emit(
    families: &mut Families,
    descriptors: &Descriptors,
    stats: &Statistics,
    groups: &StatisticGroups,
) {
    for group in groups.iter() {
        match group {
            StatisticGroup::Server => emit_server(families, descriptors, &stats.server),
            StatisticGroup::View => {
                emit_views(families, descriptors, &stats.views, &stats.zone_views)
            }
            StatisticGroup::Tasks => emit_tasks(families, &stats.task_manager),
            StatisticGroup::Traffic => emit_traffic(families, &stats.traffic),
        }
    }
}

fn emit_value(families: &mut Families, def: &'static MetricDef, labels: &[&str], value: u64) {
    match def.kind {
        MetricKind::Gauge => families.gauge(def, labels, value as f64),
        MetricKind::Counter | MetricKind::Histogram => families.counter(def, labels, value as f64),
    }
}

pub fn emit_server(families: &mut Families, descriptors: &Descriptors, server: &Server) {
    if let Some(boot_time) = server.boot_time {
        families.gauge(&BOOT_TIME, &[], boot_time.timestamp() as f64);
    }
    if let Some(config_time) = server.config_time {
        families.gauge(&CONFIG_TIME, &[], config_time.timestamp() as f64);
    }

    let labelled: [(&'static MetricDef, &[Counter]); 3] = [
        (&INCOMING_QUERIES, &server.incoming_queries[..]),
        (&INCOMING_REQUESTS, &server.incoming_requests[..]),
        (&RESPONSE_RCODES, &server.server_rcodes[..]),
    ];
    for &(def, counters) in labelled.iter() {
        for counter in counters.iter() {
            families.counter(def, &[counter.name.as_str()], counter.counter as f64);
        }
    }

    for counter in server.name_server_stats.iter() {
        let name = counter.name.as_str();
        if let Some(def) = descriptors.server_label_stat(name) {
            let label = name.strip_prefix("Qry").unwrap_or(name);
            emit_value(families, def, &[label], counter.counter);
        } else if let Some(def) = descriptors.server_metric_stat(name) {
            emit_value(families, def, &[], counter.counter);
        }
    }

    // Zone statistics only feed the unlabelled server metrics
    for counter in server.zone_statistics.iter() {
        if let Some(def) = descriptors.server_metric_stat(&counter.name) {
            emit_value(families, def, &[], counter.counter);
        }
    }
}

pub fn emit_views(
    families: &mut Families,
    descriptors: &Descriptors,
    views: &[View],
    zone_views: &[ZoneView],
) {
    for view in views {
        let name = view.name.as_str();

        for gauge in &view.cache {
            families.gauge(&RESOLVER_CACHE, &[name, gauge.name.as_str()], gauge.gauge as f64);
        }
        for counter in &view.resolver_queries {
            families.counter(
                &RESOLVER_QUERIES,
                &[name, counter.name.as_str()],
                counter.counter as f64,
            );
        }
        for counter in &view.cache_stats {
            families.counter(
                &RESOLVER_CACHE_STATS,
                &[name, counter.name.as_str()],
                counter.counter as f64,
            );
        }

        for counter in &view.resolver_stats {
            let stat = counter.name.as_str();
            if let Some(def) = descriptors.resolver_label_stat(stat) {
                emit_value(families, def, &[name, stat], counter.counter);
            } else if let Some(def) = descriptors.resolver_metric_stat(stat) {
                emit_value(families, def, &[name], counter.counter);
            }
        }

        match rtt_histogram(&view.resolver_stats) {
            Ok(histogram) => {
                let buckets: Vec<(f64, u64)> = histogram.finite_buckets().copied().collect();
                families.histogram(
                    &RESOLVER_QUERY_DURATION,
                    &[name],
                    &buckets,
                    histogram.count,
                    f64::NAN,
                );
            }
            Err(err) => log::warn!(
                "Skipping round trip time histogram of view {}: {}",
                name,
                err
            ),
        }
    }

    for view in zone_views {
        for zone in &view.zone_data {
            match zone.serial.parse::<u64>() {
                Ok(serial) => families.gauge(
                    &ZONE_SERIAL,
                    &[view.name.as_str(), zone.name.as_str()],
                    serial as f64,
                ),
                Err(_) => log::debug!(
                    "Zone {} in view {} has no numeric serial: {:?}",
                    zone.name,
                    view.name,
                    zone.serial
                ),
            }
        }
    }
}

pub fn emit_tasks(families: &mut Families, task_manager: &TaskManager) {
    let thread_model = &task_manager.thread_model;
    families.gauge(&TASKS_RUNNING, &[], thread_model.tasks_running as f64);
    families.gauge(&WORKER_THREADS, &[], thread_model.worker_threads as f64);
}

/// Only non-empty slots get a bucket. The last slot has no finite bound and
/// only shows up in the `+Inf` bucket.
pub fn emit_traffic(families: &mut Families, traffic: &TrafficHistograms) {
    for &(direction, transport, histogram) in traffic.series().iter() {
        let def = match direction {
            Direction::Received => &TRAFFIC_RECEIVED,
            Direction::Sent => &TRAFFIC_SENT,
        };
        let layout = direction.layout();

        let mut buckets = Vec::new();
        let mut count = 0u64;
        for (slot, value) in histogram.iter().enumerate() {
            count += value;
            if *value == 0 {
                continue;
            }
            if let Some(upper) = layout.upper_bound(slot) {
                buckets.push((upper as f64, count));
            }
        }

        families.histogram(def, &[transport], &buckets, count, f64::NAN);
    }
}
