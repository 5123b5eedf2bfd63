//! Assembly of `MetricFamily` values for one scrape

use std::collections::HashMap;

use prometheus::proto::{Bucket, Counter, Gauge, Histogram, LabelPair, Metric, MetricFamily};

use crate::exporter::descriptors::MetricDef;

/// Metric families in the order they were first written to
#[derive(Default)]
pub struct Families {
    families: Vec<MetricFamily>,
    positions: HashMap<&'static str, usize>,
}

impl Families {
    pub fn new() -> Families {
        Families::default()
    }

    fn family(&mut self, def: &'static MetricDef) -> &mut MetricFamily {
        let existing = self.positions.get(def.name).copied();
        let position = match existing {
            Some(position) => position,
            None => {
                let mut family = MetricFamily::default();
                family.set_name(def.name.to_string());
                family.set_help(def.help.to_string());
                family.set_field_type(def.kind.metric_type());

                self.families.push(family);
                self.positions.insert(def.name, self.families.len() - 1);
                self.families.len() - 1
            }
        };

        &mut self.families[position]
    }

    pub fn counter(&mut self, def: &'static MetricDef, labels: &[&str], value: f64) {
        let mut counter = Counter::default();
        counter.set_value(value);

        let mut metric = labelled(def, labels);
        metric.set_counter(counter);
        self.family(def).mut_metric().push(metric);
    }

    pub fn gauge(&mut self, def: &'static MetricDef, labels: &[&str], value: f64) {
        let mut gauge = Gauge::default();
        gauge.set_value(value);

        let mut metric = labelled(def, labels);
        metric.set_gauge(gauge);
        self.family(def).mut_metric().push(metric);
    }

    /// `buckets` holds `(upper bound, cumulative count)` pairs with finite
    /// bounds; the `+Inf` bucket is rendered from `count`.
    pub fn histogram(
        &mut self,
        def: &'static MetricDef,
        labels: &[&str],
        buckets: &[(f64, u64)],
        count: u64,
        sum: f64,
    ) {
        let mut histogram = Histogram::default();
        histogram.set_sample_count(count);
        histogram.set_sample_sum(sum);
        for (upper_bound, cumulative) in buckets {
            let mut bucket = Bucket::default();
            bucket.set_upper_bound(*upper_bound);
            bucket.set_cumulative_count(*cumulative);
            histogram.mut_bucket().push(bucket);
        }

        let mut metric = labelled(def, labels);
        metric.set_histogram(histogram);
        self.family(def).mut_metric().push(metric);
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn into_vec(self) -> Vec<MetricFamily> {
        self.families
    }
}

/// A metric carrying `values` for the labels of `def`, sorted by label name
fn labelled(def: &MetricDef, values: &[&str]) -> Metric {
    debug_assert_eq!(def.labels.len(), values.len(), "label count of {}", def.name);

    let mut pairs: Vec<LabelPair> = def
        .labels
        .iter()
        .zip(values)
        .map(|(name, value)| {
            let mut pair = LabelPair::default();
            pair.set_name(name.to_string());
            pair.set_value(value.to_string());
            pair
        })
        .collect();
    pairs.sort_by(|a, b| a.get_name().cmp(b.get_name()));

    let mut metric = Metric::default();
    for pair in pairs {
        metric.mut_label().push(pair);
    }
    metric
}
