//! Resolver round trip time histogram
//!
//! BIND counts resolver responses per latency bucket in counters named
//! `QryRTT<ms>`, plus `QryRTT<ms>+` for everything slower. The counters are
//! not cumulative and may arrive in any order.

use crate::bind::errors::{BucketErrorKind, MalformedBucketError};
use crate::bind::model::Counter;
use crate::bind::QRY_RTT;

/// Cumulative histogram with bounds in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct RttHistogram {
    /// `(upper bound, cumulative count)` in ascending bound order. The open
    /// ended bucket has an infinite bound.
    pub buckets: Vec<(f64, u64)>,
    pub count: u64,
}

impl RttHistogram {
    /// Buckets with a finite bound; the infinite one is implied by `count`
    pub fn finite_buckets(&self) -> impl Iterator<Item = &(f64, u64)> {
        self.buckets.iter().filter(|(bound, _)| bound.is_finite())
    }
}

/// Builds the histogram from a view's resolver statistics.
///
/// Counters without the `QryRTT` prefix are ignored. A bound that is not a
/// number fails the whole histogram.
pub fn rtt_histogram(stats: &[Counter]) -> Result<RttHistogram, MalformedBucketError> {
    let mut raw: Vec<(f64, u64)> = Vec::new();

    for counter in stats {
        let suffix = match counter.name.strip_prefix(QRY_RTT) {
            Some(suffix) => suffix,
            None => continue,
        };

        let bound = if suffix.ends_with('+') {
            f64::INFINITY
        } else {
            let millis = suffix
                .parse::<f64>()
                .map_err(|_| MalformedBucketError::new(&counter.name, BucketErrorKind::Bound))?;
            if !millis.is_finite() {
                return Err(MalformedBucketError::new(
                    &counter.name,
                    BucketErrorKind::Bound,
                ));
            }
            millis / 1000.0
        };

        raw.push((bound, counter.counter));
    }

    // Bounds are all non-NaN here
    raw.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    raw.dedup_by(|later, earlier| {
        if later.0 == earlier.0 {
            earlier.1 = later.1;
            true
        } else {
            false
        }
    });

    let mut count = 0;
    let buckets = raw
        .into_iter()
        .map(|(bound, value)| {
            count += value;
            (bound, count)
        })
        .collect();

    Ok(RttHistogram { buckets, count })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(pairs: &[(&str, u64)]) -> Vec<Counter> {
        pairs
            .iter()
            .map(|(name, value)| Counter::new(name, *value))
            .collect()
    }

    #[test]
    fn test_order_independent() {
        let forward = counters(&[("QryRTT100", 2), ("QryRTT800", 3), ("QryRTT1600+", 5)]);
        let reverse = counters(&[("QryRTT1600+", 5), ("QryRTT800", 3), ("QryRTT100", 2)]);

        let expected = RttHistogram {
            buckets: vec![(0.1, 2), (0.8, 5), (f64::INFINITY, 10)],
            count: 10,
        };
        assert_eq!(rtt_histogram(&forward).unwrap(), expected);
        assert_eq!(rtt_histogram(&reverse).unwrap(), expected);
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        let stats = counters(&[("QryRTT500", 4), ("QryRTT10", 1), ("QryRTT1600", 2)]);
        let histogram = rtt_histogram(&stats).unwrap();

        let bounds: Vec<f64> = histogram.buckets.iter().map(|(bound, _)| *bound).collect();
        assert_eq!(bounds, vec![0.01, 0.5, 1.6]);
        assert_eq!(histogram.buckets[2].1, 7);
        assert_eq!(histogram.count, 7);
    }

    #[test]
    fn test_other_counters_ignored() {
        let stats = counters(&[("Lame", 9), ("NXDOMAIN", 3)]);
        let histogram = rtt_histogram(&stats).unwrap();
        assert!(histogram.buckets.is_empty());
        assert_eq!(histogram.count, 0);
    }

    #[test]
    fn test_bad_bound() {
        let stats = counters(&[("QryRTT10", 1), ("QryRTTfast", 3)]);
        let err = rtt_histogram(&stats).unwrap_err();
        assert_eq!(err.label, "QryRTTfast");
        assert_eq!(err.kind, BucketErrorKind::Bound);
    }

    #[test]
    fn test_finite_buckets() {
        let stats = counters(&[("QryRTT10", 1), ("QryRTT10+", 3)]);
        let histogram = rtt_histogram(&stats).unwrap();
        assert_eq!(histogram.finite_buckets().count(), 1);
        assert_eq!(histogram.count, 4);
    }
}
