//! Packet size histograms
//!
//! BIND reports request and response sizes as counters keyed by a
//! `lower-upper` range, e.g. `32-47`. Ranges are a fixed width apart and the
//! first range (`0-15`) is never reported, so range `16-31` lands in slot 0.
//! Anything at or above the layout's maximum size is folded into the last
//! slot, which stands for the open ended `+Inf` bucket.

use crate::bind::errors::{BucketErrorKind, MalformedBucketError};

/// Width of one traffic bucket, `DNS_SIZEHISTO_QUANTUM` in BIND
pub const TRAFFIC_BUCKET_SIZE: u64 = 16;

/// Largest inbound request size BIND tracks individually
pub const TRAFFIC_IN_MAX_SIZE: u64 = 288;

/// Largest outbound response size BIND tracks individually
pub const TRAFFIC_OUT_MAX_SIZE: u64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketLayout {
    width: u64,
    max_size: u64,
}

impl BucketLayout {
    pub const INBOUND: BucketLayout = BucketLayout {
        width: TRAFFIC_BUCKET_SIZE,
        max_size: TRAFFIC_IN_MAX_SIZE,
    };

    pub const OUTBOUND: BucketLayout = BucketLayout {
        width: TRAFFIC_BUCKET_SIZE,
        max_size: TRAFFIC_OUT_MAX_SIZE,
    };

    /// Returns `None` unless the layout has at least one slot
    pub fn new(width: u64, max_size: u64) -> Option<BucketLayout> {
        if width == 0 || max_size < width {
            return None;
        }

        Some(BucketLayout { width, max_size })
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// Number of slots in a histogram built with this layout
    pub fn slots(&self) -> usize {
        (self.max_size / self.width) as usize
    }

    /// Inclusive upper size of a slot, `None` for the overflow slot
    pub fn upper_bound(&self, slot: usize) -> Option<u64> {
        if slot + 1 >= self.slots() {
            return None;
        }

        Some((slot as u64 + 2) * self.width - 1)
    }

    /// Accumulates `(label, count)` pairs into a fixed length histogram.
    ///
    /// Fails on the first malformed label without returning partial output.
    pub fn build<'a, I>(&self, buckets: I) -> Result<Vec<u64>, MalformedBucketError>
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut histogram = vec![0u64; self.slots()];

        for (label, count) in buckets {
            let slot = self.slot_for(label)?;
            histogram[slot] += count;
        }

        Ok(histogram)
    }

    /// Maps a bucket label to its slot in the histogram
    pub fn slot_for(&self, label: &str) -> Result<usize, MalformedBucketError> {
        let upper = parse_upper_bound(label)?;

        if (upper + 1) % self.width != 0 {
            return Err(MalformedBucketError::new(
                label,
                BucketErrorKind::Width(self.width),
            ));
        }

        if upper >= self.max_size {
            return Ok(self.slots() - 1);
        }

        match ((upper + 1) / self.width).checked_sub(2) {
            Some(slot) => Ok(slot as usize),
            None => Err(MalformedBucketError::new(
                label,
                BucketErrorKind::BelowFirstBucket,
            )),
        }
    }
}

fn parse_upper_bound(label: &str) -> Result<u64, MalformedBucketError> {
    let parts: Vec<&str> = label.split('-').collect();
    if parts.len() != 2 {
        return Err(MalformedBucketError::new(label, BucketErrorKind::Shape));
    }

    let bound = |part: &str| {
        part.parse::<u64>()
            .map_err(|_| MalformedBucketError::new(label, BucketErrorKind::Bound))
    };

    bound(parts[0])?;
    let upper = bound(parts[1])?;

    // u64::MAX would overflow the width check below
    upper
        .checked_add(1)
        .map(|_| upper)
        .ok_or_else(|| MalformedBucketError::new(label, BucketErrorKind::Bound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_layout() -> BucketLayout {
        BucketLayout::new(16, 128).unwrap()
    }

    #[test]
    fn test_slot_mapping() {
        let layout = small_layout();
        assert_eq!(layout.slots(), 8);
        assert_eq!(layout.slot_for("16-31"), Ok(0));
        assert_eq!(layout.slot_for("32-47"), Ok(1));
        assert_eq!(layout.slot_for("112-127"), Ok(6));
        assert_eq!(layout.slot_for("128-143"), Ok(7));
    }

    #[test]
    fn test_overflow_lands_in_last_slot() {
        let histogram = small_layout()
            .build(vec![("1000000-1000015", 3), ("256-271", 4)])
            .unwrap();

        assert_eq!(histogram.len(), 8);
        assert_eq!(histogram[7], 7);
        assert_eq!(histogram.iter().sum::<u64>(), 7);
    }

    #[test]
    fn test_counts_sum_into_same_slot() {
        let histogram = small_layout()
            .build(vec![("32-47", 5), ("32-47", 6), ("48-63", 1)])
            .unwrap();

        assert_eq!(histogram[1], 11);
        assert_eq!(histogram[2], 1);
    }

    #[test]
    fn test_malformed_labels() {
        let layout = small_layout();

        let err = layout.build(vec![("16", 1)]).unwrap_err();
        assert_eq!(err.kind, BucketErrorKind::Shape);

        let err = layout.build(vec![("a-b", 1)]).unwrap_err();
        assert_eq!(err.kind, BucketErrorKind::Bound);

        let err = layout.build(vec![("1-2-3", 1)]).unwrap_err();
        assert_eq!(err.kind, BucketErrorKind::Shape);

        let err = layout.build(vec![("16-30", 1)]).unwrap_err();
        assert_eq!(err.kind, BucketErrorKind::Width(16));

        let err = layout.build(vec![("0-15", 1)]).unwrap_err();
        assert_eq!(err.kind, BucketErrorKind::BelowFirstBucket);
    }

    #[test]
    fn test_upper_bounds() {
        let layout = BucketLayout::INBOUND;
        assert_eq!(layout.slots(), 18);
        assert_eq!(layout.upper_bound(0), Some(31));
        assert_eq!(layout.upper_bound(16), Some(287));
        assert_eq!(layout.upper_bound(17), None);
        assert_eq!(BucketLayout::OUTBOUND.slots(), 256);
    }

    #[test]
    fn test_invalid_layout() {
        assert!(BucketLayout::new(0, 128).is_none());
        assert!(BucketLayout::new(16, 8).is_none());
    }
}
