//! Prometheus collector polling BIND on every scrape

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;

use crate::bind::client::Client;
use crate::bind::groups::StatisticGroups;
use crate::exporter::descriptors::{Descriptors, UP};
use crate::exporter::emit::emit;
use crate::exporter::families::Families;

/// Collector exporting the selected statistic groups of one BIND instance.
///
/// Each call to `collect` performs a fresh poll. A failed poll yields only
/// `bind_up 0`; partial results are never published.
pub struct Exporter<C> {
    client: C,
    groups: StatisticGroups,
    descriptors: Descriptors,
}

impl<C: Client> Exporter<C> {
    pub fn new(client: C, groups: StatisticGroups) -> prometheus::Result<Exporter<C>> {
        let descriptors = Descriptors::new(&groups)?;

        Ok(Exporter {
            client,
            groups,
            descriptors,
        })
    }

    pub fn groups(&self) -> &StatisticGroups {
        &self.groups
    }

    /// Polls BIND once and converts the result into metric families
    pub fn scrape(&self) -> Vec<MetricFamily> {
        let mut families = Families::new();

        match self.client.stats(&self.groups) {
            Ok(stats) => {
                emit(&mut families, &self.descriptors, &stats, &self.groups);
                families.gauge(&UP, &[], 1.0);
            }
            Err(err) => {
                log::error!("Failed to retrieve BIND statistics: {}", err);
                families.gauge(&UP, &[], 0.0);
            }
        }

        families.into_vec()
    }
}

impl<C: Client> Collector for Exporter<C> {
    fn desc(&self) -> Vec<&Desc> {
        self.descriptors.descs()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.scrape()
    }
}
