//! Polling of the statistics channel in one of the supported dialects

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::bind::errors::{BindError, DecodeError, Result};
use crate::bind::fetch::Fetch;
use crate::bind::groups::{StatisticGroup, StatisticGroups};
use crate::bind::model::Statistics;
use crate::bind::normalize::{self, JsonDocuments, XmlV3Documents};
use crate::bind::wire::{self, json, xml_v2, xml_v3};

/// A source of canonical statistics, polled once per scrape
pub trait Client: Send + Sync {
    fn stats(&self, groups: &StatisticGroups) -> Result<Statistics>;
}

/// Dialect selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsVersion {
    Json,
    XmlV2,
    XmlV3,
    Auto,
}

impl FromStr for StatsVersion {
    type Err = BindError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "json" => Ok(StatsVersion::Json),
            "xml" | "xml.v3" => Ok(StatsVersion::XmlV3),
            "xml.v2" => Ok(StatsVersion::XmlV2),
            "auto" => Ok(StatsVersion::Auto),
            _ => Err(BindError::UnsupportedVersion(s.to_string())),
        }
    }
}

impl StatsVersion {
    /// The decoder this version pins, `None` for auto detection
    pub fn pinned(self) -> Option<Decoder> {
        match self {
            StatsVersion::Json => Some(Decoder::Json),
            StatsVersion::XmlV2 => Some(Decoder::XmlV2),
            StatsVersion::XmlV3 => Some(Decoder::XmlV3),
            StatsVersion::Auto => None,
        }
    }
}

impl fmt::Display for StatsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            StatsVersion::Json => "json",
            StatsVersion::XmlV2 => "xml.v2",
            StatsVersion::XmlV3 => "xml.v3",
            StatsVersion::Auto => "auto",
        };
        f.write_str(name)
    }
}

/// Concrete dialect used for one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Json,
    XmlV2,
    XmlV3,
}

impl Decoder {
    /// Probes the v3 status document. The result is not cached, so a server
    /// upgraded or downgraded between polls is picked up on the next one.
    pub fn detect<F: Fetch + ?Sized>(fetcher: &F) -> Decoder {
        match get::<F, xml_v3::StatusDocument>(fetcher, xml_v3::STATUS_PATH, wire::decode_xml) {
            Ok(_) => Decoder::XmlV3,
            Err(err) => {
                log::debug!("XML v3 status probe failed, using XML v2: {}", err);
                Decoder::XmlV2
            }
        }
    }

    /// Fetches and normalizes the documents needed for `groups`
    pub fn collect<F: Fetch + ?Sized>(
        self,
        fetcher: &F,
        groups: &StatisticGroups,
    ) -> Result<Statistics> {
        match self {
            Decoder::Json => json_stats(fetcher, groups),
            Decoder::XmlV2 => xml_v2_stats(fetcher, groups),
            Decoder::XmlV3 => xml_v3_stats(fetcher, groups),
        }
    }
}

/// Statistics client for one BIND server
pub struct BindClient<F> {
    fetcher: F,
    version: StatsVersion,
}

impl<F: Fetch> BindClient<F> {
    pub fn new(fetcher: F, version: StatsVersion) -> BindClient<F> {
        BindClient { fetcher, version }
    }

    pub fn version(&self) -> StatsVersion {
        self.version
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Dialect for the next poll, probing the server when set to auto
    pub fn decoder(&self) -> Decoder {
        self.version
            .pinned()
            .unwrap_or_else(|| Decoder::detect(&self.fetcher))
    }
}

impl<F: Fetch> Client for BindClient<F> {
    fn stats(&self, groups: &StatisticGroups) -> Result<Statistics> {
        self.decoder().collect(&self.fetcher, groups)
    }
}

fn get<F, T>(
    fetcher: &F,
    path: &str,
    decode: fn(&[u8]) -> std::result::Result<T, DecodeError>,
) -> Result<T>
where
    F: Fetch + ?Sized,
    T: DeserializeOwned,
{
    let body = fetcher.fetch(path)?;
    decode(&body).map_err(|err| BindError::decode(path, err))
}

fn get_if<F, T>(
    wanted: bool,
    fetcher: &F,
    path: &str,
    decode: fn(&[u8]) -> std::result::Result<T, DecodeError>,
) -> Result<Option<T>>
where
    F: Fetch + ?Sized,
    T: DeserializeOwned,
{
    if wanted {
        get(fetcher, path, decode).map(Some)
    } else {
        Ok(None)
    }
}

fn json_stats<F: Fetch + ?Sized>(fetcher: &F, groups: &StatisticGroups) -> Result<Statistics> {
    let docs = JsonDocuments {
        server: get_if(
            groups.needs_server_document(),
            fetcher,
            json::SERVER_PATH,
            wire::decode_json,
        )?,
        zones: get_if(
            groups.contains(StatisticGroup::View),
            fetcher,
            json::ZONES_PATH,
            wire::decode_json,
        )?,
        tasks: get_if(
            groups.contains(StatisticGroup::Tasks),
            fetcher,
            json::TASKS_PATH,
            wire::decode_json,
        )?,
        traffic: get_if(
            groups.contains(StatisticGroup::Traffic),
            fetcher,
            json::TRAFFIC_PATH,
            wire::decode_json,
        )?,
    };

    Ok(normalize::from_json(docs, groups)?)
}

fn xml_v3_stats<F: Fetch + ?Sized>(fetcher: &F, groups: &StatisticGroups) -> Result<Statistics> {
    let docs = XmlV3Documents {
        server: get_if(
            groups.needs_server_document(),
            fetcher,
            xml_v3::SERVER_PATH,
            wire::decode_xml,
        )?,
        zones: get_if(
            groups.contains(StatisticGroup::View),
            fetcher,
            xml_v3::ZONES_PATH,
            wire::decode_xml,
        )?,
        tasks: get_if(
            groups.contains(StatisticGroup::Tasks),
            fetcher,
            xml_v3::TASKS_PATH,
            wire::decode_xml,
        )?,
        traffic: get_if(
            groups.contains(StatisticGroup::Traffic),
            fetcher,
            xml_v3::TRAFFIC_PATH,
            wire::decode_xml,
        )?,
    };

    Ok(normalize::from_xml_v3(docs, groups)?)
}

fn xml_v2_stats<F: Fetch + ?Sized>(fetcher: &F, groups: &StatisticGroups) -> Result<Statistics> {
    if groups.contains(StatisticGroup::Traffic) {
        log::debug!("XML v2 statistics carry no traffic histograms");
    }

    let doc: xml_v2::IscDocument = get(fetcher, xml_v2::STATS_PATH, wire::decode_xml)?;
    Ok(normalize::from_xml_v2(doc, groups))
}
