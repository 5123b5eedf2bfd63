//! Routing of counter groups into the canonical model
//!
//! BIND tags each group of counters with a category (`<counters type="...">`
//! in XML v3, the object key in JSON v1, the element name in XML v2). The
//! category decides which collection of `Server` or `View` receives the
//! counters. Categories this exporter does not know are ignored so newer BIND
//! releases keep working.

use crate::bind::model::{Counter, Server, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterCategory {
    Opcode,
    Qtype,
    Nsstat,
    Zonestat,
    Rcode,
    Resqtype,
    Resstats,
    Cachestats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterScope {
    Server,
    View,
}

const DISCRIMINATORS: [(&str, CounterCategory); 8] = [
    ("opcode", CounterCategory::Opcode),
    ("qtype", CounterCategory::Qtype),
    ("nsstat", CounterCategory::Nsstat),
    ("zonestat", CounterCategory::Zonestat),
    ("rcode", CounterCategory::Rcode),
    ("resqtype", CounterCategory::Resqtype),
    ("resstats", CounterCategory::Resstats),
    ("cachestats", CounterCategory::Cachestats),
];

impl CounterCategory {
    pub fn from_discriminator(discriminator: &str) -> Option<CounterCategory> {
        DISCRIMINATORS
            .iter()
            .find(|(name, _)| *name == discriminator)
            .map(|(_, category)| *category)
    }

    pub fn discriminator(self) -> &'static str {
        DISCRIMINATORS
            .iter()
            .find(|(_, category)| *category == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }

    pub fn scope(self) -> CounterScope {
        match self {
            CounterCategory::Opcode
            | CounterCategory::Qtype
            | CounterCategory::Nsstat
            | CounterCategory::Zonestat
            | CounterCategory::Rcode => CounterScope::Server,
            CounterCategory::Resqtype | CounterCategory::Resstats | CounterCategory::Cachestats => {
                CounterScope::View
            }
        }
    }

    /// Collection of `server` receiving counters of this category
    pub fn server_field(self, server: &mut Server) -> Option<&mut Vec<Counter>> {
        match self {
            CounterCategory::Opcode => Some(&mut server.incoming_requests),
            CounterCategory::Qtype => Some(&mut server.incoming_queries),
            CounterCategory::Nsstat => Some(&mut server.name_server_stats),
            CounterCategory::Zonestat => Some(&mut server.zone_statistics),
            CounterCategory::Rcode => Some(&mut server.server_rcodes),
            CounterCategory::Resqtype | CounterCategory::Resstats | CounterCategory::Cachestats => {
                None
            }
        }
    }

    /// Collection of `view` receiving counters of this category
    pub fn view_field(self, view: &mut View) -> Option<&mut Vec<Counter>> {
        match self {
            CounterCategory::Resqtype => Some(&mut view.resolver_queries),
            CounterCategory::Resstats => Some(&mut view.resolver_stats),
            CounterCategory::Cachestats => Some(&mut view.cache_stats),
            CounterCategory::Opcode
            | CounterCategory::Qtype
            | CounterCategory::Nsstat
            | CounterCategory::Zonestat
            | CounterCategory::Rcode => None,
        }
    }
}

/// Appends server scoped counters to the matching collection.
///
/// Returns false when the category is unknown or belongs to views.
pub fn route_server(server: &mut Server, discriminator: &str, counters: Vec<Counter>) -> bool {
    let field = CounterCategory::from_discriminator(discriminator)
        .and_then(|category| category.server_field(server));

    match field {
        Some(field) => {
            field.extend(counters);
            true
        }
        None => {
            log::trace!("Ignoring server counters of type {:?}", discriminator);
            false
        }
    }
}

/// Appends view scoped counters to the matching collection.
///
/// Returns false when the category is unknown or belongs to the server.
pub fn route_view(view: &mut View, discriminator: &str, counters: Vec<Counter>) -> bool {
    let field = CounterCategory::from_discriminator(discriminator)
        .and_then(|category| category.view_field(view));

    match field {
        Some(field) => {
            field.extend(counters);
            true
        }
        None => {
            log::trace!(
                "Ignoring counters of type {:?} in view {}",
                discriminator,
                view.name
            );
            false
        }
    }
}
