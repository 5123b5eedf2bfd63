//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread;

use prometheus::core::Collector;
use prometheus::{Encoder, Registry, TextEncoder};
use tiny_http::{Header, Response, Server};

use bind_exporter::bind::{BindError, Fetch, Result};

pub const JSON_FIXTURES: &[(&str, &str)] = &[
    ("/json/v1/server", "json/server.json"),
    ("/json/v1/zones", "json/zones.json"),
    ("/json/v1/tasks", "json/tasks.json"),
    ("/json/v1/traffic", "json/traffic.json"),
];

pub const XML_V3_FIXTURES: &[(&str, &str)] = &[
    ("/xml/v3/server", "xml/server.xml"),
    ("/xml/v3/status", "xml/status.xml"),
    ("/xml/v3/zones", "xml/zones.xml"),
    ("/xml/v3/tasks", "xml/tasks.xml"),
    ("/xml/v3/traffic", "xml/traffic.xml"),
];

pub const XML_V2_FIXTURES: &[(&str, &str)] = &[("/", "xml_v2/stats.xml")];

pub fn fixture(name: &str) -> Vec<u8> {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name]
        .iter()
        .collect();
    fs::read(&path).unwrap_or_else(|err| panic!("reading {}: {}", path.display(), err))
}

/// Serves fixture files from memory and records every requested path
pub struct FixtureFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requested: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new(fixtures: &[(&str, &str)]) -> FixtureFetcher {
        FixtureFetcher {
            bodies: fixtures
                .iter()
                .map(|(path, name)| (path.to_string(), fixture(name)))
                .collect(),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_body(mut self, path: &str, body: &str) -> FixtureFetcher {
        self.bodies.insert(path.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl Fetch for FixtureFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.requested.lock().unwrap().push(path.to_string());
        self.bodies
            .get(path)
            .cloned()
            .ok_or_else(|| BindError::HttpStatus {
                url: format!("http://fixtures{}", path),
                status: 404,
            })
    }
}

/// Renders a collector the way the telemetry endpoint does
pub fn render<C: Collector + 'static>(collector: C) -> String {
    let registry = Registry::new();
    registry.register(Box::new(collector)).unwrap();

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buffer)
        .unwrap();
    String::from_utf8(buffer).unwrap()
}

pub fn assert_lines(text: &str, expected: &[&str]) {
    for line in expected {
        assert!(
            text.lines().any(|candidate| candidate == *line),
            "missing line {:?} in\n{}",
            line,
            text
        );
    }
}

pub fn refute_substrings(text: &str, unexpected: &[&str]) {
    for needle in unexpected {
        assert!(!text.contains(needle), "unexpected {:?} in\n{}", needle, text);
    }
}

/// Starts a statistics channel stand-in on an ephemeral port
pub fn serve_fixtures(fixtures: &[(&str, &str)]) -> SocketAddr {
    let bodies: HashMap<String, Vec<u8>> = fixtures
        .iter()
        .map(|(path, name)| (path.to_string(), fixture(name)))
        .collect();

    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();

    thread::spawn(move || {
        for request in server.incoming_requests() {
            let response = match bodies.get(request.url()) {
                Some(body) => Response::from_data(body.clone())
                    .with_header(
                        Header::from_bytes(&b"Content-Type"[..], &b"text/plain"[..]).unwrap(),
                    )
                    .boxed(),
                None => Response::from_string("Not found")
                    .with_status_code(404)
                    .boxed(),
            };
            let _ = request.respond(response);
        }
    });

    addr
}
