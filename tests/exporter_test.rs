//! End to end tests from fixture documents to the text exposition

mod common;

use bind_exporter::bind::{BindClient, Client, Decoder, StatisticGroups, StatsVersion};
use bind_exporter::exporter::Exporter;

use common::{
    assert_lines, refute_substrings, render, FixtureFetcher, JSON_FIXTURES, XML_V2_FIXTURES,
    XML_V3_FIXTURES,
};

const SERVER_LINES: &[&str] = &[
    "bind_up 1",
    "bind_boot_time_seconds 1626325868",
    "bind_config_time_seconds 1626325868",
    "bind_incoming_queries_total{type=\"A\"} 128417",
    "bind_incoming_requests_total{opcode=\"QUERY\"} 37634",
    "bind_response_rcodes_total{rcode=\"NXDOMAIN\"} 33958",
    "bind_query_errors_total{error=\"Dropped\"} 237",
    "bind_query_errors_total{error=\"Failure\"} 2",
    "bind_responses_total{result=\"Success\"} 29313",
    "bind_responses_total{result=\"NXDOMAIN\"} 33958",
    "bind_query_duplicates_total 216",
    "bind_query_recursions_total 60946",
    "bind_recursive_clients 76",
    "bind_zone_transfer_rejected_total 3",
    "bind_zone_transfer_success_total 25",
    "bind_zone_transfer_failure_total 1",
    "bind_response_policy_zone_rewrites_total 0",
];

const VIEW_LINES: &[&str] = &[
    "bind_resolver_cache_rrsets{type=\"A\",view=\"_default\"} 34324",
    "bind_resolver_cache_rrsets{type=\"AAAA\",view=\"_default\"} 110",
    "bind_resolver_queries_total{type=\"A\",view=\"_default\"} 108137",
    "bind_resolver_cache_stats{type=\"CacheHits\",view=\"_default\"} 1215",
    "bind_resolver_response_errors_total{error=\"NXDOMAIN\",view=\"_default\"} 16707",
    "bind_resolver_response_errors_total{error=\"SERVFAIL\",view=\"_default\"} 7596",
    "bind_resolver_dnssec_validation_success_total{result=\"ValOk\",view=\"_default\"} 4",
    "bind_resolver_response_lame_total{view=\"_default\"} 9108",
    "bind_resolver_query_retries_total{view=\"_default\"} 2",
    "bind_resolver_response_truncated_total{view=\"_default\"} 3",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"0.01\"} 38334",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"0.1\"} 113122",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"0.5\"} 182658",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"0.8\"} 187375",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"1.6\"} 188409",
    "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"+Inf\"} 227755",
    "bind_resolver_query_duration_seconds_count{view=\"_default\"} 227755",
    "bind_zone_serial{view=\"_default\",zone_name=\"TEST_ZONE\"} 123",
];

const TASK_LINES: &[&str] = &["bind_tasks_running 8", "bind_worker_threads 16"];

const TRAFFIC_LINES: &[&str] = &[
    "bind_traffic_received_size_bucket{transport=\"udpv4\",le=\"31\"} 4",
    "bind_traffic_received_size_bucket{transport=\"udpv4\",le=\"47\"} 14",
    "bind_traffic_received_size_bucket{transport=\"udpv4\",le=\"63\"} 16",
    "bind_traffic_received_size_bucket{transport=\"udpv4\",le=\"+Inf\"} 17",
    "bind_traffic_received_size_count{transport=\"udpv4\"} 17",
    "bind_traffic_received_size_bucket{transport=\"tcpv4\",le=\"47\"} 5",
    "bind_traffic_received_size_count{transport=\"udpv6\"} 0",
    "bind_traffic_sent_size_bucket{transport=\"udpv4\",le=\"47\"} 3",
    "bind_traffic_sent_size_bucket{transport=\"udpv4\",le=\"79\"} 10",
    "bind_traffic_sent_size_bucket{transport=\"udpv4\",le=\"+Inf\"} 12",
    "bind_traffic_sent_size_bucket{transport=\"tcpv4\",le=\"143\"} 5",
    "bind_traffic_sent_size_count{transport=\"tcpv6\"} 0",
];

fn exporter(
    fetcher: FixtureFetcher,
    version: StatsVersion,
    groups: &str,
) -> Exporter<BindClient<FixtureFetcher>> {
    let groups: StatisticGroups = groups.parse().unwrap();
    Exporter::new(BindClient::new(fetcher, version), groups).unwrap()
}

#[test]
fn test_json_all_groups() {
    let text = render(exporter(
        FixtureFetcher::new(JSON_FIXTURES),
        StatsVersion::Json,
        "server,view,tasks,traffic",
    ));

    assert_lines(&text, SERVER_LINES);
    assert_lines(&text, VIEW_LINES);
    assert_lines(&text, TASK_LINES);
    assert_lines(&text, TRAFFIC_LINES);

    // Zones of other classes and zones without a numeric serial are left out
    refute_substrings(&text, &["authors.bind", "zone_name=\"localhost\""]);
    // Name server statistics without a metric are not exported
    refute_substrings(&text, &["Requestv4", "ReqEdns0"]);
}

#[test]
fn test_xml_v3_all_groups() {
    let text = render(exporter(
        FixtureFetcher::new(XML_V3_FIXTURES),
        StatsVersion::XmlV3,
        "server,view,tasks,traffic",
    ));

    assert_lines(&text, SERVER_LINES);
    assert_lines(&text, VIEW_LINES);
    assert_lines(&text, TASK_LINES);
    assert_lines(&text, TRAFFIC_LINES);

    // The second view is exported on its own
    assert_lines(
        &text,
        &["bind_resolver_cache_stats{type=\"CacheHits\",view=\"_bind\"} 0"],
    );
    refute_substrings(&text, &["authors.bind", "UDP4Open", "nentries"]);
}

#[test]
fn test_xml_v2() {
    let text = render(exporter(
        FixtureFetcher::new(XML_V2_FIXTURES),
        StatsVersion::XmlV2,
        "server,view,tasks",
    ));

    assert_lines(
        &text,
        &[
            "bind_up 1",
            "bind_boot_time_seconds 1626325868",
            "bind_incoming_queries_total{type=\"A\"} 128417",
            "bind_incoming_requests_total{opcode=\"QUERY\"} 37634",
            "bind_responses_total{result=\"Success\"} 29313",
            "bind_query_errors_total{error=\"Dropped\"} 237",
            "bind_zone_transfer_success_total 25",
            "bind_resolver_cache_rrsets{type=\"A\",view=\"_default\"} 34324",
            "bind_resolver_queries_total{type=\"A\",view=\"_default\"} 108137",
            "bind_resolver_response_lame_total{view=\"_default\"} 9108",
            "bind_resolver_query_duration_seconds_bucket{view=\"_default\",le=\"0.1\"} 113122",
            "bind_resolver_query_duration_seconds_count{view=\"_default\"} 227755",
            "bind_zone_serial{view=\"_default\",zone_name=\"TEST_ZONE/IN\"} 123",
            "bind_tasks_running 8",
        ],
    );
    refute_substrings(&text, &["authors.bind", "bind_config_time_seconds"]);
}

#[test]
fn test_default_groups_skip_unselected_documents() {
    let fetcher = FixtureFetcher::new(JSON_FIXTURES);
    let client = BindClient::new(fetcher, StatsVersion::Json);
    client.stats(&StatisticGroups::defaults()).unwrap();

    // Only server and view are selected
    assert_eq!(
        client_requests(&client),
        vec!["/json/v1/server".to_string(), "/json/v1/zones".to_string()]
    );
}

#[test]
fn test_missing_document_marks_instance_down() {
    let fetcher = FixtureFetcher::new(&JSON_FIXTURES[..1]);
    let text = render(exporter(fetcher, StatsVersion::Json, "server,view"));

    assert_lines(&text, &["bind_up 0"]);
    refute_substrings(&text, &["bind_incoming_queries_total"]);
}

#[test]
fn test_malformed_document_marks_instance_down() {
    let fetcher =
        FixtureFetcher::new(JSON_FIXTURES).with_body("/json/v1/server", "{\"qtypes\": [1, 2]");
    let text = render(exporter(fetcher, StatsVersion::Json, "server"));

    assert_lines(&text, &["bind_up 0"]);
}

#[test]
fn test_malformed_traffic_bucket_marks_instance_down() {
    let fetcher = FixtureFetcher::new(JSON_FIXTURES).with_body(
        "/json/v1/traffic",
        r#"{"traffic":{"dns-udp-requests-sizes-received-ipv4":{"16-30":1}}}"#,
    );
    let text = render(exporter(fetcher, StatsVersion::Json, "server,traffic"));

    assert_lines(&text, &["bind_up 0"]);
    refute_substrings(&text, &["bind_traffic_received_size", "bind_incoming_queries_total"]);
}

#[test]
fn test_auto_detects_each_dialect() {
    let v3 = BindClient::new(FixtureFetcher::new(XML_V3_FIXTURES), StatsVersion::Auto);
    assert_eq!(v3.decoder(), Decoder::XmlV3);

    let v2 = BindClient::new(FixtureFetcher::new(XML_V2_FIXTURES), StatsVersion::Auto);
    assert_eq!(v2.decoder(), Decoder::XmlV2);

    let text = render(Exporter::new(v2, "server".parse().unwrap()).unwrap());
    assert_lines(
        &text,
        &["bind_up 1", "bind_incoming_queries_total{type=\"A\"} 128417"],
    );
}

#[test]
fn test_auto_matches_pinned_v3() {
    let auto = BindClient::new(FixtureFetcher::new(XML_V3_FIXTURES), StatsVersion::Auto);
    let pinned = BindClient::new(FixtureFetcher::new(XML_V3_FIXTURES), StatsVersion::XmlV3);
    let groups = StatisticGroups::all();

    assert_eq!(auto.stats(&groups).unwrap(), pinned.stats(&groups).unwrap());
}

fn client_requests(client: &BindClient<FixtureFetcher>) -> Vec<String> {
    client.fetcher().requested()
}
