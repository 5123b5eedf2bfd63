//! Command line configuration

use std::time::Duration;

use derive_more::Display;
use getopts::{Matches, Options};

use crate::bind::client::StatsVersion;
use crate::bind::groups::StatisticGroups;

pub const DEFAULT_STATS_URL: &str = "http://localhost:8053/";
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9119";
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";
pub const DEFAULT_PID_FILE: &str = "/run/named/named.pid";

#[derive(Debug, Display)]
pub enum ConfigError {
    #[display(fmt = "{}", _0)]
    Options(getopts::Fail),
    #[display(fmt = "invalid timeout {:?}", _0)]
    InvalidTimeout(String),
    #[display(fmt = "invalid log level {:?}", _0)]
    InvalidLogLevel(String),
    #[display(fmt = "invalid --{}: {}", flag, reason)]
    InvalidValue { flag: &'static str, reason: String },
}

impl std::error::Error for ConfigError {}

impl From<getopts::Fail> for ConfigError {
    fn from(err: getopts::Fail) -> Self {
        ConfigError::Options(err)
    }
}

/// Settings fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ExporterConfig {
    pub stats_url: String,
    pub timeout: Duration,
    /// Empty when process metrics are disabled
    pub pid_file: String,
    pub stats_version: StatsVersion,
    pub stats_groups: StatisticGroups,
    /// Address in `host:port` form, ready for binding
    pub listen_address: String,
    pub telemetry_path: String,
    pub log_level: log::Level,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        ExporterConfig {
            stats_url: DEFAULT_STATS_URL.to_string(),
            timeout: Duration::from_secs(10),
            pid_file: DEFAULT_PID_FILE.to_string(),
            stats_version: StatsVersion::Json,
            stats_groups: StatisticGroups::defaults(),
            listen_address: listen_address(DEFAULT_LISTEN_ADDRESS),
            telemetry_path: DEFAULT_TELEMETRY_PATH.to_string(),
            log_level: log::Level::Info,
        }
    }
}

/// What the process was asked to do
#[derive(Debug, PartialEq)]
pub enum Invocation {
    Run(ExporterConfig),
    Help,
    Version,
}

pub fn options() -> Options {
    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optflag("", "version", "print the version and exit");
    opts.optopt(
        "",
        "bind.stats-url",
        "HTTP statistics channel of the BIND server",
        "URL",
    );
    opts.optopt(
        "",
        "bind.timeout",
        "Timeout for trying to get stats from BIND (e.g. 500ms, 10s, 1m30s)",
        "DURATION",
    );
    opts.optopt(
        "",
        "bind.pid-file",
        "Path to BIND's pid file to export process information (empty to disable)",
        "FILE",
    );
    opts.optopt(
        "",
        "bind.stats-version",
        "BIND statistics version (json, xml, xml.v3, xml.v2, auto)",
        "VERSION",
    );
    opts.optopt(
        "",
        "bind.stats-groups",
        "Comma-separated list of statistics to collect (server, view, tasks, traffic)",
        "GROUPS",
    );
    opts.optopt(
        "",
        "web.listen-address",
        "Address to listen on for web interface and telemetry",
        "ADDRESS",
    );
    opts.optopt(
        "",
        "web.telemetry-path",
        "Path under which to expose metrics",
        "PATH",
    );
    opts.optopt(
        "",
        "log.level",
        "Only log messages with the given severity or above",
        "LEVEL",
    );
    opts
}

/// Parses the arguments following the program name
pub fn parse_args(opts: &Options, args: &[String]) -> Result<Invocation, ConfigError> {
    let matches = opts.parse(args)?;

    if matches.opt_present("h") {
        return Ok(Invocation::Help);
    }
    if matches.opt_present("version") {
        return Ok(Invocation::Version);
    }

    from_matches(&matches).map(Invocation::Run)
}

fn from_matches(matches: &Matches) -> Result<ExporterConfig, ConfigError> {
    let mut config = ExporterConfig::default();

    if let Some(url) = matches.opt_str("bind.stats-url") {
        config.stats_url = url;
    }
    if let Some(timeout) = matches.opt_str("bind.timeout") {
        config.timeout = parse_duration(&timeout)?;
    }
    if let Some(pid_file) = matches.opt_str("bind.pid-file") {
        config.pid_file = pid_file;
    }
    if let Some(version) = matches.opt_str("bind.stats-version") {
        config.stats_version = version.parse().map_err(|err| ConfigError::InvalidValue {
            flag: "bind.stats-version",
            reason: format!("{}", err),
        })?;
    }
    if let Some(groups) = matches.opt_str("bind.stats-groups") {
        config.stats_groups = groups.parse().map_err(|err| ConfigError::InvalidValue {
            flag: "bind.stats-groups",
            reason: format!("{}", err),
        })?;
    }
    if let Some(address) = matches.opt_str("web.listen-address") {
        config.listen_address = listen_address(&address);
    }
    if let Some(path) = matches.opt_str("web.telemetry-path") {
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                flag: "web.telemetry-path",
                reason: "must start with '/'".to_string(),
            });
        }
        config.telemetry_path = path;
    }
    if let Some(level) = matches.opt_str("log.level") {
        config.log_level = level
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(level.clone()))?;
    }

    Ok(config)
}

/// Parses durations such as `500ms`, `10s` or `1m30s`
pub fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    let duration = humantime::parse_duration(value)
        .map_err(|_| ConfigError::InvalidTimeout(value.to_string()))?;

    if duration == Duration::from_secs(0) {
        return Err(ConfigError::InvalidTimeout(value.to_string()));
    }
    Ok(duration)
}

/// `:9119` listens on every interface
fn listen_address(address: &str) -> String {
    if address.starts_with(':') {
        format!("0.0.0.0{}", address)
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::groups::StatisticGroup;

    fn parse(args: &[&str]) -> Result<Invocation, ConfigError> {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        parse_args(&options(), &args)
    }

    #[test]
    fn test_defaults() {
        let config = match parse(&[]).unwrap() {
            Invocation::Run(config) => config,
            other => panic!("unexpected {:?}", other),
        };

        assert_eq!(config, ExporterConfig::default());
        assert_eq!(config.listen_address, "0.0.0.0:9119");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.stats_groups.to_string(), "server,view");
        assert_eq!(config.pid_file, "/run/named/named.pid");
    }

    #[test]
    fn test_pid_file() {
        let pid_file = |args: &[&str]| match parse(args).unwrap() {
            Invocation::Run(config) => config.pid_file,
            other => panic!("unexpected {:?}", other),
        };

        assert_eq!(
            pid_file(&["--bind.pid-file", "/var/run/named.pid"]),
            "/var/run/named.pid"
        );
        assert_eq!(pid_file(&["--bind.pid-file", ""]), "");
    }

    #[test]
    fn test_all_flags() {
        let invocation = parse(&[
            "--bind.stats-url",
            "http://10.0.0.1:8053",
            "--bind.timeout",
            "500ms",
            "--bind.stats-version",
            "auto",
            "--bind.stats-groups",
            "server,task,traffic",
            "--web.listen-address",
            "127.0.0.1:9000",
            "--web.telemetry-path",
            "/bind",
            "--log.level",
            "debug",
        ])
        .unwrap();

        let config = match invocation {
            Invocation::Run(config) => config,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(config.stats_url, "http://10.0.0.1:8053");
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert_eq!(config.stats_version, StatsVersion::Auto);
        assert!(config.stats_groups.contains(StatisticGroup::Tasks));
        assert!(!config.stats_groups.contains(StatisticGroup::View));
        assert_eq!(config.listen_address, "127.0.0.1:9000");
        assert_eq!(config.telemetry_path, "/bind");
        assert_eq!(config.log_level, log::Level::Debug);
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["-h"]).unwrap(), Invocation::Help);
        assert_eq!(parse(&["--version"]).unwrap(), Invocation::Version);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            parse(&["--bind.stats-groups", "server,zones"]),
            Err(ConfigError::InvalidValue { flag: "bind.stats-groups", .. })
        ));
        assert!(matches!(
            parse(&["--bind.stats-version", "xml.v4"]),
            Err(ConfigError::InvalidValue { flag: "bind.stats-version", .. })
        ));
        assert!(matches!(
            parse(&["--log.level", "loud"]),
            Err(ConfigError::InvalidLogLevel(_))
        ));
        assert!(matches!(
            parse(&["--web.telemetry-path", "metrics"]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(parse(&["--bogus"]), Err(ConfigError::Options(_))));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("3").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert!(matches!(
            parse_duration("307445734561825861m"),
            Err(ConfigError::InvalidTimeout(_))
        ));
        assert!(matches!(
            parse(&["--bind.timeout", "99999999999999999999s"]),
            Err(ConfigError::InvalidTimeout(_))
        ));
    }
}
