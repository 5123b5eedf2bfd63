//! Collectors registered next to the exporter: BIND process metrics read
//! through its pid file, and the exporter's own build information.

use std::fs;
use std::io;
use std::path::Path;

use prometheus::{IntGaugeVec, Opts, Registry};

use crate::exporter::descriptors::NAMESPACE;

/// Reads the pid named writes at startup
pub fn read_pid_file<P: AsRef<Path>>(path: P) -> io::Result<i32> {
    let content = fs::read_to_string(path)?;
    content
        .trim()
        .parse()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

/// Registers `bind_process_*` metrics for the process in `pid_file`.
///
/// The pid is read once. Returns `false` and logs a warning when the pid
/// file cannot be read, leaving the registry untouched.
#[cfg(target_os = "linux")]
pub fn register_process_collector(registry: &Registry, pid_file: &str) -> prometheus::Result<bool> {
    use prometheus::process_collector::ProcessCollector;

    let pid = match read_pid_file(pid_file) {
        Ok(pid) => pid,
        Err(err) => {
            log::warn!(
                "Not exporting BIND process metrics, cannot read pid file {}: {}",
                pid_file,
                err
            );
            return Ok(false);
        }
    };

    log::info!("Exporting process metrics of BIND pid {}", pid);
    registry.register(Box::new(ProcessCollector::new(pid, NAMESPACE)))?;
    Ok(true)
}

#[cfg(not(target_os = "linux"))]
pub fn register_process_collector(
    _registry: &Registry,
    pid_file: &str,
) -> prometheus::Result<bool> {
    log::warn!(
        "Process metrics are only available on Linux, ignoring pid file {}",
        pid_file
    );
    Ok(false)
}

/// Registers `bind_exporter_build_info`, constant 1 labelled with the build
pub fn register_build_info(registry: &Registry) -> prometheus::Result<()> {
    let build_info = IntGaugeVec::new(
        Opts::new(
            "build_info",
            "A metric with a constant '1' value labeled by version, os and arch from which bind_exporter was built.",
        )
        .namespace(format!("{}_exporter", NAMESPACE)),
        &["version", "os", "arch"],
    )?;
    registry.register(Box::new(build_info.clone()))?;

    build_info
        .with_label_values(&[
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS,
            std::env::consts::ARCH,
        ])
        .set(1);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::{Encoder, TextEncoder};
    use std::path::PathBuf;

    fn pid_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "bind-exporter-{}-{}.pid",
            std::process::id(),
            name
        ));
        fs::write(&path, content).unwrap();
        path
    }

    fn render(registry: &Registry) -> String {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_read_pid_file() {
        let path = pid_file("valid", "4242\n");
        assert_eq!(read_pid_file(&path).unwrap(), 4242);
        fs::remove_file(&path).unwrap();

        let path = pid_file("garbage", "named\n");
        let err = read_pid_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        fs::remove_file(&path).unwrap();

        assert!(read_pid_file("/nonexistent/named.pid").is_err());
    }

    #[test]
    fn test_missing_pid_file_registers_nothing() {
        let registry = Registry::new();
        let registered = register_process_collector(&registry, "/nonexistent/named.pid").unwrap();

        assert!(!registered);
        assert!(registry.gather().is_empty());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_process_metrics_for_pid_file() {
        let path = pid_file("self", &std::process::id().to_string());
        let registry = Registry::new();

        let registered = register_process_collector(&registry, path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(registered);
        assert!(render(&registry).contains("bind_process_cpu_seconds_total"));
    }

    #[test]
    fn test_build_info() {
        let registry = Registry::new();
        register_build_info(&registry).unwrap();

        let text = render(&registry);
        assert!(text.contains("bind_exporter_build_info{"));
        assert!(text.contains(&format!("version=\"{}\"", env!("CARGO_PKG_VERSION"))));
        assert!(text.trim_end().ends_with(" 1"));
    }
}
