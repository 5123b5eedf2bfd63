use std::env;
use std::process;

use getopts::Options;
use prometheus::Registry;

use bind_exporter::bind::{BindClient, HttpFetcher};
use bind_exporter::config::{self, ExporterConfig, Invocation};
use bind_exporter::exporter::{self, Exporter};
use bind_exporter::web::MetricsServer;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options]", program);
    print!("{}", opts.usage(&brief));
}

fn run(config: ExporterConfig) -> Result<(), Box<dyn std::error::Error>> {
    log::info!(
        "Starting bind-exporter {} (stats version {}, groups {})",
        env!("CARGO_PKG_VERSION"),
        config.stats_version,
        config.stats_groups
    );

    let fetcher = HttpFetcher::new(&config.stats_url, config.timeout)?;
    let client = BindClient::new(fetcher, config.stats_version);
    let exporter = Exporter::new(client, config.stats_groups.clone())?;

    let registry = Registry::new();
    exporter::register_build_info(&registry)?;
    registry.register(Box::new(exporter))?;
    if !config.pid_file.is_empty() {
        exporter::register_process_collector(&registry, &config.pid_file)?;
    }

    let server = MetricsServer::new(registry, &config.telemetry_path);
    server.run(&config.listen_address)?;
    Ok(())
}

/// Main entry point for the BIND exporter
fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args
        .first()
        .cloned()
        .unwrap_or_else(|| "bind-exporter".to_string());

    let opts = config::options();
    let config = match config::parse_args(&opts, args.get(1..).unwrap_or(&[])) {
        Ok(Invocation::Run(config)) => config,
        Ok(Invocation::Help) => {
            print_usage(&program, opts);
            return;
        }
        Ok(Invocation::Version) => {
            println!("bind-exporter {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        Err(err) => {
            eprintln!("{}", err);
            print_usage(&program, opts);
            process::exit(2);
        }
    };

    if let Err(err) = simple_logger::init_with_level(config.log_level) {
        eprintln!("Failed to initialize logger: {}", err);
    }

    if let Err(err) = run(config) {
        log::error!("{}", err);
        process::exit(1);
    }
}
