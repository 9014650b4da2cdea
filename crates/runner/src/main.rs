use quota_runner::{QuotaMarketSimulation, SimulationConfig};
use std::process::ExitCode;

fn print_help() {
    eprintln!(
        r#"Quota Market Simulator - periodic double auctions for tradable quota

USAGE:
    quota-sim <CONFIG>

ARGS:
    <CONFIG>            JSON simulation configuration

OPTIONS:
    --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG            Log level filter (e.g. quota_exchange=debug)

The JSON report is written to stdout.
"#
    );
}

fn run(path: &str) -> Result<String, Box<dyn std::error::Error>> {
    log::info!("Loading configuration from: {}", path);
    let config = SimulationConfig::from_file(path)?;

    let mut simulation = QuotaMarketSimulation::from_config(&config)?;
    let report = simulation.run()?;
    Ok(report.to_json()?)
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let path = match args.as_slice() {
        [flag] if flag == "--help" || flag == "-h" => {
            print_help();
            return ExitCode::SUCCESS;
        }
        [path] => path,
        _ => {
            print_help();
            return ExitCode::from(2);
        }
    };

    match run(path) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
