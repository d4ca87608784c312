use clap::Parser;
use waypoint::cli::{run_cli, Cli};
use waypoint::telemetry::init_logging_with_config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging_with_config(&config.log)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_cli(&cli, config, &mut out)
}
