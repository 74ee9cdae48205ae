//! hydro-cli - disaggregate daily flow records into hourly hydrographs.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "hydro-cli",
    version,
    about = "Daily to hourly hydrograph smoothing toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: hydro_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("hydro-cli {}", env!("CARGO_PKG_VERSION"));
    hydro_cmd::run(cli.command)
}
