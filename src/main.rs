use anyhow::Result;
use clap::Parser;
use output_keeper::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Route log::info!() etc. to /tmp/output_keeper_debug.log.
    // When RUST_LOG is set, also mirror to stderr.
    // CLI --log-level takes precedence, then RUST_LOG, then the config file (applied once loaded).
    output_keeper::debug::init_log_bridge(cli.log_level.map(Into::into));

    log::info!("Starting output-keeper {}", output_keeper::VERSION);

    let result = cli::run(cli);
    if let Err(ref e) = result {
        eprintln!("output-keeper: error: {e:#}");
    }
    // Returning the error makes main exit with code 1
    result
}
