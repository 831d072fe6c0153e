use std::process::ExitCode;

use clap::Parser;
use tracing::error;

mod app;

fn main() -> ExitCode {
    let cli = app::bootstrap::Cli::parse();
    app::bootstrap::init_tracing();
    let wiring = match app::bootstrap::build_app(cli) {
        Ok(wiring) => wiring,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };
    app::loop_runner::run(wiring)
}
