use std::process::ExitCode;

use realm_engine::run_app;
use tracing::{error, warn};

use super::bootstrap::{AppWiring, RunMode};
use super::headless::{simulate, write_png};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        mode,
        mut engine,
        mut events,
        width,
        height,
    } = app;

    let result = match mode {
        RunMode::Window(config) => run_app(config, engine, Box::new(events)).map_err(Into::into),
        RunMode::Snapshot { path, ticks } => {
            simulate(&mut engine, &mut events, ticks);
            if events.remaining() > 0 {
                warn!(remaining = events.remaining(), ticks, "script_not_finished");
            }
            if engine.any_entity_moving() {
                warn!(ticks, "snapshot_taken_mid_move");
            }
            write_png(&engine, width, height, &path)
        }
    };

    if let Err(err) = result {
        error!(error = %err, "viewer_failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
