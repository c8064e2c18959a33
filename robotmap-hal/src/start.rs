use std::{error::Error, process::ExitCode};

use log::{error, info, warn};

pub type RobotResult = Result<(), Box<dyn Error>>;

/// Run the robot program. A start-up failure is fatal: it is logged and the process exits
/// with a failure code, so the robot is never enabled with half of its hardware wired.
pub fn init_all<F: FnOnce() -> RobotResult>(f: F) -> ExitCode {
  log_init();

  info!("**** Running Robot ****");

  match f() {
    Ok(()) => {
      warn!("Robot Exited Gracefully");
      ExitCode::SUCCESS
    },
    Err(e) => {
      error!("Robot Error: {}", e);
      let mut source = e.source();
      while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
      }
      error!("Refusing to enable the robot");
      ExitCode::FAILURE
    }
  }
}

pub fn log_init() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .target(env_logger::Target::Stdout)
    .init();
}
