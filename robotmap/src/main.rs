use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use robotmap::{Registry, RobotConfig};
use robotmap_hal::{hal::sim::SimulatedHal, input::xbox::XboxController, start::{init_all, RobotResult}, CanId, Resource};

#[derive(Parser, Debug)]
#[command(author, version, about = "Wire up the robot against the simulated hardware layer", long_about = None)]
struct Args {
  /// Robot config file (wiring overrides and PID gains)
  #[arg(short, long, default_value = "config/robot.toml")]
  config: PathBuf,

  /// Simulate a CAN device that doesn't respond. May be given more than once.
  #[arg(long = "missing-can-id", value_name = "ID")]
  missing_can_ids: Vec<u8>,
}

fn run(args: Args) -> anyhow::Result<()> {
  let config = RobotConfig::load(&args.config)
    .with_context(|| format!("loading robot config from {}", args.config.display()))?;

  let hal = SimulatedHal::new();
  for id in args.missing_can_ids {
    let id = CanId::new(id).context("--missing-can-id")?;
    warn!("Simulating a missing device at CAN ID {}", id);
    hal.mark_unavailable(Resource::CanDevice(id));
  }

  let mut registry = Registry::new(Arc::new(hal), config);
  let map = registry.initialize().context("wiring the robot")?;

  for subsystem in map.subsystems.all() {
    info!("Subsystem ready: {}", subsystem.name());
  }
  info!(
    "Controllers on ports {} and {}",
    map.controllers.driver.inner().port(),
    map.controllers.assistant_driver.inner().port()
  );

  // The control loop would take over from here. Until it exists, leave everything stopped.
  map.drivetrain.stop_motor();
  map.subsystems.stop_all();
  Ok(())
}

fn main() -> ExitCode {
  let args = Args::parse();
  init_all(move || -> RobotResult { Ok(run(args)?) })
}
