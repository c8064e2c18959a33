//! Construction of every hardware handle on the robot.
//!
//! Start-up is four steps, always in this order:
//!
//! 1. [setup_drivetrain] claims the four drive talons.
//! 2. [setup_arm] claims the arm, wrist and gimbal talons and the grabber solenoid, and
//!    slaves the right side of each arm segment to its left side.
//! 3. [init_subsystems] hands those handles to the subsystems that command them. It takes
//!    step 2's [ArmHandles], so it can't run without it.
//! 4. [setup_controllers] claims the two driver station controllers.
//!
//! Every handle releases its claim when dropped. If any step fails, whatever was claimed
//! before it is released on the way out and the error goes back to the caller. Nothing is
//! retried.

use std::sync::Arc;

use log::{error, info};
use robotmap_hal::{
  actuators::{solenoid::DoubleSolenoid, talon::{FollowerTalon, TalonSRX}},
  drive::MecanumDrive,
  input::{hid::DriverStationHID, xbox::Xbox},
  Hal,
};

use crate::{
  config::{Gains, RobotConfig},
  error::{RobotMapError, RobotMapResult},
  subsystems::{ArmSubsystem, FirstArmSegmentSubsystem, GimbalSubsystem, SecondArmSegmentSubsystem, Subsystems, WristSubsystem},
  wiring::{Controller, Motor, Wiring},
};

pub type Drivetrain = MecanumDrive<TalonSRX, TalonSRX, TalonSRX, TalonSRX>;
pub type XboxController = Xbox<DriverStationHID>;

#[derive(Debug)]
pub struct DriveHandles {
  pub front_left: TalonSRX,
  pub front_right: TalonSRX,
  pub rear_left: TalonSRX,
  pub rear_right: TalonSRX,
}

impl DriveHandles {
  pub fn into_drivetrain(self) -> Drivetrain {
    MecanumDrive::new(self.front_left, self.rear_left, self.front_right, self.rear_right)
  }
}

#[derive(Debug)]
pub struct ArmHandles {
  pub first_arm_segment_left: TalonSRX,
  pub first_arm_segment_right: FollowerTalon,
  pub second_arm_segment_left: TalonSRX,
  pub second_arm_segment_right: FollowerTalon,
  pub wrist: TalonSRX,
  pub gimbal: TalonSRX,
  pub grabber: DoubleSolenoid,
}

#[derive(Debug)]
pub struct Controllers {
  pub driver: XboxController,
  pub assistant_driver: XboxController,
}

/// Everything on the robot, wired and ready for the control loop.
#[derive(Debug)]
pub struct RobotMap {
  pub drivetrain: Drivetrain,
  pub subsystems: Subsystems,
  pub controllers: Controllers,
}

fn talon(hal: &Arc<dyn Hal>, wiring: &Wiring, motor: Motor) -> RobotMapResult<TalonSRX> {
  Ok(TalonSRX::new(hal.clone(), wiring.can_id(motor)?)?)
}

pub fn setup_drivetrain(hal: &Arc<dyn Hal>, wiring: &Wiring) -> RobotMapResult<DriveHandles> {
  Ok(DriveHandles {
    front_left: talon(hal, wiring, Motor::FrontLeftDrive)?,
    front_right: talon(hal, wiring, Motor::FrontRightDrive)?,
    rear_left: talon(hal, wiring, Motor::RearLeftDrive)?,
    rear_right: talon(hal, wiring, Motor::RearRightDrive)?,
  })
}

pub fn setup_arm(hal: &Arc<dyn Hal>, wiring: &Wiring) -> RobotMapResult<ArmHandles> {
  let first_arm_segment_left = talon(hal, wiring, Motor::FirstArmSegmentLeft)?;
  let first_arm_segment_right = talon(hal, wiring, Motor::FirstArmSegmentRight)?;
  let second_arm_segment_left = talon(hal, wiring, Motor::SecondArmSegmentLeft)?;
  let second_arm_segment_right = talon(hal, wiring, Motor::SecondArmSegmentRight)?;
  let wrist = talon(hal, wiring, Motor::Wrist)?;
  let gimbal = talon(hal, wiring, Motor::Gimbal)?;

  // TODO: fit encoders to the arm, wrist and gimbal talons so the gains have something to close the loop on

  let (module, forward, reverse) = wiring.grabber_solenoid()?;
  let grabber = DoubleSolenoid::new(hal.clone(), module, forward, reverse)?;

  let first_arm_segment_right = first_arm_segment_right.follow(&first_arm_segment_left)?;
  let second_arm_segment_right = second_arm_segment_right.follow(&second_arm_segment_left)?;

  Ok(ArmHandles {
    first_arm_segment_left, first_arm_segment_right,
    second_arm_segment_left, second_arm_segment_right,
    wrist, gimbal, grabber,
  })
}

pub fn init_subsystems(arm: ArmHandles, gains: &Gains) -> Subsystems {
  Subsystems {
    arm: ArmSubsystem::new(arm.grabber),
    first_arm_segment: FirstArmSegmentSubsystem::new(arm.first_arm_segment_left, arm.first_arm_segment_right, gains.first_arm_segment),
    second_arm_segment: SecondArmSegmentSubsystem::new(arm.second_arm_segment_left, arm.second_arm_segment_right, gains.second_arm_segment),
    wrist: WristSubsystem::new(arm.wrist, gains.wrist),
    gimbal: GimbalSubsystem::new(arm.gimbal, gains.gimbal),
  }
}

pub fn setup_controllers(hal: &Arc<dyn Hal>, wiring: &Wiring) -> RobotMapResult<Controllers> {
  Ok(Controllers {
    driver: Xbox::from_driver_station(hal.clone(), wiring.controller_port(Controller::Driver)?)?,
    assistant_driver: Xbox::from_driver_station(hal.clone(), wiring.controller_port(Controller::AssistantDriver)?)?,
  })
}

/// Owns the robot map and makes sure it is only ever built once. Building it twice would
/// claim every device twice.
pub struct Registry {
  hal: Arc<dyn Hal>,
  config: RobotConfig,
  map: Option<RobotMap>,
}

impl Registry {
  pub fn new(hal: Arc<dyn Hal>, config: RobotConfig) -> Self {
    Self { hal, config, map: None }
  }

  pub fn config(&self) -> &RobotConfig { &self.config }

  pub fn is_initialized(&self) -> bool { self.map.is_some() }

  pub fn robot_map(&self) -> Option<&RobotMap> { self.map.as_ref() }
  pub fn robot_map_mut(&mut self) -> Option<&mut RobotMap> { self.map.as_mut() }

  pub fn initialize(&mut self) -> RobotMapResult<&mut RobotMap> {
    if self.map.is_some() {
      error!("Robot map initialization requested twice");
      return Err(RobotMapError::AlreadyInitialized);
    }

    let map = self.build().inspect_err(|e| {
      error!("Robot map initialization failed, all claimed hardware has been released: {}", e);
    })?;

    info!("Robot map initialized");
    Ok(self.map.insert(map))
  }

  /// Release every handle. The registry can be initialized again afterwards.
  pub fn reset(&mut self) {
    if self.map.take().is_some() {
      info!("Robot map reset, all hardware released");
    }
  }

  pub fn into_robot_map(self) -> Option<RobotMap> {
    self.map
  }

  fn build(&self) -> RobotMapResult<RobotMap> {
    let hal = &self.hal;
    let wiring = &self.config.wiring;

    self.config.validate()?;

    info!("Wiring drivetrain");
    let drivetrain = setup_drivetrain(hal, wiring)?.into_drivetrain();

    info!("Wiring arm");
    let arm = setup_arm(hal, wiring)?;

    info!("Constructing subsystems");
    let subsystems = init_subsystems(arm, &self.config.gains);

    info!("Wiring controllers");
    let controllers = setup_controllers(hal, wiring)?;

    Ok(RobotMap { drivetrain, subsystems, controllers })
  }
}
