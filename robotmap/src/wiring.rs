//! Where everything is plugged in.
//!
//! The constants below are the wiring of the competition robot. They're collected here so
//! that checking the wiring against the robot means checking one file, and so there are no
//! magic numbers anywhere else. [Wiring] carries the same table in a form that can be
//! overridden from the config file when a device gets moved.

use std::collections::HashMap;

use robotmap_hal::{CanId, JoystickPort, PcmModule, SolenoidChannel};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::error::{RobotMapError, RobotMapResult};

pub const FRONT_LEFT_DRIVE_TALON_ID: u8 = 1;
pub const FRONT_RIGHT_DRIVE_TALON_ID: u8 = 2;
pub const REAR_LEFT_DRIVE_TALON_ID: u8 = 3;
pub const REAR_RIGHT_DRIVE_TALON_ID: u8 = 4;

pub const FIRST_ARM_SEGMENT_LEFT_TALON_ID: u8 = 5;
pub const FIRST_ARM_SEGMENT_RIGHT_TALON_ID: u8 = 6;
pub const SECOND_ARM_SEGMENT_LEFT_TALON_ID: u8 = 7;
pub const SECOND_ARM_SEGMENT_RIGHT_TALON_ID: u8 = 8;
pub const WRIST_TALON_ID: u8 = 9;
/// The rotating base
pub const GIMBAL_TALON_ID: u8 = 10;

/// The default pneumatics module
pub const GRABBER_SOLENOID_MODULE: u8 = 0;
pub const GRABBER_SOLENOID_FORWARD_CHANNEL: u8 = 0;
pub const GRABBER_SOLENOID_REVERSE_CHANNEL: u8 = 1;

/// Driver station port of the main driver's controller
pub const DRIVER_CONTROLLER_PORT: u8 = 0;
/// Driver station port of the assistant driver's controller, who runs the arm
pub const ASSISTANT_DRIVER_CONTROLLER_PORT: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Motor {
  FrontLeftDrive,
  FrontRightDrive,
  RearLeftDrive,
  RearRightDrive,
  FirstArmSegmentLeft,
  FirstArmSegmentRight,
  SecondArmSegmentLeft,
  SecondArmSegmentRight,
  Wrist,
  Gimbal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Controller {
  Driver,
  AssistantDriver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Wiring {
  pub front_left_drive: u8,
  pub front_right_drive: u8,
  pub rear_left_drive: u8,
  pub rear_right_drive: u8,

  pub first_arm_segment_left: u8,
  pub first_arm_segment_right: u8,
  pub second_arm_segment_left: u8,
  pub second_arm_segment_right: u8,
  pub wrist: u8,
  pub gimbal: u8,

  pub grabber_solenoid_module: u8,
  pub grabber_solenoid_forward: u8,
  pub grabber_solenoid_reverse: u8,

  pub driver_controller: u8,
  pub assistant_driver_controller: u8,
}

impl Default for Wiring {
  fn default() -> Self {
    Self {
      front_left_drive: FRONT_LEFT_DRIVE_TALON_ID,
      front_right_drive: FRONT_RIGHT_DRIVE_TALON_ID,
      rear_left_drive: REAR_LEFT_DRIVE_TALON_ID,
      rear_right_drive: REAR_RIGHT_DRIVE_TALON_ID,
      first_arm_segment_left: FIRST_ARM_SEGMENT_LEFT_TALON_ID,
      first_arm_segment_right: FIRST_ARM_SEGMENT_RIGHT_TALON_ID,
      second_arm_segment_left: SECOND_ARM_SEGMENT_LEFT_TALON_ID,
      second_arm_segment_right: SECOND_ARM_SEGMENT_RIGHT_TALON_ID,
      wrist: WRIST_TALON_ID,
      gimbal: GIMBAL_TALON_ID,
      grabber_solenoid_module: GRABBER_SOLENOID_MODULE,
      grabber_solenoid_forward: GRABBER_SOLENOID_FORWARD_CHANNEL,
      grabber_solenoid_reverse: GRABBER_SOLENOID_REVERSE_CHANNEL,
      driver_controller: DRIVER_CONTROLLER_PORT,
      assistant_driver_controller: ASSISTANT_DRIVER_CONTROLLER_PORT,
    }
  }
}

impl Wiring {
  pub fn raw_can_id(&self, motor: Motor) -> u8 {
    match motor {
      Motor::FrontLeftDrive => self.front_left_drive,
      Motor::FrontRightDrive => self.front_right_drive,
      Motor::RearLeftDrive => self.rear_left_drive,
      Motor::RearRightDrive => self.rear_right_drive,
      Motor::FirstArmSegmentLeft => self.first_arm_segment_left,
      Motor::FirstArmSegmentRight => self.first_arm_segment_right,
      Motor::SecondArmSegmentLeft => self.second_arm_segment_left,
      Motor::SecondArmSegmentRight => self.second_arm_segment_right,
      Motor::Wrist => self.wrist,
      Motor::Gimbal => self.gimbal,
    }
  }

  pub fn can_id(&self, motor: Motor) -> RobotMapResult<CanId> {
    Ok(CanId::new(self.raw_can_id(motor))?)
  }

  pub fn raw_controller_port(&self, controller: Controller) -> u8 {
    match controller {
      Controller::Driver => self.driver_controller,
      Controller::AssistantDriver => self.assistant_driver_controller,
    }
  }

  pub fn controller_port(&self, controller: Controller) -> RobotMapResult<JoystickPort> {
    Ok(JoystickPort::new(self.raw_controller_port(controller))?)
  }

  pub fn grabber_solenoid(&self) -> RobotMapResult<(PcmModule, SolenoidChannel, SolenoidChannel)> {
    Ok((
      PcmModule::new(self.grabber_solenoid_module)?,
      SolenoidChannel::new(self.grabber_solenoid_forward)?,
      SolenoidChannel::new(self.grabber_solenoid_reverse)?,
    ))
  }

  /// Check every address is in range and that nothing shares an address with anything else
  /// of its kind. Nothing is claimed by this.
  pub fn validate(&self) -> RobotMapResult<()> {
    let mut can_ids = HashMap::new();
    for motor in Motor::iter() {
      let id = self.can_id(motor)?;
      if let Some(first) = can_ids.insert(id, motor) {
        return Err(duplicate("CAN ID", id.value(), first, motor));
      }
    }

    let (_, forward, reverse) = self.grabber_solenoid()?;
    if forward == reverse {
      return Err(duplicate("solenoid channel", forward.value(), "grabber_solenoid_forward", "grabber_solenoid_reverse"));
    }

    let mut ports = HashMap::new();
    for controller in Controller::iter() {
      let port = self.controller_port(controller)?;
      if let Some(first) = ports.insert(port, controller) {
        return Err(duplicate("joystick port", port.value(), first, controller));
      }
    }

    Ok(())
  }
}

fn duplicate<A: ToString, B: ToString>(kind: &'static str, address: u8, first: A, second: B) -> RobotMapError {
  RobotMapError::DuplicateAddress { kind, address, first: first.to_string(), second: second.to_string() }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use robotmap_hal::HalError;
  use strum::IntoEnumIterator;

  use crate::error::RobotMapError;
  use super::{Controller, Motor, Wiring};

  #[test]
  fn test_default_table() {
    let wiring = Wiring::default();
    let ids: Vec<u8> = Motor::iter().map(|m| wiring.raw_can_id(m)).collect();
    assert_eq!(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10], ids);
    assert_eq!((0, 0, 1), (wiring.grabber_solenoid_module, wiring.grabber_solenoid_forward, wiring.grabber_solenoid_reverse));
    assert_eq!(0, wiring.raw_controller_port(Controller::Driver));
    assert_eq!(1, wiring.raw_controller_port(Controller::AssistantDriver));
  }

  #[test]
  fn test_addresses_distinct_per_kind() {
    let wiring = Wiring::default();

    let can: HashSet<u8> = Motor::iter().map(|m| wiring.raw_can_id(m)).collect();
    assert_eq!(Motor::iter().count(), can.len());

    assert_ne!(wiring.grabber_solenoid_forward, wiring.grabber_solenoid_reverse);

    let ports: HashSet<u8> = Controller::iter().map(|c| wiring.raw_controller_port(c)).collect();
    assert_eq!(Controller::iter().count(), ports.len());

    wiring.validate().unwrap();
  }

  #[test]
  fn test_duplicate_can_id() {
    let wiring = Wiring { gimbal: 9, ..Wiring::default() };
    match wiring.validate() {
      Err(RobotMapError::DuplicateAddress { kind, address, first, second }) => {
        assert_eq!("CAN ID", kind);
        assert_eq!(9, address);
        assert_eq!("wrist", first);
        assert_eq!("gimbal", second);
      },
      other => panic!("Expected DuplicateAddress, got {:?}", other),
    }
  }

  #[test]
  fn test_duplicate_solenoid_and_ports() {
    let wiring = Wiring { grabber_solenoid_reverse: 0, ..Wiring::default() };
    assert!(matches!(wiring.validate(), Err(RobotMapError::DuplicateAddress { kind: "solenoid channel", .. })));

    let wiring = Wiring { assistant_driver_controller: 0, ..Wiring::default() };
    assert!(matches!(wiring.validate(), Err(RobotMapError::DuplicateAddress { kind: "joystick port", .. })));
  }

  #[test]
  fn test_out_of_range() {
    let wiring = Wiring { wrist: 63, ..Wiring::default() };
    assert!(matches!(wiring.validate(), Err(RobotMapError::Hal(HalError::InvalidAddress { value: 63, .. }))));

    let wiring = Wiring { grabber_solenoid_reverse: 8, ..Wiring::default() };
    assert!(matches!(wiring.validate(), Err(RobotMapError::Hal(HalError::InvalidAddress { kind: "solenoid channel", .. }))));

    let wiring = Wiring { driver_controller: 6, ..Wiring::default() };
    assert!(matches!(wiring.validate(), Err(RobotMapError::Hal(HalError::InvalidAddress { kind: "joystick port", .. }))));
  }
}
