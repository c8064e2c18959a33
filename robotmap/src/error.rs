use std::path::PathBuf;

use robotmap_hal::HalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RobotMapError {
  #[error(transparent)]
  Hal(#[from] HalError),

  #[error("the robot map is already initialized; reset it before initializing again")]
  AlreadyInitialized,

  #[error("{kind} {address} is wired to both {first} and {second}")]
  DuplicateAddress { kind: &'static str, address: u8, first: String, second: String },

  #[error("invalid gains for {subsystem}: {reason}")]
  InvalidGains { subsystem: &'static str, reason: String },

  #[error("could not read config file {}: {source}", .path.display())]
  ConfigIo { path: PathBuf, #[source] source: std::io::Error },

  #[error("could not parse config: {0}")]
  ConfigParse(#[from] toml::de::Error),
}

pub type RobotMapResult<T> = Result<T, RobotMapError>;

impl RobotMapError {
  /// The underlying hardware error, if this failure came from the hardware layer.
  pub fn hal(&self) -> Option<&HalError> {
    match self {
      RobotMapError::Hal(e) => Some(e),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use robotmap_hal::{CanId, HalError, Resource};

  use super::RobotMapError;

  #[test]
  fn test_error_display() {
    let err: RobotMapError = HalError::DeviceNotFound(Resource::CanDevice(CanId::new(3).unwrap())).into();
    assert_eq!("no device responded at CAN device 3", err.to_string());
    assert!(matches!(err.hal(), Some(HalError::DeviceNotFound(_))));

    let err = RobotMapError::DuplicateAddress { kind: "CAN ID", address: 5, first: "wrist".into(), second: "gimbal".into() };
    assert_eq!("CAN ID 5 is wired to both wrist and gimbal", err.to_string());
    assert!(err.hal().is_none());
  }
}
