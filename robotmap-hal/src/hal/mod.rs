#[cfg(any(test, feature = "simulation"))]
pub mod sim;

use std::fmt;

use thiserror::Error;

macro_rules! address_type {
  ($ident:ident, $kind:literal, $max:expr) => {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct $ident(u8);

    impl $ident {
      pub const MAX: u8 = $max;

      pub fn new(value: u8) -> HalResult<Self> {
        if value > Self::MAX {
          Err(HalError::InvalidAddress { kind: $kind, value, max: Self::MAX })
        } else {
          Ok(Self(value))
        }
      }

      pub fn value(&self) -> u8 { self.0 }
    }

    impl TryFrom<u8> for $ident {
      type Error = HalError;
      fn try_from(value: u8) -> HalResult<Self> { Self::new(value) }
    }

    impl fmt::Display for $ident {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  }
}

// 63 is the CAN broadcast address
address_type!(CanId, "CAN ID", 62);
address_type!(PcmModule, "pneumatics module", 62);
address_type!(SolenoidChannel, "solenoid channel", 7);
address_type!(JoystickPort, "joystick port", 5);

/// A physical resource that can be claimed by at most one handle at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
  CanDevice(CanId),
  SolenoidChannel { module: PcmModule, channel: SolenoidChannel },
  Joystick(JoystickPort),
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resource::CanDevice(id) => write!(f, "CAN device {}", id),
      Resource::SolenoidChannel { module, channel } => write!(f, "solenoid channel {} on module {}", channel, module),
      Resource::Joystick(port) => write!(f, "joystick port {}", port),
    }
  }
}

/// Opaque token for a claimed resource, issued by [Hal::claim].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalHandle(u32);

impl HalHandle {
  pub fn from_raw(raw: u32) -> Self { Self(raw) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorDemand {
  Neutral,
  PercentOutput(f64),
  Follower(CanId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickState {
  pub name: String,
  pub axes: Vec<f64>,
  /// Bit `n` is button `n + 1`
  pub buttons: u32,
  pub button_count: u8,
  pub povs: Vec<i16>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HalError {
  #[error("{0} is already claimed by another handle")]
  HardwareConflict(Resource),

  #[error("no device responded at {0}")]
  DeviceNotFound(Resource),

  #[error("invalid {kind} {value} (valid range is 0..={max})")]
  InvalidAddress { kind: &'static str, value: u8, max: u8 },

  #[error("handle {0:?} is not claimed, or does not refer to this kind of device")]
  InvalidHandle(HalHandle),
}

pub type HalResult<T> = Result<T, HalError>;

/// The hardware layer every handle talks through. Claims are exclusive: a resource
/// can be claimed again only after the previous handle has been released.
#[cfg_attr(test, mockall::automock)]
pub trait Hal: Send + Sync {
  fn claim(&self, resource: Resource) -> HalResult<HalHandle>;
  fn release(&self, handle: HalHandle);

  fn set_motor_demand(&self, handle: HalHandle, demand: MotorDemand) -> HalResult<()>;
  fn motor_output(&self, handle: HalHandle) -> HalResult<f64>;

  fn set_solenoid(&self, handle: HalHandle, on: bool) -> HalResult<()>;
  fn solenoid(&self, handle: HalHandle) -> HalResult<bool>;

  // The driver station can connect and disconnect at any point, so this is an Option
  // rather than an error.
  fn joystick(&self, port: JoystickPort) -> Option<JoystickState>;
}

#[cfg(test)]
mod tests {
  use super::{CanId, HalError, JoystickPort, PcmModule, Resource, SolenoidChannel};

  #[test]
  fn test_address_ranges() {
    assert_eq!(62, CanId::new(62).unwrap().value());
    assert_eq!(Err(HalError::InvalidAddress { kind: "CAN ID", value: 63, max: 62 }), CanId::new(63));
    assert!(SolenoidChannel::new(7).is_ok());
    assert!(SolenoidChannel::new(8).is_err());
    assert!(JoystickPort::new(5).is_ok());
    assert!(JoystickPort::try_from(6).is_err());
  }

  #[test]
  fn test_resource_display() {
    let res = Resource::SolenoidChannel { module: PcmModule::new(0).unwrap(), channel: SolenoidChannel::new(1).unwrap() };
    assert_eq!("solenoid channel 1 on module 0", res.to_string());
    assert_eq!(
      "CAN device 3 is already claimed by another handle",
      HalError::HardwareConflict(Resource::CanDevice(CanId::new(3).unwrap())).to_string()
    );
  }
}
