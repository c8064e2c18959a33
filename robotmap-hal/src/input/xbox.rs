use std::sync::Arc;

use crate::{hal::{Hal, HalResult, JoystickPort}, sensors::Inverted, traits::Wrapper};

use super::hid::{DriverStationHID, HIDDevice};

/// Axis indices as an Xbox controller reports them to the driver station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XboxAxis {
  LeftX = 0,
  LeftY = 1,
  LeftTrigger = 2,
  RightTrigger = 3,
  RightX = 4,
  RightY = 5,
}

/// Button indices, 1-based like every driver-station button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XboxButton {
  A = 1,
  B = 2,
  X = 3,
  Y = 4,
  LeftBumper = 5,
  RightBumper = 6,
  Back = 7,
  Start = 8,
  LeftStick = 9,
  RightStick = 10,
}

pub trait XboxController {
  type HID: HIDDevice;

  fn inner(&self) -> &Self::HID;

  fn axis(&self, axis: XboxAxis) -> <Self::HID as HIDDevice>::Axis {
    self.inner().axis(axis as usize)
  }

  fn button(&self, button: XboxButton) -> <Self::HID as HIDDevice>::Button {
    self.inner().button(button as usize)
  }

  fn dpad(&self) -> <Self::HID as HIDDevice>::POV {
    self.inner().pov(0)
  }

  /// Left stick as (right, forward), both positive in the direction the stick is pushed.
  fn left_stick(&self) -> (<Self::HID as HIDDevice>::Axis, Inverted<<Self::HID as HIDDevice>::Axis>) {
    (self.axis(XboxAxis::LeftX), Inverted(self.axis(XboxAxis::LeftY)))
  }

  /// Right stick as (right, forward), both positive in the direction the stick is pushed.
  fn right_stick(&self) -> (<Self::HID as HIDDevice>::Axis, Inverted<<Self::HID as HIDDevice>::Axis>) {
    (self.axis(XboxAxis::RightX), Inverted(self.axis(XboxAxis::RightY)))
  }
}

#[derive(Debug)]
pub struct Xbox<HID: HIDDevice>(HID);

impl<HID: HIDDevice> From<HID> for Xbox<HID> {
  fn from(value: HID) -> Self { Xbox(value) }
}

impl<HID: HIDDevice> Wrapper<HID> for Xbox<HID> {
  fn eject(self) -> HID { self.0 }
}

impl Xbox<DriverStationHID> {
  /// Claim the driver-station port and treat whatever is plugged into it as an Xbox controller.
  pub fn from_driver_station(hal: Arc<dyn Hal>, port: JoystickPort) -> HalResult<Self> {
    Ok(Xbox(DriverStationHID::new(hal, port)?))
  }
}

impl<HID: HIDDevice> XboxController for Xbox<HID> {
  type HID = HID;

  fn inner(&self) -> &HID { &self.0 }
}
