use std::{fmt, sync::Arc};

use log::debug;

use crate::{hal::{Hal, HalHandle, HalResult, JoystickPort, JoystickState, Resource}, sensors::Sensor};

pub trait HIDDevice {
  type Button: Sensor<bool>;
  type Axis: Sensor<f64>;
  type POV: Sensor<isize>;

  // These aren't Option<>s since the driver station can connect and disconnect at any
  // point while the program runs. Failures are deferred to the Sensor returning None.
  fn button(&self, index: usize) -> Self::Button;
  fn axis(&self, index: usize) -> Self::Axis;
  fn pov(&self, index: usize) -> Self::POV;

  fn n_buttons(&self) -> usize;
  fn n_axes(&self) -> usize;
  fn n_pov(&self) -> usize;

  fn name(&self) -> Option<String>;
}

#[derive(Clone)]
struct PortReader {
  port: JoystickPort,
  hal: Arc<dyn Hal>,
}

impl PortReader {
  fn state(&self) -> Option<JoystickState> {
    self.hal.joystick(self.port)
  }
}

#[derive(Clone)]
pub struct DriverStationHIDButton {
  reader: PortReader,
  index: usize,
}

impl Sensor<bool> for DriverStationHIDButton {
  fn get_sensor_value(&self) -> Option<bool> {
    let state = self.reader.state()?;
    // Buttons are 1-indexed
    if self.index < 1 || self.index > state.button_count as usize || self.index > 32 {
      None
    } else {
      Some(state.buttons & (1 << (self.index - 1)) != 0)
    }
  }
}

#[derive(Clone)]
pub struct DriverStationHIDAxis {
  reader: PortReader,
  index: usize,
}

impl Sensor<f64> for DriverStationHIDAxis {
  fn get_sensor_value(&self) -> Option<f64> {
    self.reader.state()?.axes.get(self.index).copied()
  }
}

#[derive(Clone)]
pub struct DriverStationHIDPOV {
  reader: PortReader,
  index: usize,
}

impl Sensor<isize> for DriverStationHIDPOV {
  fn get_sensor_value(&self) -> Option<isize> {
    self.reader.state()?.povs.get(self.index).map(|&x| x as isize)
  }
}

/// A joystick slot on the driver station. The port is claimed for the lifetime of the handle.
pub struct DriverStationHID {
  reader: PortReader,
  handle: HalHandle,
}

impl DriverStationHID {
  pub fn new(hal: Arc<dyn Hal>, port: JoystickPort) -> HalResult<Self> {
    let handle = hal.claim(Resource::Joystick(port))?;
    debug!("Joystick port {} claimed", port);
    Ok(Self { reader: PortReader { port, hal }, handle })
  }

  pub fn port(&self) -> JoystickPort { self.reader.port }

  pub fn is_connected(&self) -> bool {
    self.reader.state().is_some()
  }
}

impl Drop for DriverStationHID {
  fn drop(&mut self) {
    self.reader.hal.release(self.handle);
  }
}

impl fmt::Debug for DriverStationHID {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DriverStationHID").field("port", &self.reader.port).finish()
  }
}

impl HIDDevice for DriverStationHID {
  type Button = DriverStationHIDButton;
  type Axis = DriverStationHIDAxis;
  type POV = DriverStationHIDPOV;

  fn button(&self, index: usize) -> Self::Button {
    DriverStationHIDButton { reader: self.reader.clone(), index }
  }

  fn axis(&self, index: usize) -> Self::Axis {
    DriverStationHIDAxis { reader: self.reader.clone(), index }
  }

  fn pov(&self, index: usize) -> Self::POV {
    DriverStationHIDPOV { reader: self.reader.clone(), index }
  }

  fn n_buttons(&self) -> usize {
    self.reader.state().map(|x| x.button_count as usize).unwrap_or(0)
  }

  fn n_axes(&self) -> usize {
    self.reader.state().map(|x| x.axes.len()).unwrap_or(0)
  }

  fn n_pov(&self) -> usize {
    self.reader.state().map(|x| x.povs.len()).unwrap_or(0)
  }

  fn name(&self) -> Option<String> {
    self.reader.state().map(|x| x.name)
  }
}
