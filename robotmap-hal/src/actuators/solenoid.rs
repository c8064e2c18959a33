use std::{fmt, sync::Arc};

use log::{debug, warn};

use crate::hal::{Hal, HalError, HalHandle, HalResult, PcmModule, Resource, SolenoidChannel};

use super::Actuator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleSolenoidValue {
  Off,
  Forward,
  Reverse,
}

/// A double-acting pneumatic cylinder driven by two channels on the same module.
pub struct DoubleSolenoid {
  module: PcmModule,
  channels: (SolenoidChannel, SolenoidChannel),
  handles: (HalHandle, HalHandle),
  hal: Arc<dyn Hal>,
}

impl DoubleSolenoid {
  pub fn new(hal: Arc<dyn Hal>, module: PcmModule, forward: SolenoidChannel, reverse: SolenoidChannel) -> HalResult<Self> {
    let forward_res = Resource::SolenoidChannel { module, channel: forward };
    let reverse_res = Resource::SolenoidChannel { module, channel: reverse };

    if forward == reverse {
      return Err(HalError::HardwareConflict(reverse_res));
    }

    let forward_handle = hal.claim(forward_res)?;
    let reverse_handle = match hal.claim(reverse_res) {
      Ok(h) => h,
      Err(e) => {
        hal.release(forward_handle);
        return Err(e);
      }
    };

    debug!("Double solenoid claimed on module {} (forward {}, reverse {})", module, forward, reverse);
    Ok(Self { module, channels: (forward, reverse), handles: (forward_handle, reverse_handle), hal })
  }

  pub fn module(&self) -> PcmModule { self.module }
  pub fn forward_channel(&self) -> SolenoidChannel { self.channels.0 }
  pub fn reverse_channel(&self) -> SolenoidChannel { self.channels.1 }

  pub fn set(&mut self, value: DoubleSolenoidValue) {
    let (forward, reverse) = match value {
      DoubleSolenoidValue::Off => (false, false),
      DoubleSolenoidValue::Forward => (true, false),
      DoubleSolenoidValue::Reverse => (false, true),
    };

    // Drop the side being vented first so both channels are never energised together
    let result = if forward {
      self.hal.set_solenoid(self.handles.1, reverse).and_then(|_| self.hal.set_solenoid(self.handles.0, forward))
    } else {
      self.hal.set_solenoid(self.handles.0, forward).and_then(|_| self.hal.set_solenoid(self.handles.1, reverse))
    };

    if let Err(e) = result {
      warn!("Double solenoid on module {}: could not apply {:?}: {}", self.module, value, e);
    }
  }

  pub fn get(&self) -> Option<DoubleSolenoidValue> {
    let forward = self.hal.solenoid(self.handles.0).ok()?;
    let reverse = self.hal.solenoid(self.handles.1).ok()?;
    Some(match (forward, reverse) {
      (true, false) => DoubleSolenoidValue::Forward,
      (false, true) => DoubleSolenoidValue::Reverse,
      _ => DoubleSolenoidValue::Off,
    })
  }
}

impl Drop for DoubleSolenoid {
  fn drop(&mut self) {
    self.hal.release(self.handles.0);
    self.hal.release(self.handles.1);
  }
}

impl fmt::Debug for DoubleSolenoid {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DoubleSolenoid").field("module", &self.module).field("channels", &self.channels).finish()
  }
}

impl Actuator<DoubleSolenoidValue> for DoubleSolenoid {
  fn set_actuator_value(&mut self, value: DoubleSolenoidValue) {
    self.set(value)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crate::{actuators::PneumaticActuator, hal::{sim::{HalEvent, SimulatedHal}, HalError, PcmModule, Resource, SolenoidChannel}};
  use super::{DoubleSolenoid, DoubleSolenoidValue};

  fn channel(c: u8) -> SolenoidChannel { SolenoidChannel::new(c).unwrap() }
  fn module() -> PcmModule { PcmModule::new(0).unwrap() }

  #[test]
  fn test_double_solenoid() {
    let hal = Arc::new(SimulatedHal::new());
    let mut sol = DoubleSolenoid::new(hal.clone(), module(), channel(0), channel(1)).unwrap();
    assert_eq!(Some(DoubleSolenoidValue::Off), sol.get());

    sol.set_position(DoubleSolenoidValue::Forward);
    assert_eq!(Some(DoubleSolenoidValue::Forward), sol.get());
    sol.set(DoubleSolenoidValue::Reverse);
    assert_eq!(Some(DoubleSolenoidValue::Reverse), sol.get());

    // Switching direction never has both channels on
    let fwd = Resource::SolenoidChannel { module: module(), channel: channel(0) };
    let events = hal.events();
    let last_two = &events[events.len() - 2..];
    assert_eq!(HalEvent::Solenoid(fwd, false), last_two[0]);

    drop(sol);
    assert_eq!(0, hal.claim_count());
  }

  #[test]
  fn test_same_channel_rejected() {
    let hal = Arc::new(SimulatedHal::new());
    let err = DoubleSolenoid::new(hal.clone(), module(), channel(2), channel(2)).unwrap_err();
    assert!(matches!(err, HalError::HardwareConflict(_)));
    assert_eq!(0, hal.claim_count());
  }

  #[test]
  fn test_partial_claim_released() {
    let hal = Arc::new(SimulatedHal::new());
    hal.mark_unavailable(Resource::SolenoidChannel { module: module(), channel: channel(1) });

    let err = DoubleSolenoid::new(hal.clone(), module(), channel(0), channel(1)).unwrap_err();
    assert!(matches!(err, HalError::DeviceNotFound(_)));
    assert_eq!(0, hal.claim_count());
  }
}
