use robotmap_hal::actuators::solenoid::{DoubleSolenoid, DoubleSolenoidValue};

use super::Subsystem;

/// The arm as a whole, which currently means its grabber.
#[derive(Debug)]
pub struct ArmSubsystem {
  grabber: DoubleSolenoid,
}

impl ArmSubsystem {
  pub fn new(grabber: DoubleSolenoid) -> Self {
    Self { grabber }
  }

  pub fn grab(&mut self) {
    self.grabber.set(DoubleSolenoidValue::Forward);
  }

  pub fn release(&mut self) {
    self.grabber.set(DoubleSolenoidValue::Reverse);
  }

  pub fn grabber_state(&self) -> Option<DoubleSolenoidValue> {
    self.grabber.get()
  }

  pub fn grabber(&self) -> &DoubleSolenoid { &self.grabber }
}

impl Subsystem for ArmSubsystem {
  fn name(&self) -> &'static str { "arm" }

  fn stop(&mut self) {
    // The cylinder holds position with both channels vented
    self.grabber.set(DoubleSolenoidValue::Off);
  }
}
