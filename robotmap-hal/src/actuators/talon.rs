use std::{fmt, sync::Arc};

use log::{debug, warn};

use crate::hal::{CanId, Hal, HalHandle, HalResult, MotorDemand, Resource};

use super::Actuator;

/// A Talon SRX motor controller on the CAN bus, commanded in percent output.
///
/// The CAN ID is claimed for as long as this handle is alive.
pub struct TalonSRX {
  id: CanId,
  handle: HalHandle,
  hal: Arc<dyn Hal>,
}

impl TalonSRX {
  pub fn new(hal: Arc<dyn Hal>, id: CanId) -> HalResult<Self> {
    let handle = hal.claim(Resource::CanDevice(id))?;
    debug!("Talon SRX {} claimed", id);
    Ok(Self { id, handle, hal })
  }

  pub fn id(&self) -> CanId { self.id }

  /// Clamped to [-1, 1]. A NaN or infinite output puts the controller in neutral.
  pub fn set_percent_output(&mut self, output: f64) {
    if !output.is_finite() {
      warn!("Talon SRX {}: refusing non-finite output {}, going neutral", self.id, output);
      self.send(MotorDemand::Neutral);
      return;
    }
    self.send(MotorDemand::PercentOutput(output.clamp(-1.0, 1.0)));
  }

  pub fn stop(&mut self) {
    self.send(MotorDemand::Neutral);
  }

  /// The output the controller is actually applying, or None if it can't be read.
  pub fn applied_output(&self) -> Option<f64> {
    self.hal.motor_output(self.handle).ok()
  }

  /// Slave this controller to `leader`. The returned handle can't be commanded, so the
  /// follower can only ever mirror the leader.
  pub fn follow(self, leader: &TalonSRX) -> HalResult<FollowerTalon> {
    self.hal.set_motor_demand(self.handle, MotorDemand::Follower(leader.id))?;
    debug!("Talon SRX {} following {}", self.id, leader.id);
    Ok(FollowerTalon { leader: leader.id, talon: self })
  }

  fn send(&mut self, demand: MotorDemand) {
    // Losing a single frame mid-match isn't worth taking the robot down for
    if let Err(e) = self.hal.set_motor_demand(self.handle, demand) {
      warn!("Talon SRX {}: could not apply {:?}: {}", self.id, demand, e);
    }
  }
}

impl Drop for TalonSRX {
  fn drop(&mut self) {
    self.send(MotorDemand::Neutral);
    self.hal.release(self.handle);
    debug!("Talon SRX {} released", self.id);
  }
}

impl fmt::Debug for TalonSRX {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TalonSRX").field("id", &self.id).field("handle", &self.handle).finish()
  }
}

impl Actuator<f64> for TalonSRX {
  fn set_actuator_value(&mut self, value: f64) {
    self.set_percent_output(value)
  }
}

#[derive(Debug)]
pub struct FollowerTalon {
  leader: CanId,
  talon: TalonSRX,
}

impl FollowerTalon {
  pub fn id(&self) -> CanId { self.talon.id }
  pub fn leader(&self) -> CanId { self.leader }

  pub fn applied_output(&self) -> Option<f64> {
    self.talon.applied_output()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use approx::assert_relative_eq;
  use mockall::{predicate::eq, Sequence};

  use crate::hal::{sim::SimulatedHal, CanId, Hal, HalError, HalHandle, MockHal, MotorDemand, Resource};
  use super::TalonSRX;

  fn id(raw: u8) -> CanId { CanId::new(raw).unwrap() }

  #[test]
  fn test_talon_lifecycle() {
    let mut hal = MockHal::new();
    let mut seq = Sequence::new();
    let handle = HalHandle::from_raw(7);

    hal.expect_claim().with(eq(Resource::CanDevice(id(4)))).times(1).in_sequence(&mut seq).returning(move |_| Ok(handle));
    hal.expect_set_motor_demand().with(eq(handle), eq(MotorDemand::PercentOutput(1.0))).times(1).in_sequence(&mut seq).returning(|_, _| Ok(()));
    hal.expect_set_motor_demand().with(eq(handle), eq(MotorDemand::Neutral)).times(1).in_sequence(&mut seq).returning(|_, _| Ok(()));
    hal.expect_release().with(eq(handle)).times(1).in_sequence(&mut seq).return_const(());

    let mut talon = TalonSRX::new(Arc::new(hal), id(4)).unwrap();
    // Clamped to full output
    talon.set_percent_output(3.0);
    drop(talon);
  }

  #[test]
  fn test_failed_claim_does_not_release() {
    let mut hal = MockHal::new();
    hal.expect_claim().returning(|r| Err(HalError::DeviceNotFound(r)));
    hal.expect_release().never();

    let err = TalonSRX::new(Arc::new(hal), id(3)).unwrap_err();
    assert_eq!(HalError::DeviceNotFound(Resource::CanDevice(id(3))), err);
  }

  #[test]
  fn test_command_failure_is_not_fatal() {
    let mut hal = MockHal::new();
    hal.expect_claim().returning(|_| Ok(HalHandle::from_raw(0)));
    hal.expect_set_motor_demand().returning(|h, _| Err(HalError::InvalidHandle(h)));
    hal.expect_release().return_const(());

    let mut talon = TalonSRX::new(Arc::new(hal), id(1)).unwrap();
    talon.set_percent_output(0.5);
  }

  #[test]
  fn test_non_finite_output_goes_neutral() {
    let hal = Arc::new(SimulatedHal::new());
    let mut talon = TalonSRX::new(hal.clone(), id(9)).unwrap();

    talon.set_percent_output(0.4);
    talon.set_percent_output(f64::NAN);
    assert_eq!(Some(MotorDemand::Neutral), hal.motor_demand(id(9)));
    assert_relative_eq!(0.0, talon.applied_output().unwrap());

    talon.set_percent_output(f64::NEG_INFINITY);
    assert_eq!(Some(MotorDemand::Neutral), hal.motor_demand(id(9)));
  }

  #[test]
  fn test_follower_mirrors_leader() {
    let hal = Arc::new(SimulatedHal::new());
    let mut leader = TalonSRX::new(hal.clone(), id(5)).unwrap();
    let follower = TalonSRX::new(hal.clone(), id(6)).unwrap().follow(&leader).unwrap();

    assert_eq!(id(5), follower.leader());
    leader.set_percent_output(-0.6);
    assert_relative_eq!(-0.6, follower.applied_output().unwrap());
    leader.stop();
    assert_relative_eq!(0.0, follower.applied_output().unwrap());
  }

  #[test]
  fn test_drop_releases_claim() {
    let hal = Arc::new(SimulatedHal::new());
    let follower = {
      let leader = TalonSRX::new(hal.clone(), id(7)).unwrap();
      TalonSRX::new(hal.clone(), id(8)).unwrap().follow(&leader).unwrap()
    };
    assert!(!hal.is_claimed(Resource::CanDevice(id(7))));
    assert!(hal.is_claimed(Resource::CanDevice(id(8))));
    drop(follower);
    assert_eq!(0, hal.claim_count());
    assert!(hal.claim(Resource::CanDevice(id(8))).is_ok());
  }
}
