use robotmap_hal::actuators::talon::{FollowerTalon, TalonSRX};

use crate::config::PidGains;

use super::Subsystem;

/// One rotating joint of the arm, driven by a motor (and possibly a second motor slaved to
/// it), along with the gains its position loop will run.
#[derive(Debug)]
pub struct Joint {
  motor: TalonSRX,
  follower: Option<FollowerTalon>,
  gains: PidGains,
}

impl Joint {
  pub fn single(motor: TalonSRX, gains: PidGains) -> Self {
    Self { motor, follower: None, gains }
  }

  pub fn paired(leader: TalonSRX, follower: FollowerTalon, gains: PidGains) -> Self {
    debug_assert_eq!(leader.id(), follower.leader(), "follower is bound to a different leader");
    Self { motor: leader, follower: Some(follower), gains }
  }

  pub fn gains(&self) -> PidGains { self.gains }
  pub fn motor(&self) -> &TalonSRX { &self.motor }
  pub fn follower(&self) -> Option<&FollowerTalon> { self.follower.as_ref() }

  /// Open-loop output for the joint, in [-1, 1]. The follower, if any, tracks it.
  pub fn set_output(&mut self, output: f64) {
    self.motor.set_percent_output(output);
  }

  pub fn output(&self) -> Option<f64> {
    self.motor.applied_output()
  }
}

macro_rules! joint_subsystem {
  (paired $name:ident, $label:literal) => {
    joint_subsystem!(@common $name, $label);

    impl $name {
      pub fn new(leader: TalonSRX, follower: FollowerTalon, gains: PidGains) -> Self {
        Self(Joint::paired(leader, follower, gains))
      }
    }
  };
  (single $name:ident, $label:literal) => {
    joint_subsystem!(@common $name, $label);

    impl $name {
      pub fn new(motor: TalonSRX, gains: PidGains) -> Self {
        Self(Joint::single(motor, gains))
      }
    }
  };
  (@common $name:ident, $label:literal) => {
    #[derive(Debug)]
    pub struct $name(Joint);

    impl std::ops::Deref for $name {
      type Target = Joint;
      fn deref(&self) -> &Joint { &self.0 }
    }

    impl std::ops::DerefMut for $name {
      fn deref_mut(&mut self) -> &mut Joint { &mut self.0 }
    }

    impl Subsystem for $name {
      fn name(&self) -> &'static str { $label }
      fn stop(&mut self) { self.0.motor.stop() }
    }
  };
}

joint_subsystem!(paired FirstArmSegmentSubsystem, "first_arm_segment");
joint_subsystem!(paired SecondArmSegmentSubsystem, "second_arm_segment");
joint_subsystem!(single WristSubsystem, "wrist");
joint_subsystem!(single GimbalSubsystem, "gimbal");
