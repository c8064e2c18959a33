//! The mechanisms of the robot. Each subsystem owns the hardware handles it commands, so
//! nothing else can drive them.

pub mod arm;
pub mod joint;

pub use arm::ArmSubsystem;
pub use joint::{FirstArmSegmentSubsystem, GimbalSubsystem, Joint, SecondArmSegmentSubsystem, WristSubsystem};

pub trait Subsystem {
  fn name(&self) -> &'static str;

  /// Put every actuator in the subsystem into a safe, unpowered state.
  fn stop(&mut self);
}

#[derive(Debug)]
pub struct Subsystems {
  pub arm: ArmSubsystem,
  pub first_arm_segment: FirstArmSegmentSubsystem,
  pub second_arm_segment: SecondArmSegmentSubsystem,
  pub wrist: WristSubsystem,
  pub gimbal: GimbalSubsystem,
}

impl Subsystems {
  pub fn all(&self) -> [&dyn Subsystem; 5] {
    [&self.arm, &self.first_arm_segment, &self.second_arm_segment, &self.wrist, &self.gimbal]
  }

  pub fn all_mut(&mut self) -> [&mut dyn Subsystem; 5] {
    [&mut self.arm, &mut self.first_arm_segment, &mut self.second_arm_segment, &mut self.wrist, &mut self.gimbal]
  }

  pub fn stop_all(&mut self) {
    for subsystem in self.all_mut() {
      subsystem.stop();
    }
  }
}
