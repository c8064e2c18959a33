use crate::{actuators::SpeedController, traits::Wrapper};

pub const DEFAULT_DEADBAND: f64 = 0.02;
pub const DEFAULT_MAX_OUTPUT: f64 = 1.0;

/// A four-wheel mecanum drivetrain. Translation and rotation are independent, so the robot
/// can strafe while turning.
///
/// Axis conventions: `y_speed` is positive to the right, `x_speed` is positive forward and
/// `z_rotation` is positive clockwise. The right side is inverted by default, since those
/// motors are mounted facing the other way.
#[derive(Debug)]
pub struct MecanumDrive<FL, RL, FR, RR> {
  front_left: FL,
  rear_left: RL,
  front_right: FR,
  rear_right: RR,

  deadband: f64,
  max_output: f64,
  right_side_inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSpeeds {
  pub front_left: f64,
  pub front_right: f64,
  pub rear_left: f64,
  pub rear_right: f64,
}

impl WheelSpeeds {
  /// Scale all four speeds down together if any of them is out of range.
  pub fn normalized(self) -> Self {
    let max = [self.front_left, self.front_right, self.rear_left, self.rear_right]
      .iter()
      .fold(0.0f64, |acc, x| acc.max(x.abs()));

    if max > 1.0 {
      Self {
        front_left: self.front_left / max,
        front_right: self.front_right / max,
        rear_left: self.rear_left / max,
        rear_right: self.rear_right / max,
      }
    } else {
      self
    }
  }

  fn scaled(self, k: f64) -> Self {
    Self {
      front_left: self.front_left * k,
      front_right: self.front_right * k,
      rear_left: self.rear_left * k,
      rear_right: self.rear_right * k,
    }
  }
}

// NaN and infinite commands read as zero, so they can never reach a motor
fn command(value: f64) -> f64 {
  if value.is_finite() { value.clamp(-1.0, 1.0) } else { 0.0 }
}

pub fn apply_deadband(value: f64, deadband: f64) -> f64 {
  if value.abs() > deadband {
    if value > 0.0 {
      (value - deadband) / (1.0 - deadband)
    } else {
      (value + deadband) / (1.0 - deadband)
    }
  } else {
    0.0
  }
}

/// Wheel speeds for a field- or robot-relative cartesian command, before output scaling.
pub fn cartesian_wheel_speeds(y_speed: f64, x_speed: f64, z_rotation: f64, gyro_angle: f64) -> WheelSpeeds {
  // Rotate the translation by -gyro so the command is field relative
  let (sin, cos) = (-gyro_angle).to_radians().sin_cos();
  let y = y_speed * cos - x_speed * sin;
  let x = y_speed * sin + x_speed * cos;

  WheelSpeeds {
    front_left: y + x + z_rotation,
    front_right: -y + x - z_rotation,
    rear_left: -y + x + z_rotation,
    rear_right: y + x - z_rotation,
  }.normalized()
}

impl<FL, RL, FR, RR> MecanumDrive<FL, RL, FR, RR>
where
  FL: SpeedController,
  RL: SpeedController,
  FR: SpeedController,
  RR: SpeedController,
{
  pub fn new(front_left: FL, rear_left: RL, front_right: FR, rear_right: RR) -> Self {
    Self {
      front_left, rear_left, front_right, rear_right,
      deadband: DEFAULT_DEADBAND,
      max_output: DEFAULT_MAX_OUTPUT,
      right_side_inverted: true,
    }
  }

  pub fn set_deadband(&mut self, deadband: f64) { self.deadband = deadband.clamp(0.0, 0.99) }
  pub fn set_max_output(&mut self, max_output: f64) {
    if max_output.is_finite() {
      self.max_output = max_output.clamp(0.0, 1.0);
    }
  }
  pub fn set_right_side_inverted(&mut self, inverted: bool) { self.right_side_inverted = inverted }
  pub fn is_right_side_inverted(&self) -> bool { self.right_side_inverted }

  pub fn front_left(&self) -> &FL { &self.front_left }
  pub fn rear_left(&self) -> &RL { &self.rear_left }
  pub fn front_right(&self) -> &FR { &self.front_right }
  pub fn rear_right(&self) -> &RR { &self.rear_right }

  /// Drive with a cartesian velocity and rotation. With a gyro angle of 0 the command is
  /// robot-relative; passing the robot heading (degrees) makes it field-relative.
  pub fn drive_cartesian(&mut self, y_speed: f64, x_speed: f64, z_rotation: f64, gyro_angle: f64) {
    let y_speed = apply_deadband(command(y_speed), self.deadband);
    let x_speed = apply_deadband(command(x_speed), self.deadband);
    let z_rotation = command(z_rotation);
    // Without a usable heading, fall back to robot-relative
    let gyro_angle = if gyro_angle.is_finite() { gyro_angle } else { 0.0 };

    let speeds = cartesian_wheel_speeds(y_speed, x_speed, z_rotation, gyro_angle).scaled(self.max_output);
    self.apply(speeds);
  }

  /// Drive at `magnitude` in the direction `angle` (degrees, 0 is forward, clockwise positive).
  pub fn drive_polar(&mut self, magnitude: f64, angle: f64, z_rotation: f64) {
    let (sin, cos) = angle.to_radians().sin_cos();
    self.drive_cartesian(magnitude * sin, magnitude * cos, z_rotation, 0.0);
  }

  pub fn stop_motor(&mut self) {
    self.front_left.set_speed(0.0);
    self.rear_left.set_speed(0.0);
    self.front_right.set_speed(0.0);
    self.rear_right.set_speed(0.0);
  }

  fn apply(&mut self, speeds: WheelSpeeds) {
    let right = if self.right_side_inverted { -1.0 } else { 1.0 };
    self.front_left.set_speed(speeds.front_left);
    self.rear_left.set_speed(speeds.rear_left);
    self.front_right.set_speed(speeds.front_right * right);
    self.rear_right.set_speed(speeds.rear_right * right);
  }
}

impl<FL, RL, FR, RR> Wrapper<(FL, RL, FR, RR)> for MecanumDrive<FL, RL, FR, RR> {
  fn eject(self) -> (FL, RL, FR, RR) {
    (self.front_left, self.rear_left, self.front_right, self.rear_right)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;

  use crate::{actuators::test_util::RecordingActuator, traits::Wrapper};
  use super::{apply_deadband, cartesian_wheel_speeds, MecanumDrive};

  type Rec = RecordingActuator<f64>;

  fn drive() -> MecanumDrive<Rec, Rec, Rec, Rec> {
    MecanumDrive::new(Rec::default(), Rec::default(), Rec::default(), Rec::default())
  }

  fn outputs(d: &MecanumDrive<Rec, Rec, Rec, Rec>) -> [f64; 4] {
    [
      d.front_left().value.unwrap(),
      d.rear_left().value.unwrap(),
      d.front_right().value.unwrap(),
      d.rear_right().value.unwrap(),
    ]
  }

  #[test]
  fn test_forward() {
    let mut d = drive();
    d.drive_cartesian(0.0, 1.0, 0.0, 0.0);
    // Right side is inverted
    assert_eq!([1.0, 1.0, -1.0, -1.0], outputs(&d));
  }

  #[test]
  fn test_strafe_right() {
    let mut d = drive();
    d.set_right_side_inverted(false);
    d.drive_cartesian(1.0, 0.0, 0.0, 0.0);
    let [fl, rl, fr, rr] = outputs(&d);
    assert_relative_eq!(1.0, fl);
    assert_relative_eq!(-1.0, rl);
    assert_relative_eq!(-1.0, fr);
    assert_relative_eq!(1.0, rr);
  }

  #[test]
  fn test_rotate_in_place() {
    let mut d = drive();
    d.set_right_side_inverted(false);
    d.drive_cartesian(0.0, 0.0, 0.5, 0.0);
    assert_eq!([0.5, 0.5, -0.5, -0.5], outputs(&d));
  }

  #[test]
  fn test_normalization() {
    let speeds = cartesian_wheel_speeds(0.0, 1.0, 1.0, 0.0);
    assert_relative_eq!(1.0, speeds.front_left);
    assert_relative_eq!(0.0, speeds.front_right);
    assert_relative_eq!(1.0, speeds.rear_left);
    assert_relative_eq!(0.0, speeds.rear_right);
  }

  #[test]
  fn test_field_relative() {
    // A forward command at a 90 degree heading is rotated onto the robot's strafe axis
    let speeds = cartesian_wheel_speeds(0.0, 1.0, 0.0, 90.0);
    let strafe = cartesian_wheel_speeds(1.0, 0.0, 0.0, 0.0);
    assert_relative_eq!(strafe.front_left, speeds.front_left, epsilon = 1e-9);
    assert_relative_eq!(strafe.front_right, speeds.front_right, epsilon = 1e-9);
    assert_relative_eq!(strafe.rear_left, speeds.rear_left, epsilon = 1e-9);
    assert_relative_eq!(strafe.rear_right, speeds.rear_right, epsilon = 1e-9);
  }

  #[test]
  fn test_non_finite_commands() {
    let mut d = drive();
    d.drive_cartesian(0.0, 0.0, f64::NAN, 0.0);
    assert_eq!([0.0, 0.0, 0.0, 0.0], outputs(&d).map(f64::abs));

    d.drive_cartesian(f64::INFINITY, f64::NAN, 0.5, f64::NAN);
    let out = outputs(&d);
    assert!(out.iter().all(|x| x.is_finite()));
    assert_eq!([0.5, 0.5, 0.5, 0.5], out);

    d.set_max_output(f64::NAN);
    d.drive_cartesian(0.0, 1.0, 0.0, 0.0);
    assert_eq!([1.0, 1.0, -1.0, -1.0], outputs(&d));
  }

  #[test]
  fn test_deadband_setting() {
    let mut d = drive();
    assert!(d.is_right_side_inverted());

    d.set_deadband(0.5);
    d.drive_cartesian(0.0, 0.4, 0.0, 0.0);
    assert_eq!([0.0, 0.0, 0.0, 0.0], outputs(&d).map(f64::abs));

    d.set_deadband(0.0);
    d.drive_cartesian(0.0, 0.4, 0.0, 0.0);
    assert_relative_eq!(0.4, outputs(&d)[0]);
  }

  #[test]
  fn test_deadband_and_max_output() {
    assert_eq!(0.0, apply_deadband(0.01, 0.02));
    assert_relative_eq!(1.0, apply_deadband(1.0, 0.02));
    assert_relative_eq!(-0.5, apply_deadband(-0.51, 0.02));

    let mut d = drive();
    d.set_max_output(0.5);
    d.drive_polar(1.0, 0.0, 0.0);
    assert_eq!([0.5, 0.5, -0.5, -0.5], outputs(&d));

    d.stop_motor();
    let (fl, ..) = d.eject();
    assert_eq!(Some(0.0), fl.value);
    assert_eq!(2, fl.writes);
  }
}
