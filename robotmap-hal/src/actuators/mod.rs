pub mod solenoid;
pub mod talon;

use self::solenoid::DoubleSolenoidValue;

pub trait Actuator<U> {
  fn set_actuator_value(&mut self, value: U);
}

impl<'a, T: Actuator<U>, U> Actuator<U> for &'a mut T {
  fn set_actuator_value(&mut self, value: U) {
    (**self).set_actuator_value(value)
  }
}

macro_rules! actuator_alias {
  ($ident:ident, $unit:ty, $setter_name:ident) => {
    pub trait $ident : Actuator<$unit> {
      fn $setter_name(&mut self, value: $unit) { self.set_actuator_value(value) }
    }
    impl<T: Actuator<$unit>> $ident for T {}
  }
}

// Speed controllers take a percentage of bus voltage in [-1, 1]
actuator_alias!(SpeedController, f64, set_speed);
actuator_alias!(PneumaticActuator, DoubleSolenoidValue, set_position);

#[cfg(test)]
pub mod test_util {
  use super::Actuator;

  /// Records the last value it was given.
  #[derive(Debug, Clone, Default)]
  pub struct RecordingActuator<U> {
    pub value: Option<U>,
    pub writes: usize,
  }

  impl<U> Actuator<U> for RecordingActuator<U> {
    fn set_actuator_value(&mut self, value: U) {
      self.value = Some(value);
      self.writes += 1;
    }
  }
}
