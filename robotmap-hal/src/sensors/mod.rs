use std::ops::Neg;

use crate::traits::Wrapper;

/// Something that can be read. `None` means there is no reading right now, e.g. the
/// controller it comes from has been unplugged.
pub trait Sensor<U> {
  fn get_sensor_value(&self) -> Option<U>;
}

impl<'a, T: Sensor<U>, U> Sensor<U> for &'a T {
  fn get_sensor_value(&self) -> Option<U> {
    (**self).get_sensor_value()
  }
}

macro_rules! sensor_alias {
  ($ident:ident, $unit:ty, $fn_name:ident) => {
    pub trait $ident : Sensor<$unit> {
      fn $fn_name(&self) -> Option<$unit> { self.get_sensor_value() }
    }
    impl<T: Sensor<$unit>> $ident for T {}
  }
}

sensor_alias!(BinarySensor, bool, get_state);
// Stick and trigger axes, in [-1, 1]
sensor_alias!(AnalogSensor, f64, get_value);
// POV hats, in degrees clockwise from up. -1 when released.
sensor_alias!(DirectionalSensor, isize, get_direction);

/// Flips the sign of a reading. Stick Y axes read negative when pushed forward.
#[derive(Debug, Clone)]
pub struct Inverted<T>(pub T);

impl<T> Wrapper<T> for Inverted<T> {
  fn eject(self) -> T { self.0 }
}

impl<U: Neg<Output = U>, T: Sensor<U>> Sensor<U> for Inverted<T> {
  fn get_sensor_value(&self) -> Option<U> {
    self.0.get_sensor_value().map(|x| -x)
  }
}
