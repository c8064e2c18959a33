pub mod actuators;
pub mod drive;
pub mod hal;
pub mod input;
pub mod sensors;
pub mod start;
pub mod traits;

pub use hal::{CanId, Hal, HalError, HalHandle, HalResult, JoystickPort, PcmModule, Resource, SolenoidChannel};
