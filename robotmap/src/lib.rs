pub mod config;
pub mod error;
pub mod registry;
pub mod subsystems;
pub mod wiring;

pub use config::{Gains, PidGains, RobotConfig};
pub use error::{RobotMapError, RobotMapResult};
pub use registry::{Registry, RobotMap};
