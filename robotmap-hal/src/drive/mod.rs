pub mod mecanum;

pub use mecanum::MecanumDrive;
