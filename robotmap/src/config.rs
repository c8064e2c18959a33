use std::{fs, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{error::{RobotMapError, RobotMapResult}, wiring::Wiring};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidGains {
  pub p: f64,
  pub i: f64,
  pub d: f64,
}

impl PidGains {
  pub const fn new(p: f64, i: f64, d: f64) -> Self {
    Self { p, i, d }
  }

  /// All-zero gains are what an untuned mechanism ships with. A loop running them does nothing.
  pub fn is_placeholder(&self) -> bool {
    self.p == 0.0 && self.i == 0.0 && self.d == 0.0
  }

  fn validate(&self, subsystem: &'static str) -> RobotMapResult<()> {
    for (name, value) in [("p", self.p), ("i", self.i), ("d", self.d)] {
      if !value.is_finite() {
        return Err(RobotMapError::InvalidGains { subsystem, reason: format!("k{} is {}", name, value) });
      }
    }
    Ok(())
  }
}

/// Closed-loop gains for every mechanism that has them. There are deliberately no defaults:
/// these have to come from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Gains {
  pub first_arm_segment: PidGains,
  pub second_arm_segment: PidGains,
  pub wrist: PidGains,
  pub gimbal: PidGains,
}

impl Gains {
  pub fn iter(&self) -> impl Iterator<Item = (&'static str, PidGains)> {
    [
      ("first_arm_segment", self.first_arm_segment),
      ("second_arm_segment", self.second_arm_segment),
      ("wrist", self.wrist),
      ("gimbal", self.gimbal),
    ].into_iter()
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RobotConfig {
  #[serde(default)]
  pub wiring: Wiring,
  pub gains: Gains,
}

impl RobotConfig {
  /// Config with the stock wiring table.
  pub fn new(gains: Gains) -> Self {
    Self { wiring: Wiring::default(), gains }
  }

  pub fn load<P: AsRef<Path>>(path: P) -> RobotMapResult<Self> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
      .map_err(|source| RobotMapError::ConfigIo { path: path.to_path_buf(), source })?;

    let config = Self::from_toml_str(&content)?;
    info!("Loaded robot config from {}", path.display());
    Ok(config)
  }

  pub fn from_toml_str(content: &str) -> RobotMapResult<Self> {
    let config: Self = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> RobotMapResult<()> {
    self.wiring.validate()?;

    for (subsystem, gains) in self.gains.iter() {
      gains.validate(subsystem)?;
      if gains.is_placeholder() {
        warn!("{} gains are all zero. Closed-loop control of it is untuned.", subsystem);
      }
    }

    Ok(())
  }
}
