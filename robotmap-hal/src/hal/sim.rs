use std::{collections::{HashMap, HashSet}, sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard}};

use circular_buffer::CircularBuffer;
use log::debug;

use super::{CanId, Hal, HalError, HalHandle, HalResult, JoystickPort, JoystickState, MotorDemand, Resource};

/// Everything the simulated hardware layer has been asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HalEvent {
  Claimed(Resource),
  Released(Resource),
  MotorDemand(CanId, MotorDemand),
  Solenoid(Resource, bool),
}

#[derive(Debug, Clone)]
struct Claim {
  resource: Resource,
  demand: MotorDemand,
  solenoid: bool,
}

/// How many events the simulated layer remembers. Older events are dropped first, so a
/// long-running control loop doesn't grow the log without bound.
pub const EVENT_LOG_CAPACITY: usize = 1024;

#[derive(Debug)]
struct SimState {
  next_handle: u32,
  claims: HashMap<HalHandle, Claim>,
  unavailable: HashSet<Resource>,
  joysticks: HashMap<JoystickPort, JoystickState>,
  events: CircularBuffer<EVENT_LOG_CAPACITY, HalEvent>,
}

impl Default for SimState {
  fn default() -> Self {
    Self {
      next_handle: 0,
      claims: HashMap::new(),
      unavailable: HashSet::new(),
      joysticks: HashMap::new(),
      events: CircularBuffer::new(),
    }
  }
}

impl SimState {
  fn claim_for(&self, handle: HalHandle) -> HalResult<&Claim> {
    self.claims.get(&handle).ok_or(HalError::InvalidHandle(handle))
  }

  fn motor_claim_mut(&mut self, handle: HalHandle) -> HalResult<&mut Claim> {
    match self.claims.get_mut(&handle) {
      Some(claim) if matches!(claim.resource, Resource::CanDevice(_)) => Ok(claim),
      _ => Err(HalError::InvalidHandle(handle)),
    }
  }

  fn demand_of(&self, id: CanId) -> Option<MotorDemand> {
    self.claims.values().find(|c| c.resource == Resource::CanDevice(id)).map(|c| c.demand)
  }

  fn resolve_output(&self, mut demand: MotorDemand) -> f64 {
    let mut visited = HashSet::new();
    loop {
      match demand {
        MotorDemand::Neutral => return 0.0,
        MotorDemand::PercentOutput(v) => return v,
        MotorDemand::Follower(leader) => {
          if !visited.insert(leader) {
            // Follow loop, nothing is actually driving the chain
            return 0.0;
          }
          match self.demand_of(leader) {
            Some(d) => demand = d,
            None => return 0.0,
          }
        }
      }
    }
  }
}

/// An in-memory hardware layer. Devices are present unless marked unavailable, and the
/// most recent claims, releases and demands are recorded so tests can inspect what was sent.
#[derive(Debug, Default)]
pub struct SimulatedHal {
  state: RwLock<SimState>,
}

impl SimulatedHal {
  pub fn new() -> Self {
    Self::default()
  }

  fn read(&self) -> RwLockReadGuard<'_, SimState> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, SimState> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Pretend nothing is wired at `resource`. Claims of it fail with [HalError::DeviceNotFound].
  pub fn mark_unavailable(&self, resource: Resource) {
    self.write().unavailable.insert(resource);
  }

  pub fn mark_available(&self, resource: Resource) {
    self.write().unavailable.remove(&resource);
  }

  pub fn set_joystick(&self, port: JoystickPort, state: JoystickState) {
    self.write().joysticks.insert(port, state);
  }

  pub fn disconnect_joystick(&self, port: JoystickPort) {
    self.write().joysticks.remove(&port);
  }

  pub fn is_claimed(&self, resource: Resource) -> bool {
    self.read().claims.values().any(|c| c.resource == resource)
  }

  pub fn claimed(&self) -> Vec<Resource> {
    let mut claimed: Vec<Resource> = self.read().claims.values().map(|c| c.resource).collect();
    claimed.sort_by_key(|r| r.to_string());
    claimed
  }

  pub fn claim_count(&self) -> usize {
    self.read().claims.len()
  }

  /// Current demand on a CAN device, if it is claimed.
  pub fn motor_demand(&self, id: CanId) -> Option<MotorDemand> {
    self.read().demand_of(id)
  }

  /// Applied output of a CAN device, following leaders where needed.
  pub fn applied_output(&self, id: CanId) -> Option<f64> {
    let state = self.read();
    state.demand_of(id).map(|d| state.resolve_output(d))
  }

  /// All (follower, leader) pairs currently configured.
  pub fn follower_bindings(&self) -> Vec<(CanId, CanId)> {
    let mut bindings: Vec<(CanId, CanId)> = self.read().claims.values().filter_map(|c| match (c.resource, c.demand) {
      (Resource::CanDevice(id), MotorDemand::Follower(leader)) => Some((id, leader)),
      _ => None,
    }).collect();
    bindings.sort();
    bindings
  }

  /// Recorded events, oldest first.
  pub fn events(&self) -> Vec<HalEvent> {
    self.read().events.iter().cloned().collect()
  }

  pub fn clear_events(&self) {
    self.write().events.clear();
  }
}

impl Hal for SimulatedHal {
  fn claim(&self, resource: Resource) -> HalResult<HalHandle> {
    let mut state = self.write();
    if state.unavailable.contains(&resource) {
      return Err(HalError::DeviceNotFound(resource));
    }
    if state.claims.values().any(|c| c.resource == resource) {
      return Err(HalError::HardwareConflict(resource));
    }

    let handle = HalHandle::from_raw(state.next_handle);
    state.next_handle += 1;
    state.claims.insert(handle, Claim { resource, demand: MotorDemand::Neutral, solenoid: false });
    state.events.push_back(HalEvent::Claimed(resource));
    debug!("[sim] claimed {} as {:?}", resource, handle);
    Ok(handle)
  }

  fn release(&self, handle: HalHandle) {
    let mut state = self.write();
    if let Some(claim) = state.claims.remove(&handle) {
      state.events.push_back(HalEvent::Released(claim.resource));
      debug!("[sim] released {}", claim.resource);
    }
  }

  fn set_motor_demand(&self, handle: HalHandle, demand: MotorDemand) -> HalResult<()> {
    let mut state = self.write();
    let claim = state.motor_claim_mut(handle)?;
    claim.demand = demand;
    let resource = claim.resource;
    if let Resource::CanDevice(id) = resource {
      state.events.push_back(HalEvent::MotorDemand(id, demand));
    }
    Ok(())
  }

  fn motor_output(&self, handle: HalHandle) -> HalResult<f64> {
    let state = self.read();
    match state.claim_for(handle)? {
      Claim { resource: Resource::CanDevice(_), demand, .. } => Ok(state.resolve_output(*demand)),
      _ => Err(HalError::InvalidHandle(handle)),
    }
  }

  fn set_solenoid(&self, handle: HalHandle, on: bool) -> HalResult<()> {
    let mut state = self.write();
    let resource = match state.claims.get_mut(&handle) {
      Some(claim) if matches!(claim.resource, Resource::SolenoidChannel { .. }) => {
        claim.solenoid = on;
        claim.resource
      },
      _ => return Err(HalError::InvalidHandle(handle)),
    };
    state.events.push_back(HalEvent::Solenoid(resource, on));
    Ok(())
  }

  fn solenoid(&self, handle: HalHandle) -> HalResult<bool> {
    match self.read().claim_for(handle)? {
      Claim { resource: Resource::SolenoidChannel { .. }, solenoid, .. } => Ok(*solenoid),
      _ => Err(HalError::InvalidHandle(handle)),
    }
  }

  fn joystick(&self, port: JoystickPort) -> Option<JoystickState> {
    self.read().joysticks.get(&port).cloned()
  }
}
