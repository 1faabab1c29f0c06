use super::allow_list::AllowListSource;
use crate::error::{CoreError, Result};
use crate::types::{AttachmentState, CellId, Device, Imsi, Position};
use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

pub trait Registrar {
    fn register(&mut self, device: &mut Device, cell: CellId) -> Result<()>;
    fn deregister(&mut self, device: &mut Device, cell: CellId);
}

#[derive(Debug)]
pub struct Cell {
    id: CellId,
    position: Position,
    range: f64,
    capacity: usize,
    allow_list: HashSet<Imsi>,
    connected: Mutex<BTreeSet<Imsi>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub id: CellId,
    pub x: f64,
    pub y: f64,
    pub range: f64,
    pub connected_ues: usize,
    pub max_cap: usize,
}

impl Cell {
    pub fn new(
        id: CellId,
        position: Position,
        range: f64,
        capacity: usize,
        allow_list: HashSet<Imsi>,
    ) -> Self {
        Self {
            id,
            position,
            range,
            capacity,
            allow_list,
            connected: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn from_source(
        id: CellId,
        position: Position,
        range: f64,
        capacity: usize,
        source: &dyn AllowListSource,
    ) -> anyhow::Result<Self> {
        let allow_list = source.load_allow_list(id)?;
        debug!("{} loaded {} allowed IMSIs", id, allow_list.len());
        Ok(Self::new(id, position, range, capacity, allow_list))
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_allowed(&self, imsi: &Imsi) -> bool {
        self.allow_list.contains(imsi)
    }

    pub fn distance_to(&self, position: &Position) -> f64 {
        self.position.distance_to(position)
    }

    pub fn covers(&self, position: &Position) -> bool {
        self.distance_to(position) <= self.range
    }

    /// Takes the membership lock. Callers locking more than one cell must
    /// do so in ascending `CellId` order.
    pub fn lock(&self) -> CellLock<'_> {
        CellLock {
            cell: self,
            connected: self.connected.lock(),
        }
    }

    pub fn attach<R: Registrar + ?Sized>(&self, device: &mut Device, registrar: &mut R) -> Result<()> {
        self.lock().attach(device, registrar)
    }

    pub fn detach<R: Registrar + ?Sized>(&self, device: &mut Device, registrar: &mut R) -> Result<()> {
        self.lock().detach(device, registrar)
    }

    pub fn contains(&self, imsi: &Imsi) -> bool {
        self.connected.lock().contains(imsi)
    }

    pub fn connected_count(&self) -> usize {
        self.connected.lock().len()
    }

    pub fn connected_ues(&self) -> Vec<Imsi> {
        self.connected.lock().iter().cloned().collect()
    }

    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            id: self.id,
            x: self.position.x,
            y: self.position.y,
            range: self.range,
            connected_ues: self.connected_count(),
            max_cap: self.capacity,
        }
    }
}

pub struct CellLock<'a> {
    cell: &'a Cell,
    connected: MutexGuard<'a, BTreeSet<Imsi>>,
}

impl CellLock<'_> {
    pub fn cell(&self) -> &Cell {
        self.cell
    }

    pub fn contains(&self, imsi: &Imsi) -> bool {
        self.connected.contains(imsi)
    }

    pub fn connected(&self) -> impl Iterator<Item = &Imsi> {
        self.connected.iter()
    }

    pub fn attach<R: Registrar + ?Sized>(&mut self, device: &mut Device, registrar: &mut R) -> Result<()> {
        let cell = self.cell;

        if device.is_attached() {
            return Err(CoreError::AlreadyAttached {
                imsi: device.imsi.clone(),
                cell: device.serving_cell.unwrap_or(cell.id),
            });
        }
        if self.connected.len() >= cell.capacity {
            return Err(CoreError::CapacityExceeded {
                cell: cell.id,
                capacity: cell.capacity,
            });
        }
        if !cell.is_allowed(&device.imsi) {
            return Err(CoreError::NotAllowed {
                imsi: device.imsi.clone(),
                cell: cell.id,
            });
        }

        device.state = AttachmentState::Attached;
        self.connected.insert(device.imsi.clone());

        if let Err(e) = registrar.register(device, cell.id) {
            self.connected.remove(&device.imsi);
            device.state = AttachmentState::Detached;
            info!("Rolled back radio connection of {} to {}: {}", device.imsi, cell.id, e);
            return Err(e);
        }

        debug!(
            "UE {} connected to {} ({}/{})",
            device.imsi,
            cell.id,
            self.connected.len(),
            cell.capacity
        );
        Ok(())
    }

    pub fn detach<R: Registrar + ?Sized>(&mut self, device: &mut Device, registrar: &mut R) -> Result<()> {
        let cell = self.cell;

        if !self.connected.remove(&device.imsi) {
            return Err(CoreError::NotAttached(device.imsi.clone()));
        }
        device.state = AttachmentState::Detached;
        registrar.deregister(device, cell.id);

        debug!("UE {} disconnected from {}", device.imsi, cell.id);
        Ok(())
    }
}
