use super::registry::{Registration, RegistryEntry, RegistryMap};
use crate::error::{CoreError, Result};
use crate::ran::{Cell, CellLock, Registrar};
use crate::types::{CellId, Device, Imsi, Position};
use crate::udm::SubscriberDirectory;
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Unregistered,
    InRange(CellId),
    HandedOver { from: CellId, to: CellId },
}

/// Lock order: cells in ascending id, then the registry.
pub struct MobilityManager {
    directory: Arc<SubscriberDirectory>,
    cells: RwLock<BTreeMap<CellId, Arc<Cell>>>,
    registry: Mutex<RegistryMap>,
    next_cell_id: Mutex<Option<u32>>,
}

impl MobilityManager {
    pub fn new(directory: Arc<SubscriberDirectory>) -> Self {
        Self {
            directory,
            cells: RwLock::new(BTreeMap::new()),
            registry: Mutex::new(RegistryMap::new()),
            next_cell_id: Mutex::new(Some(1)),
        }
    }

    /// None once every id has been handed out.
    pub fn allocate_cell_id(&self) -> Option<CellId> {
        let mut next = self.next_cell_id.lock();
        let id = (*next)?;
        *next = id.checked_add(1);
        Some(CellId(id))
    }

    pub fn register_cell(&self, cell: Arc<Cell>) -> bool {
        let mut cells = self.cells.write();
        if cells.contains_key(&cell.id()) {
            return false;
        }
        info!(
            "AMF registered {} at ({:.0}, {:.0}) with {:.0}m range",
            cell.id(),
            cell.position().x,
            cell.position().y,
            cell.range()
        );
        cells.insert(cell.id(), cell);
        true
    }

    pub fn cell(&self, id: CellId) -> Option<Arc<Cell>> {
        self.cells.read().get(&id).cloned()
    }

    pub fn cells(&self) -> Vec<Arc<Cell>> {
        self.cells.read().values().cloned().collect()
    }

    pub fn registration(&self) -> Registration<'_> {
        Registration::new(&self.directory, &self.registry)
    }

    pub fn register(&self, device: &mut Device, cell: CellId) -> Result<()> {
        self.registration().register(device, cell)
    }

    pub fn registry_entry(&self, imsi: &Imsi) -> Option<RegistryEntry> {
        self.registry.lock().get(imsi).cloned()
    }

    pub fn registered_count(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn attach(&self, device: &mut Device, cell_id: CellId) -> Result<()> {
        let cell = self.cell(cell_id).ok_or(CoreError::CellNotFound(cell_id))?;
        let mut lock = cell.lock();
        let mut registration = self.registration();
        lock.attach(device, &mut registration)?;
        info!("UE {} attached to {}", device.imsi, cell_id);
        Ok(())
    }

    pub fn detach(&self, device: &mut Device) -> Result<CellId> {
        let cell_id = device
            .serving_cell
            .ok_or_else(|| CoreError::NotAttached(device.imsi.clone()))?;
        let cell = self.cell(cell_id).ok_or_else(|| {
            self.inconsistency(format!(
                "UE {} is served by unknown {}",
                device.imsi, cell_id
            ))
        })?;
        let mut lock = cell.lock();
        let mut registration = self.registration();
        lock.detach(device, &mut registration)?;
        info!("UE {} detached from {}", device.imsi, cell_id);
        Ok(cell_id)
    }

    pub fn move_device(&self, device: &mut Device, position: Position) -> Result<Movement> {
        device.position = position;

        let entry = match self.registry_entry(&device.imsi) {
            Some(entry) => entry,
            None => return Ok(Movement::Unregistered),
        };
        let serving = self.cell(entry.cell).ok_or_else(|| {
            self.inconsistency(format!(
                "UE {} registered to non-existent {}",
                device.imsi, entry.cell
            ))
        })?;

        let distance = serving.distance_to(&device.position);
        if distance <= serving.range() {
            debug!(
                "UE {} still within {} ({:.2}m <= {:.0}m)",
                device.imsi,
                serving.id(),
                distance,
                serving.range()
            );
            return Ok(Movement::InRange(serving.id()));
        }

        debug!(
            "UE {} left coverage of {} ({:.2}m > {:.0}m)",
            device.imsi,
            serving.id(),
            distance,
            serving.range()
        );
        self.handover(device, &serving)
    }

    /// Nearest cell whose own range covers `position`. Equidistant cells
    /// resolve to the lowest id.
    pub fn select_target(&self, position: &Position) -> Option<Arc<Cell>> {
        let cells = self.cells.read();
        let mut best: Option<(f64, &Arc<Cell>)> = None;
        for cell in cells.values() {
            let distance = cell.distance_to(position);
            if distance > cell.range() {
                continue;
            }
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, cell));
            }
        }
        best.map(|(_, cell)| Arc::clone(cell))
    }

    pub fn handover(&self, device: &mut Device, source: &Cell) -> Result<Movement> {
        let target = self
            .select_target(&device.position)
            .ok_or_else(|| CoreError::NoCellInRange(device.imsi.clone()))?;

        if target.id() == source.id() {
            return Ok(Movement::InRange(source.id()));
        }

        let (mut source_lock, mut target_lock) = lock_pair(source, &target);
        if !source_lock.contains(&device.imsi) {
            return Err(self.inconsistency(format!(
                "UE {} registered to {} but not connected to it",
                device.imsi,
                source.id()
            )));
        }

        let mut registration = self.registration();
        source_lock.detach(device, &mut registration)?;

        if let Err(cause) = target_lock.attach(device, &mut registration) {
            warn!(
                "Handover of UE {} from {} to {} failed, UE left detached: {}",
                device.imsi,
                source.id(),
                target.id(),
                cause
            );
            return Err(CoreError::HandoverAborted {
                imsi: device.imsi.clone(),
                from: source.id(),
                to: target.id(),
                cause: Box::new(cause),
            });
        }

        info!(
            "Handover of UE {} from {} to {} completed",
            device.imsi,
            source.id(),
            target.id()
        );
        Ok(Movement::HandedOver {
            from: source.id(),
            to: target.id(),
        })
    }

    pub fn verify_consistency(&self) -> Result<()> {
        let cells = self.cells();
        let locks: Vec<CellLock<'_>> = cells.iter().map(|cell| cell.lock()).collect();
        let registry = self.registry.lock();

        for entry in registry.values() {
            let lock = locks
                .iter()
                .find(|lock| lock.cell().id() == entry.cell)
                .ok_or_else(|| {
                    self.inconsistency(format!(
                        "UE {} registered to non-existent {}",
                        entry.imsi, entry.cell
                    ))
                })?;
            if !lock.contains(&entry.imsi) {
                return Err(self.inconsistency(format!(
                    "UE {} registered to {} but not connected to it",
                    entry.imsi, entry.cell
                )));
            }
        }

        for lock in &locks {
            for imsi in lock.connected() {
                let registered = registry.get(imsi).map(|e| e.cell);
                if registered != Some(lock.cell().id()) {
                    return Err(self.inconsistency(format!(
                        "UE {} connected to {} but registered to {:?}",
                        imsi,
                        lock.cell().id(),
                        registered
                    )));
                }
            }
        }

        Ok(())
    }

    fn inconsistency(&self, message: String) -> CoreError {
        error!("AMF inconsistency: {}", message);
        CoreError::Inconsistent(message)
    }
}

fn lock_pair<'a>(source: &'a Cell, target: &'a Cell) -> (CellLock<'a>, CellLock<'a>) {
    if source.id() < target.id() {
        let source_lock = source.lock();
        let target_lock = target.lock();
        (source_lock, target_lock)
    } else {
        let target_lock = target.lock();
        let source_lock = source.lock();
        (source_lock, target_lock)
    }
}
