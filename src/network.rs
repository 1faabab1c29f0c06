use crate::amf::{MobilityManager, Movement};
use crate::config::Config;
use crate::error::{CoreError, Result};
use crate::ran::{AllowListFile, AllowListSource, Cell, CellSnapshot};
use crate::smf::{SessionManager, SessionSnapshot};
use crate::types::{AttachmentState, CellId, Device, Imsi, Position, Session, SessionId, SessionType};
use crate::udm::{JsonSubscriberFile, SubscriberDirectory, SubscriberSource};
use anyhow::Context;
use log::info;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub imsi: Imsi,
    pub x: f64,
    pub y: f64,
    pub serving_cell: Option<CellId>,
    pub state: AttachmentState,
}

impl From<&Device> for DeviceSnapshot {
    fn from(device: &Device) -> Self {
        Self {
            imsi: device.imsi.clone(),
            x: device.position.x,
            y: device.position.y,
            serving_cell: device.serving_cell,
            state: device.state,
        }
    }
}

pub struct Network {
    directory: Arc<SubscriberDirectory>,
    mobility: MobilityManager,
    sessions: SessionManager,
    devices: RwLock<BTreeMap<Imsi, Arc<Mutex<Device>>>>,
}

impl Network {
    pub fn new(directory: Arc<SubscriberDirectory>) -> Self {
        Self {
            mobility: MobilityManager::new(Arc::clone(&directory)),
            sessions: SessionManager::new(Arc::clone(&directory)),
            directory,
            devices: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn from_sources(subscribers: &dyn SubscriberSource) -> anyhow::Result<Self> {
        let directory = SubscriberDirectory::load(subscribers)?;
        Ok(Self::new(Arc::new(directory)))
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let network = Self::from_sources(&JsonSubscriberFile::new(&config.subscribers_file))?;
        let default_allow_list = AllowListFile::new(&config.allow_list_file);

        for cell in &config.cells {
            let position = Position::new(cell.x, cell.y);
            let id = match &cell.allow_list_file {
                Some(path) => network.add_cell(position, cell.range, cell.capacity, &AllowListFile::new(path)),
                None => network.add_cell(position, cell.range, cell.capacity, &default_allow_list),
            }
            .with_context(|| format!("Failed to initialise cell at ({}, {})", cell.x, cell.y))?;
            info!("{} initialized", id);
        }

        for device in &config.devices {
            network.add_device(Imsi::new(device.imsi.clone()), Position::new(device.x, device.y));
        }

        Ok(network)
    }

    pub fn directory(&self) -> &SubscriberDirectory {
        &self.directory
    }

    pub fn mobility(&self) -> &MobilityManager {
        &self.mobility
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn add_cell(
        &self,
        position: Position,
        range: f64,
        capacity: usize,
        allow_list: &dyn AllowListSource,
    ) -> anyhow::Result<CellId> {
        let id = self
            .mobility
            .allocate_cell_id()
            .context("no gNodeB ids left to allocate")?;
        let cell = Cell::from_source(id, position, range, capacity, allow_list)?;
        if !self.mobility.register_cell(Arc::new(cell)) {
            anyhow::bail!("{} already registered", id);
        }
        Ok(id)
    }

    pub fn add_device(&self, imsi: Imsi, position: Position) -> Device {
        let mut devices = self.devices.write();
        let handle = devices
            .entry(imsi.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Device::new(imsi, position))));
        let device = handle.lock().clone();
        device
    }

    pub fn device(&self, imsi: &Imsi) -> Option<Device> {
        self.devices.read().get(imsi).map(|handle| handle.lock().clone())
    }

    fn device_handle(&self, imsi: &Imsi) -> Result<Arc<Mutex<Device>>> {
        self.devices
            .read()
            .get(imsi)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound(imsi.clone()))
    }

    pub fn attach(&self, imsi: &Imsi, cell: CellId) -> Result<()> {
        let handle = self.device_handle(imsi)?;
        let mut device = handle.lock();
        self.mobility.attach(&mut device, cell)
    }

    pub fn detach(&self, imsi: &Imsi) -> Result<CellId> {
        let handle = self.device_handle(imsi)?;
        let mut device = handle.lock();
        self.mobility.detach(&mut device)
    }

    pub fn move_device(&self, imsi: &Imsi, position: Position) -> Result<Movement> {
        let handle = self.device_handle(imsi)?;
        let mut device = handle.lock();
        self.mobility.move_device(&mut device, position)
    }

    pub fn establish_session(&self, imsi: &Imsi, session_type: SessionType) -> Result<Session> {
        self.device_handle(imsi)?;
        self.sessions.establish(imsi, session_type)
    }

    pub fn terminate_session(&self, id: SessionId) -> Result<Session> {
        self.sessions.terminate(id)
    }

    pub fn cells(&self) -> Vec<CellSnapshot> {
        self.mobility.cells().iter().map(|cell| cell.snapshot()).collect()
    }

    pub fn devices(&self) -> Vec<DeviceSnapshot> {
        let handles: Vec<Arc<Mutex<Device>>> = self.devices.read().values().cloned().collect();
        handles
            .iter()
            .map(|handle| DeviceSnapshot::from(&*handle.lock()))
            .collect()
    }

    pub fn sessions(&self) -> Vec<SessionSnapshot> {
        self.sessions.snapshot()
    }
}
