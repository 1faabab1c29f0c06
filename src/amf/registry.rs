use crate::error::{CoreError, Result};
use crate::ran::Registrar;
use crate::types::{CellId, Device, Imsi};
use crate::udm::SubscriberDirectory;
use log::debug;
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::time::SystemTime;

pub(crate) type RegistryMap = HashMap<Imsi, RegistryEntry>;

#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub imsi: Imsi,
    pub cell: CellId,
    pub last_update: SystemTime,
}

/// The registry lock is taken on first use and held until drop, so a
/// handover's detach and attach are one registry update.
pub struct Registration<'a> {
    directory: &'a SubscriberDirectory,
    registry: &'a Mutex<RegistryMap>,
    entries: Option<MutexGuard<'a, RegistryMap>>,
}

impl<'a> Registration<'a> {
    pub(crate) fn new(directory: &'a SubscriberDirectory, registry: &'a Mutex<RegistryMap>) -> Self {
        Self {
            directory,
            registry,
            entries: None,
        }
    }

    fn entries(&mut self) -> &mut RegistryMap {
        let registry = self.registry;
        let guard = self.entries.get_or_insert_with(|| registry.lock());
        &mut **guard
    }
}

impl Registrar for Registration<'_> {
    fn register(&mut self, device: &mut Device, cell: CellId) -> Result<()> {
        let subscriber = self.directory.lookup(&device.imsi)?;
        if !subscriber.is_active() {
            return Err(CoreError::SubscriptionInactive {
                imsi: device.imsi.clone(),
                status: subscriber.status,
            });
        }

        let entry = RegistryEntry {
            imsi: device.imsi.clone(),
            cell,
            last_update: SystemTime::now(),
        };
        self.entries().insert(device.imsi.clone(), entry);
        device.serving_cell = Some(cell);

        debug!("AMF registered UE {} on {}", device.imsi, cell);
        Ok(())
    }

    fn deregister(&mut self, device: &mut Device, cell: CellId) {
        let entries = self.entries();
        let registered_here = entries.get(&device.imsi).map(|e| e.cell) == Some(cell);
        if registered_here {
            entries.remove(&device.imsi);
            debug!("AMF deregistered UE {} from {}", device.imsi, cell);
        }
        device.serving_cell = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, SubscriberRecord, SubscriptionStatus};

    fn directory() -> SubscriberDirectory {
        SubscriberDirectory::load(&vec![
            SubscriberRecord::new(Imsi::from("001"), SubscriptionStatus::Active, 100),
            SubscriberRecord::new(Imsi::from("002"), SubscriptionStatus::Suspended, 100),
        ])
        .unwrap()
    }

    #[test]
    fn test_register_active_subscriber() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());
        let mut device = Device::new(Imsi::from("001"), Position::default());

        Registration::new(&directory, &registry)
            .register(&mut device, CellId(3))
            .unwrap();

        assert_eq!(device.serving_cell, Some(CellId(3)));
        assert_eq!(registry.lock()[&Imsi::from("001")].cell, CellId(3));
    }

    #[test]
    fn test_register_suspended_subscriber() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());
        let mut device = Device::new(Imsi::from("002"), Position::default());

        let err = Registration::new(&directory, &registry)
            .register(&mut device, CellId(1))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::SubscriptionInactive {
                imsi: Imsi::from("002"),
                status: SubscriptionStatus::Suspended,
            }
        );
        assert!(registry.lock().is_empty());
        assert_eq!(device.serving_cell, None);
    }

    #[test]
    fn test_register_unknown_subscriber() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());
        let mut device = Device::new(Imsi::from("404"), Position::default());

        let err = Registration::new(&directory, &registry)
            .register(&mut device, CellId(1))
            .unwrap_err();
        assert_eq!(err, CoreError::SubscriberNotFound(Imsi::from("404")));
    }

    #[test]
    fn test_register_overwrites_previous_cell() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());
        let mut device = Device::new(Imsi::from("001"), Position::default());

        let mut registration = Registration::new(&directory, &registry);
        registration.register(&mut device, CellId(1)).unwrap();
        registration.register(&mut device, CellId(2)).unwrap();
        drop(registration);

        let entries = registry.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[&Imsi::from("001")].cell, CellId(2));
    }

    #[test]
    fn test_deregister_ignores_other_cell() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());
        let mut device = Device::new(Imsi::from("001"), Position::default());

        let mut registration = Registration::new(&directory, &registry);
        registration.register(&mut device, CellId(2)).unwrap();
        registration.deregister(&mut device, CellId(1));
        drop(registration);

        assert!(registry.lock().contains_key(&Imsi::from("001")));
    }

    #[test]
    fn test_lock_is_taken_lazily() {
        let directory = directory();
        let registry = Mutex::new(RegistryMap::new());

        let _registration = Registration::new(&directory, &registry);
        assert!(registry.try_lock().is_some());
    }
}
