use super::source::SubscriberSource;
use crate::error::{CoreError, Result};
use crate::types::{Imsi, SubscriberRecord};
use log::info;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SubscriberDirectory {
    subscribers: HashMap<Imsi, SubscriberRecord>,
}

impl SubscriberDirectory {
    pub fn load(source: &dyn SubscriberSource) -> anyhow::Result<Self> {
        let records = source.load_all()?;
        let mut subscribers = HashMap::with_capacity(records.len());
        for record in records {
            let imsi = record.imsi.clone();
            if record.max_aggregate_bit_rate == 0 {
                anyhow::bail!("subscriber {} has a zero max_data_rate", imsi);
            }
            if subscribers.insert(imsi.clone(), record).is_some() {
                anyhow::bail!("duplicate subscriber record for IMSI {}", imsi);
            }
        }
        info!("UDM loaded {} subscribers", subscribers.len());
        Ok(Self { subscribers })
    }

    pub fn lookup(&self, imsi: &Imsi) -> Result<&SubscriberRecord> {
        self.subscribers
            .get(imsi)
            .ok_or_else(|| CoreError::SubscriberNotFound(imsi.clone()))
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
