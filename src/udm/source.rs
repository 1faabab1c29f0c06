use crate::types::SubscriberRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub trait SubscriberSource {
    fn load_all(&self) -> Result<Vec<SubscriberRecord>>;
}

impl SubscriberSource for Vec<SubscriberRecord> {
    fn load_all(&self) -> Result<Vec<SubscriberRecord>> {
        Ok(self.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SubscriberFile {
    subscribers: Vec<SubscriberRecord>,
}

#[derive(Debug, Clone)]
pub struct JsonSubscriberFile {
    path: PathBuf,
}

impl JsonSubscriberFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SubscriberSource for JsonSubscriberFile {
    fn load_all(&self) -> Result<Vec<SubscriberRecord>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to open subscribers file {}", self.path.display()))?;
        let file: SubscriberFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse subscribers JSON {}", self.path.display()))?;
        Ok(file.subscribers)
    }
}
