use crate::types::{CellId, Imsi};
use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub trait AllowListSource {
    fn load_allow_list(&self, cell: CellId) -> Result<HashSet<Imsi>>;
}

impl AllowListSource for HashSet<Imsi> {
    fn load_allow_list(&self, _cell: CellId) -> Result<HashSet<Imsi>> {
        Ok(self.clone())
    }
}

impl AllowListSource for HashMap<CellId, HashSet<Imsi>> {
    fn load_allow_list(&self, cell: CellId) -> Result<HashSet<Imsi>> {
        Ok(self.get(&cell).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Clone)]
pub struct AllowListFile {
    path: PathBuf,
}

impl AllowListFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AllowListSource for AllowListFile {
    fn load_allow_list(&self, cell: CellId) -> Result<HashSet<Imsi>> {
        let content = fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to open allowed IMSIs file {} for {}", self.path.display(), cell)
        })?;
        Ok(parse_allow_list(&content))
    }
}

fn parse_allow_list(content: &str) -> HashSet<Imsi> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Imsi::from)
        .collect()
}
