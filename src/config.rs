use crate::scenario::Step;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub subscribers_file: PathBuf,
    pub allow_list_file: PathBuf,
    #[serde(default = "default_api_address")]
    pub api_address: SocketAddr,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub cells: Vec<CellConfig>,
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    #[serde(default)]
    pub scenario: Vec<Step>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellConfig {
    pub x: f64,
    pub y: f64,
    pub range: f64,
    pub capacity: usize,
    #[serde(default)]
    pub allow_list_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub imsi: String,
    pub x: f64,
    pub y: f64,
}

fn default_api_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .context("Failed to read config file")?;
        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.subscribers_file.as_os_str().is_empty() {
            anyhow::bail!("subscribers_file cannot be empty");
        }
        if self.allow_list_file.as_os_str().is_empty() {
            anyhow::bail!("allow_list_file cannot be empty");
        }
        if self.cells.is_empty() {
            anyhow::bail!("at least one cell must be configured");
        }
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.range.is_nan() || cell.range <= 0.0 {
                anyhow::bail!("cell {} range must be positive, got {}", index + 1, cell.range);
            }
            if cell.capacity == 0 {
                anyhow::bail!("cell {} capacity must be at least 1", index + 1);
            }
        }
        let mut seen = HashSet::new();
        for device in &self.devices {
            if device.imsi.is_empty() {
                anyhow::bail!("device imsi cannot be empty");
            }
            if !seen.insert(device.imsi.as_str()) {
                anyhow::bail!("duplicate device imsi {}", device.imsi);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionType;

    const SAMPLE: &str = r#"
subscribers_file: configs/subscribers.json
allow_list_file: configs/allowed_imsis.txt
cells:
  - { x: 100, y: 100, range: 50, capacity: 3 }
  - { x: 200, y: 200, range: 50, capacity: 3, allow_list_file: configs/b.txt }
devices:
  - { imsi: "001010000000001", x: 110, y: 110 }
scenario:
  - { action: attach, imsi: "001010000000001", cell: 1 }
  - { action: establish, imsi: "001010000000001", session_type: VoiceCall }
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.api_address, default_api_address());
        assert_eq!(config.cells.len(), 2);
        assert_eq!(config.cells[1].allow_list_file, Some(PathBuf::from("configs/b.txt")));
        assert_eq!(config.devices[0].imsi, "001010000000001");
        assert_eq!(config.scenario.len(), 2);
        assert!(matches!(
            config.scenario[1],
            Step::Establish { session_type: SessionType::VoiceCall, .. }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.cells[0].capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_range() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.cells[0].range = 0.0;
        assert!(config.validate().is_err());
        config.cells[0].range = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_cells() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        config.cells.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_devices() {
        let mut config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        let duplicate = config.devices[0].clone();
        config.devices.push(duplicate);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let config = Config::from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/config.yaml")).unwrap();
        config.validate().unwrap();
        assert_eq!(config.cells.len(), 2);
        assert!(!config.scenario.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/nonexistent/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
