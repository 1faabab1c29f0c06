use crate::types::identifiers::{CellId, Imsi};
use crate::types::position::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentState {
    Detached,
    Attached,
    Idle,
}

impl Default for AttachmentState {
    fn default() -> Self {
        AttachmentState::Detached
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub imsi: Imsi,
    pub position: Position,
    pub state: AttachmentState,
    pub serving_cell: Option<CellId>,
}

impl Device {
    pub fn new(imsi: Imsi, position: Position) -> Self {
        Self {
            imsi,
            position,
            state: AttachmentState::Detached,
            serving_cell: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        !matches!(self.state, AttachmentState::Detached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_device_is_detached() {
        let device = Device::new(Imsi::from("001010000000001"), Position::new(1.0, 2.0));
        assert_eq!(device.state, AttachmentState::Detached);
        assert_eq!(device.serving_cell, None);
        assert!(!device.is_attached());
    }

    #[test]
    fn test_idle_counts_as_attached() {
        let mut device = Device::new(Imsi::from("001010000000001"), Position::default());
        device.state = AttachmentState::Idle;
        assert!(device.is_attached());
    }
}
