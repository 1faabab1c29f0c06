use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Imsi(pub String);

impl Imsi {
    pub fn new(value: impl Into<String>) -> Self {
        Imsi(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Imsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Imsi {
    fn from(value: &str) -> Self {
        Imsi(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gNodeB-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_id_display() {
        assert_eq!(CellId(2).to_string(), "gNodeB-2");
    }

    #[test]
    fn test_imsi_serializes_as_plain_string() {
        let json = serde_json::to_string(&Imsi::from("001010000000001")).unwrap();
        assert_eq!(json, "\"001010000000001\"");
    }

    #[test]
    fn test_cell_ids_order_numerically() {
        let mut ids = vec![CellId(10), CellId(2), CellId(7)];
        ids.sort();
        assert_eq!(ids, vec![CellId(2), CellId(7), CellId(10)]);
    }
}
