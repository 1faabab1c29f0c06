use crate::types::identifiers::Imsi;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Suspended,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Suspended => "suspended",
            SubscriptionStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberRecord {
    pub imsi: Imsi,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "subscription_status")]
    pub status: SubscriptionStatus,
    #[serde(rename = "max_data_rate")]
    pub max_aggregate_bit_rate: u32,
}

impl SubscriberRecord {
    pub fn new(imsi: Imsi, status: SubscriptionStatus, max_aggregate_bit_rate: u32) -> Self {
        Self {
            imsi,
            phone_number: None,
            status,
            max_aggregate_bit_rate,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
