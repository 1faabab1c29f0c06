use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    VoiceCall,
    VideoStream,
    WebBrowsing,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::VoiceCall,
        SessionType::VideoStream,
        SessionType::WebBrowsing,
    ];

    pub fn qos_profile(self) -> QosProfile {
        match self {
            SessionType::VoiceCall => QosProfile {
                max_bit_rate: 1,
                latency_budget_ms: 10,
                priority: 1,
            },
            SessionType::VideoStream => QosProfile {
                max_bit_rate: 50,
                latency_budget_ms: 100,
                priority: 5,
            },
            SessionType::WebBrowsing => QosProfile {
                max_bit_rate: 25,
                latency_budget_ms: 300,
                priority: 10,
            },
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosProfile {
    pub max_bit_rate: u32,
    pub latency_budget_ms: u32,
    pub priority: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_call_profile() {
        let profile = SessionType::VoiceCall.qos_profile();
        assert_eq!(profile.max_bit_rate, 1);
        assert_eq!(profile.latency_budget_ms, 10);
        assert_eq!(profile.priority, 1);
    }

    #[test]
    fn test_video_stream_profile() {
        let profile = SessionType::VideoStream.qos_profile();
        assert_eq!(profile.max_bit_rate, 50);
        assert_eq!(profile.latency_budget_ms, 100);
        assert_eq!(profile.priority, 5);
    }

    #[test]
    fn test_web_browsing_profile() {
        let profile = SessionType::WebBrowsing.qos_profile();
        assert_eq!(profile.max_bit_rate, 25);
        assert_eq!(profile.latency_budget_ms, 300);
        assert_eq!(profile.priority, 10);
    }

    #[test]
    fn test_priority_follows_latency_budget() {
        let mut types = SessionType::ALL.to_vec();
        types.sort_by_key(|t| t.qos_profile().priority);
        let latencies: Vec<u32> = types.iter().map(|t| t.qos_profile().latency_budget_ms).collect();
        assert_eq!(latencies, vec![10, 100, 300]);
    }

    #[test]
    fn test_session_type_deserializes_from_variant_name() {
        let t: SessionType = serde_json::from_str("\"VideoStream\"").unwrap();
        assert_eq!(t, SessionType::VideoStream);
    }
}
