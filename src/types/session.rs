use crate::types::identifiers::{Imsi, SessionId};
use crate::types::qos::{QosProfile, SessionType};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub imsi: Imsi,
    pub session_type: SessionType,
    pub qos: QosProfile,
    pub state: SessionState,
    pub established_at: SystemTime,
}

impl Session {
    pub fn new(id: SessionId, imsi: Imsi, session_type: SessionType) -> Self {
        Self {
            id,
            imsi,
            session_type,
            qos: session_type.qos_profile(),
            state: SessionState::Active,
            established_at: SystemTime::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_takes_profile_of_type() {
        let session = Session::new(SessionId(1), Imsi::from("001"), SessionType::VideoStream);
        assert!(session.is_active());
        assert_eq!(session.qos, SessionType::VideoStream.qos_profile());
    }
}
