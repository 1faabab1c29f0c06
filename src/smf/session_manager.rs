use crate::error::{CoreError, Result};
use crate::types::{Imsi, Session, SessionId, SessionState, SessionType};
use crate::udm::SubscriberDirectory;
use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct SessionTable {
    sessions: HashMap<SessionId, Session>,
    next_session_id: u64,
}

impl SessionTable {
    fn allocated_bit_rate(&self, imsi: &Imsi) -> u32 {
        self.sessions
            .values()
            .filter(|s| s.is_active() && &s.imsi == imsi)
            .map(|s| s.qos.max_bit_rate)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub imsi: Imsi,
    pub session_type: SessionType,
    pub state: SessionState,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            imsi: session.imsi.clone(),
            session_type: session.session_type,
            state: session.state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionManager {
    directory: Arc<SubscriberDirectory>,
    table: Arc<Mutex<SessionTable>>,
}

impl SessionManager {
    pub fn new(directory: Arc<SubscriberDirectory>) -> Self {
        SessionManager {
            directory,
            table: Arc::new(Mutex::new(SessionTable {
                sessions: HashMap::new(),
                next_session_id: 1,
            })),
        }
    }

    pub fn establish(&self, imsi: &Imsi, session_type: SessionType) -> Result<Session> {
        let subscriber = self.directory.lookup(imsi)?;
        if !subscriber.is_active() {
            return Err(CoreError::SubscriptionInactive {
                imsi: imsi.clone(),
                status: subscriber.status,
            });
        }

        let requested = session_type.qos_profile().max_bit_rate;
        let limit = subscriber.max_aggregate_bit_rate;

        let mut table = self.table.lock();
        let current = table.allocated_bit_rate(imsi);
        if current.saturating_add(requested) > limit {
            debug!(
                "SMF rejected {} for {}: {} + {} > {} Mbps",
                session_type, imsi, current, requested, limit
            );
            return Err(CoreError::QuotaExceeded {
                current,
                requested,
                limit,
            });
        }

        let id = SessionId(table.next_session_id);
        table.next_session_id += 1;
        let session = Session::new(id, imsi.clone(), session_type);
        table.sessions.insert(id, session.clone());

        info!(
            "Session {} established for {}: {} ({} Mbps, {}ms latency)",
            id, imsi, session_type, session.qos.max_bit_rate, session.qos.latency_budget_ms
        );
        Ok(session)
    }

    pub fn terminate(&self, id: SessionId) -> Result<Session> {
        let mut table = self.table.lock();
        let mut session = table
            .sessions
            .remove(&id)
            .ok_or(CoreError::SessionNotFound(id))?;
        session.state = SessionState::Inactive;
        info!("Session {} for {} terminated", id, session.imsi);
        Ok(session)
    }

    pub fn get_session(&self, id: SessionId) -> Option<Session> {
        self.table.lock().sessions.get(&id).cloned()
    }

    pub fn has_session(&self, id: SessionId) -> bool {
        self.table.lock().sessions.contains_key(&id)
    }

    pub fn session_count(&self) -> usize {
        self.table.lock().sessions.len()
    }

    pub fn sessions_for(&self, imsi: &Imsi) -> Vec<Session> {
        let table = self.table.lock();
        let mut sessions: Vec<Session> = table
            .sessions
            .values()
            .filter(|s| &s.imsi == imsi)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.id);
        sessions
    }

    pub fn allocated_bit_rate(&self, imsi: &Imsi) -> u32 {
        self.table.lock().allocated_bit_rate(imsi)
    }

    pub fn snapshot(&self) -> Vec<SessionSnapshot> {
        let table = self.table.lock();
        let mut sessions: Vec<SessionSnapshot> =
            table.sessions.values().map(SessionSnapshot::from).collect();
        sessions.sort_by_key(|s| s.session_id);
        sessions
    }
}
