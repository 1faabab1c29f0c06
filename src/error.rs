use crate::types::{CellId, Imsi, SessionId, SubscriptionStatus};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("subscriber not found: {0}")]
    SubscriberNotFound(Imsi),

    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("{0} not found")]
    CellNotFound(CellId),

    #[error("UE {0} not found")]
    DeviceNotFound(Imsi),

    #[error("UE {0} is not currently connected")]
    NotAttached(Imsi),

    #[error("UE {imsi} is already connected to {cell}")]
    AlreadyAttached { imsi: Imsi, cell: CellId },

    #[error("{cell} is at capacity ({capacity} UEs)")]
    CapacityExceeded { cell: CellId, capacity: usize },

    #[error("UE {imsi} not allowed to connect to {cell}")]
    NotAllowed { imsi: Imsi, cell: CellId },

    #[error("subscription for {imsi} is {status}")]
    SubscriptionInactive { imsi: Imsi, status: SubscriptionStatus },

    #[error("bandwidth (current: {current} + new: {requested} Mbps) exceeds subscriber limit of {limit} Mbps")]
    QuotaExceeded { current: u32, requested: u32, limit: u32 },

    #[error("no gNodeB in range of UE {0}")]
    NoCellInRange(Imsi),

    #[error("handover of {imsi} from {from} to {to} aborted, UE is detached: {cause}")]
    HandoverAborted {
        imsi: Imsi,
        from: CellId,
        to: CellId,
        #[source]
        cause: Box<CoreError>,
    },

    #[error("internal inconsistency: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Rejection,
    Defect,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Inconsistent(_) => ErrorKind::Defect,
            CoreError::HandoverAborted { cause, .. } => cause.kind(),
            _ => ErrorKind::Rejection,
        }
    }

    pub fn is_defect(&self) -> bool {
        self.kind() == ErrorKind::Defect
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
