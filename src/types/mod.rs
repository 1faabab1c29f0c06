pub mod identifiers;
pub mod position;
pub mod device;
pub mod subscriber;
pub mod qos;
pub mod session;

pub use identifiers::{CellId, Imsi, SessionId};
pub use position::Position;
pub use device::{AttachmentState, Device};
pub use subscriber::{SubscriberRecord, SubscriptionStatus};
pub use qos::{QosProfile, SessionType};
pub use session::{Session, SessionState};
