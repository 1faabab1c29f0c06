pub mod amf;
pub mod api;
pub mod config;
pub mod error;
pub mod network;
pub mod ran;
pub mod scenario;
pub mod smf;
pub mod types;
pub mod udm;

pub use error::{CoreError, ErrorKind, Result};
pub use network::Network;
