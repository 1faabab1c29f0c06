pub mod registry;
pub mod mobility_manager;

pub use registry::{Registration, RegistryEntry};
pub use mobility_manager::{MobilityManager, Movement};
