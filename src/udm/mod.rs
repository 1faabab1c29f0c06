pub mod directory;
pub mod source;

pub use directory::SubscriberDirectory;
pub use source::{JsonSubscriberFile, SubscriberSource};
