//! Infrastructure adapters for the outbound ports

pub mod classifier;
pub mod events;
pub mod memory;

pub use classifier::KeywordClassifier;
pub use events::TracingEventPublisher;
pub use memory::{InMemoryActorRepository, InMemoryComplaintRepository};
