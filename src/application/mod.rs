//! Application layer
//!
//! Orchestrates use cases and coordinates domain objects.

pub mod accounts;
pub mod complaints;
pub mod dto;

pub use accounts::AccountService;
pub use complaints::{ComplaintListing, ComplaintStore};
pub use dto::*;

use crate::domain::DomainEvent;
use crate::ports::EventPublisher;

/// Publish events raised by a committed change.
///
/// The change is already stored, so a publisher failure is logged and
/// otherwise ignored.
async fn publish_committed(publisher: &dyn EventPublisher, events: Vec<DomainEvent>) {
    if events.is_empty() {
        return;
    }
    if let Err(e) = publisher.publish(events).await {
        tracing::warn!(error = %e, "failed to publish domain events");
    }
}
