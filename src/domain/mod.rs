//! Domain module
//!
//! Actors, complaints and the value objects they are built from.

pub mod actor;
pub mod complaint;
pub mod credentials;
pub mod events;
pub mod value_objects;

pub use actor::{Account, Actor, Role};
pub use complaint::{Complaint, StatusChange};
pub use credentials::{HashingError, PasswordHash};
pub use events::{AccountEvent, ComplaintEvent, DomainEvent};
pub use value_objects::{ActorId, Department, Email, EmailError, TicketId};
