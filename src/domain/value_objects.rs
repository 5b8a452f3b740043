//! Value Objects
//!
//! Immutable, validated domain primitives.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Ticket number, e.g. `RDS-20261016-9f3a61c2`.
///
/// The prefix names the routed department, the date is the filing day and the
/// suffix is 32 random bits, so numbers are readable but not guessable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    pub fn generate(department: Department, filed_at: DateTime<Utc>) -> Self {
        let suffix: u32 = rand::thread_rng().gen();
        Self(format!(
            "{}-{}-{:08x}",
            department.ticket_prefix(),
            filed_at.format("%Y%m%d"),
            suffix
        ))
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TicketId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Organizational unit a complaint is routed to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Water,
    Electricity,
    Roads,
    Waste,
    Healthcare,
    /// Nothing matched during classification; only super administrators see these.
    Unassigned,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Water,
        Department::Electricity,
        Department::Roads,
        Department::Waste,
        Department::Healthcare,
        Department::Unassigned,
    ];

    pub fn ticket_prefix(&self) -> &'static str {
        match self {
            Self::Water => "WAT",
            Self::Electricity => "ELC",
            Self::Roads => "RDS",
            Self::Waste => "WST",
            Self::Healthcare => "HLC",
            Self::Unassigned => "OTH",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Electricity => "electricity",
            Self::Roads => "roads",
            Self::Waste => "waste",
            Self::Healthcare => "healthcare",
            Self::Unassigned => "unassigned",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Water => "Water Supply",
            Self::Electricity => "Electricity",
            Self::Roads => "Roads",
            Self::Waste => "Waste Management",
            Self::Healthcare => "Healthcare",
            Self::Unassigned => "Unassigned",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Department {
    type Err = DepartmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == key || d.display_name().to_lowercase() == key)
            .ok_or_else(|| DepartmentParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown department: {0}")]
pub struct DepartmentParseError(pub String);

/// Email value object, stored trimmed and lower-cased
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, EmailError> {
        let value = value.into().trim().to_lowercase();

        if value.is_empty() {
            return Err(EmailError::Empty);
        }

        if !Self::is_valid_format(&value) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_format(email: &str) -> bool {
        let mut parts = email.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return false;
        };

        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailError {
    #[error("email is required")]
    Empty,
    #[error("email address is malformed")]
    InvalidFormat,
}
