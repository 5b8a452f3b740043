//! Actor and Account
//!
//! An [`Actor`] is the authenticated identity a request runs as. It is a closed
//! variant: only a department administrator carries a department, so an
//! "admin without a department" cannot be represented.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::credentials::PasswordHash;
use crate::domain::value_objects::{ActorId, Department, Email};

/// Authenticated identity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Actor {
    Citizen { id: ActorId },
    DepartmentAdmin { id: ActorId, department: Department },
    SuperAdmin { id: ActorId },
}

impl Actor {
    pub fn id(&self) -> ActorId {
        match self {
            Self::Citizen { id } | Self::DepartmentAdmin { id, .. } | Self::SuperAdmin { id } => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Citizen { .. } => Role::Citizen,
            Self::DepartmentAdmin { .. } => Role::DepartmentAdmin,
            Self::SuperAdmin { .. } => Role::SuperAdmin,
        }
    }

    pub fn department(&self) -> Option<Department> {
        match self {
            Self::DepartmentAdmin { department, .. } => Some(*department),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        !matches!(self, Self::Citizen { .. })
    }

    /// Rebuild an actor from its flattened parts (token claims, storage rows).
    pub fn from_parts(id: ActorId, role: Role, department: Option<Department>) -> Option<Self> {
        match (role, department) {
            (Role::Citizen, None) => Some(Self::Citizen { id }),
            (Role::DepartmentAdmin, Some(department)) => Some(Self::DepartmentAdmin { id, department }),
            (Role::SuperAdmin, None) => Some(Self::SuperAdmin { id }),
            _ => None,
        }
    }
}

/// Role discriminant of an [`Actor`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    DepartmentAdmin,
    SuperAdmin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Citizen => write!(f, "citizen"),
            Self::DepartmentAdmin => write!(f, "department_admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

/// Stored account record backing an [`Actor`]
#[derive(Clone, Debug)]
pub struct Account {
    actor: Actor,
    name: String,
    email: Email,
    phone: String,
    password: PasswordHash,
    created_at: DateTime<Utc>,
}

impl Account {
    pub fn create(
        actor: Actor,
        name: impl Into<String>,
        email: Email,
        phone: impl Into<String>,
        password: PasswordHash,
    ) -> Self {
        Self {
            actor,
            name: name.into(),
            email,
            phone: phone.into(),
            password,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ActorId { self.actor.id() }
    pub fn actor(&self) -> &Actor { &self.actor }
    pub fn name(&self) -> &str { &self.name }
    pub fn email(&self) -> &Email { &self.email }
    pub fn phone(&self) -> &str { &self.phone }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password.verify(password)
    }
}
