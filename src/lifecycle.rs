//! Complaint Lifecycle
//!
//! The status set and the transition table. Every status change a complaint
//! can ever undergo is one row of [`TRANSITIONS`]:
//!
//! ```text
//!   Pending ──admin──▶ InProgress ──admin──▶ Resolved
//!                          │
//!                          └──author──▶ UserResolved
//! ```
//!
//! `Resolved` and `UserResolved` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Complaint status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    /// Closed by an administrator
    Resolved,
    /// Closed by the citizen who filed it
    UserResolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::UserResolved,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::UserResolved)
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Resolved => write!(f, "Resolved"),
            Self::UserResolved => write!(f, "User Resolved"),
        }
    }
}

/// Who may fire a transition row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permitted {
    /// A department admin of the complaint's department, or a super admin
    Administrator,
    /// The citizen who filed the complaint
    Author,
}

/// Timestamp written when a row fires
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimestampEffect {
    Updated,
    Resolved,
}

/// One row of the transition table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: ComplaintStatus,
    pub to: ComplaintStatus,
    pub permitted: Permitted,
    pub effect: TimestampEffect,
}

pub const TRANSITIONS: [TransitionRule; 3] = [
    TransitionRule {
        from: ComplaintStatus::Pending,
        to: ComplaintStatus::InProgress,
        permitted: Permitted::Administrator,
        effect: TimestampEffect::Updated,
    },
    TransitionRule {
        from: ComplaintStatus::InProgress,
        to: ComplaintStatus::Resolved,
        permitted: Permitted::Administrator,
        effect: TimestampEffect::Resolved,
    },
    TransitionRule {
        from: ComplaintStatus::InProgress,
        to: ComplaintStatus::UserResolved,
        permitted: Permitted::Author,
        effect: TimestampEffect::Resolved,
    },
];

/// Why a requested status change cannot be applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionRejection {
    #[error("transition {from} -> {to} is not allowed")]
    Illegal {
        from: ComplaintStatus,
        to: ComplaintStatus,
    },
    #[error("complaint is {actual}, expected {expected}")]
    Stale {
        expected: ComplaintStatus,
        actual: ComplaintStatus,
    },
}

/// Transition table lookups
#[derive(Clone, Copy, Debug, Default)]
pub struct ComplaintLifecycle;

impl ComplaintLifecycle {
    pub fn new() -> Self {
        Self
    }

    /// The row leading into `to`. Every status has at most one incoming row.
    pub fn rule_into(&self, to: ComplaintStatus) -> Option<&'static TransitionRule> {
        TRANSITIONS.iter().find(|r| r.to == to)
    }

    pub fn rule(&self, from: ComplaintStatus, to: ComplaintStatus) -> Option<&'static TransitionRule> {
        TRANSITIONS.iter().find(|r| r.from == from && r.to == to)
    }

    pub fn targets_from(&self, from: ComplaintStatus) -> impl Iterator<Item = ComplaintStatus> {
        TRANSITIONS.iter().filter(move |r| r.from == from).map(|r| r.to)
    }

    /// Classify a requested move from `current` to `target`.
    ///
    /// When `current` was itself reached from the row's source status, some
    /// other actor moved the complaint first and the request is stale. That
    /// covers a repeat of the same move as well as a race between the two
    /// closing moves. Any other pair outside the table is illegal.
    pub fn check(
        &self,
        current: ComplaintStatus,
        target: ComplaintStatus,
    ) -> Result<&'static TransitionRule, TransitionRejection> {
        if let Some(rule) = self.rule(current, target) {
            return Ok(rule);
        }

        match self.rule_into(target) {
            Some(rule) if current == target || self.targets_from(rule.from).any(|s| s == current) => {
                Err(TransitionRejection::Stale {
                    expected: rule.from,
                    actual: current,
                })
            }
            _ => Err(TransitionRejection::Illegal { from: current, to: target }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplaintStatus::*;

    #[test]
    fn test_table_rows() {
        let lifecycle = ComplaintLifecycle::new();
        assert_eq!(lifecycle.check(Pending, InProgress).unwrap().permitted, Permitted::Administrator);
        assert_eq!(lifecycle.check(InProgress, Resolved).unwrap().effect, TimestampEffect::Resolved);
        assert_eq!(lifecycle.check(InProgress, UserResolved).unwrap().permitted, Permitted::Author);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        let lifecycle = ComplaintLifecycle::new();
        for terminal in [Resolved, UserResolved] {
            assert_eq!(lifecycle.targets_from(terminal).count(), 0);
            for target in [Pending, InProgress] {
                assert_eq!(
                    lifecycle.check(terminal, target).unwrap_err(),
                    TransitionRejection::Illegal { from: terminal, to: target }
                );
            }
        }
    }

    #[test]
    fn test_losing_a_race_to_close_is_stale() {
        let lifecycle = ComplaintLifecycle::new();
        for current in [Resolved, UserResolved] {
            for target in [Resolved, UserResolved] {
                assert_eq!(
                    lifecycle.check(current, target).unwrap_err(),
                    TransitionRejection::Stale { expected: InProgress, actual: current }
                );
            }
        }
    }

    #[test]
    fn test_pending_cannot_be_closed_directly() {
        let lifecycle = ComplaintLifecycle::new();
        assert_eq!(
            lifecycle.check(Pending, UserResolved),
            Err(TransitionRejection::Illegal { from: Pending, to: UserResolved })
        );
        assert_eq!(
            lifecycle.check(Pending, Resolved),
            Err(TransitionRejection::Illegal { from: Pending, to: Resolved })
        );
        assert!(lifecycle.rule_into(Pending).is_none());
    }

    #[test]
    fn test_repeat_of_applied_transition_is_stale() {
        let lifecycle = ComplaintLifecycle::new();
        assert_eq!(
            lifecycle.check(InProgress, InProgress),
            Err(TransitionRejection::Stale { expected: Pending, actual: InProgress })
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(InProgress.to_string(), "In Progress");
        assert_eq!(serde_json::to_string(&UserResolved).unwrap(), "\"user_resolved\"");
    }
}
