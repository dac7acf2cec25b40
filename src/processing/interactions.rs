//! Interaction tracking hook
//!
//! Views and applications are reported to an external collaborator. Nothing
//! recorded here ever feeds back into scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    View,
    Apply,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionKind::View => write!(f, "view"),
            InteractionKind::Apply => write!(f, "apply"),
        }
    }
}

pub trait InteractionTracker: Send + Sync {
    /// Record one interaction. Returns whether the tracker accepted it.
    fn track(&self, user_id: &str, job_id: &str, kind: InteractionKind) -> bool;
}

/// Tracker that only writes the interaction to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingTracker;

impl InteractionTracker for LoggingTracker {
    fn track(&self, user_id: &str, job_id: &str, kind: InteractionKind) -> bool {
        if user_id.is_empty() || job_id.is_empty() {
            log::debug!("Ignoring {} interaction without user or job id", kind);
            return false;
        }
        log::info!("Interaction: user {} {} job {}", user_id, kind, job_id);
        true
    }
}
