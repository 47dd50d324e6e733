use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Serialize;

/// The stage an invocation was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RequestingCredential,
    Transferring,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::RequestingCredential => "requesting_credential",
            Stage::Transferring => "transferring",
            Stage::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

/// Progress of one upload invocation.
///
/// `Idle -> RequestingCredential -> Transferring -> Persisting -> Done`, with
/// `Failed` reachable from every non-terminal state. `Done` and `Failed` are
/// absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    RequestingCredential,
    Transferring,
    Persisting,
    Done,
    Failed(Stage),
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Done | UploadState::Failed(_))
    }

    pub fn in_flight(&self) -> bool {
        !self.is_terminal() && *self != UploadState::Idle
    }

    pub fn errored(&self) -> bool {
        matches!(self, UploadState::Failed(_))
    }
}

/// Caller-facing view of the coordinator: two flags and nothing more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub in_flight: bool,
    pub errored: bool,
}

/// Aggregate status across all invocations of one coordinator.
#[derive(Debug, Default)]
pub struct UploadStatus {
    active: AtomicUsize,
    errored: AtomicBool,
}

impl UploadStatus {
    pub fn in_flight(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    pub fn errored(&self) -> bool {
        self.errored.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            in_flight: self.in_flight(),
            errored: self.errored(),
        }
    }

    /// Start an invocation. A new attempt clears the previous error.
    pub(crate) fn begin(&self) -> InFlightGuard<'_> {
        self.errored.store(false, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        InFlightGuard { status: self }
    }

    pub(crate) fn mark_errored(&self) {
        self.errored.store(true, Ordering::SeqCst);
    }
}

/// Keeps the in-flight count raised until dropped, including when the
/// caller drops the upload future before it settles.
pub(crate) struct InFlightGuard<'a> {
    status: &'a UploadStatus,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.status.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_flags() {
        assert!(!UploadState::Idle.in_flight());
        assert!(UploadState::RequestingCredential.in_flight());
        assert!(UploadState::Transferring.in_flight());
        assert!(UploadState::Persisting.in_flight());
        assert!(!UploadState::Done.in_flight());
        assert!(!UploadState::Failed(Stage::Transferring).in_flight());

        assert!(UploadState::Failed(Stage::Persisting).errored());
        assert!(!UploadState::Done.errored());
        assert!(UploadState::Done.is_terminal());
    }

    #[test]
    fn test_guard_tracks_overlapping_invocations() {
        let status = UploadStatus::default();
        let first = status.begin();
        let second = status.begin();
        assert!(status.in_flight());

        drop(first);
        assert!(status.in_flight());
        drop(second);
        assert!(!status.in_flight());
    }

    #[test]
    fn test_new_invocation_clears_error() {
        let status = UploadStatus::default();
        {
            let _guard = status.begin();
            status.mark_errored();
        }
        assert!(status.errored());

        let _guard = status.begin();
        assert!(!status.errored());
    }

    #[test]
    fn test_snapshot_wire_names() {
        let snapshot = StatusSnapshot {
            in_flight: true,
            errored: false,
        };
        assert_eq!(
            serde_json::to_value(snapshot).unwrap(),
            serde_json::json!({"inFlight": true, "errored": false})
        );
    }
}
