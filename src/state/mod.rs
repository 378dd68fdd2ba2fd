// Pending build request registry
//
// The only state shared between the coordination context (which registers
// requests during dispatch and drains them on completion signals) and the
// rest of the system. A single mutex guards the map; critical sections do no
// I/O.

use indexmap::IndexMap;
use std::sync::Mutex;

/// A dispatched build awaiting its completion signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBuildRequest {
    /// Logical project the build was issued for.
    pub project_name: String,
    /// Human-readable build name used for notification and deployment
    /// classification (e.g. `"Build Editor"`).
    pub display_name: String,
}

/// Thread-safe queue of pending build requests.
///
/// At most one request is pending per project name; re-registering a name
/// overwrites the display name but keeps the original queue position.
/// Completion signals consume the oldest pending entry.
///
/// This is intentionally an at-most-one-in-flight-per-name model rather than
/// per-build-id correlation: if two builds are dispatched before the first
/// completes, the next completion signal pairs with the older entry's
/// display name, which may be the wrong build. See
/// [`take_oldest`](Self::take_oldest).
#[derive(Debug, Default)]
pub struct BuildRequestRegistry {
    // Keyed by lowercased project name; IndexMap preserves insertion order
    // across overwrites, which is exactly the queue contract.
    pending: Mutex<IndexMap<String, PendingBuildRequest>>,
}

impl BuildRequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dispatched build. Must happen before the triggering build
    /// can complete. Empty names are ignored.
    ///
    /// Project names are matched case-insensitively; the last registration
    /// for a name wins.
    pub fn register(&self, project_name: &str, display_name: &str) {
        if project_name.is_empty() || display_name.is_empty() {
            return;
        }

        let request = PendingBuildRequest {
            project_name: project_name.to_string(),
            display_name: display_name.to_string(),
        };

        let mut pending = self.pending.lock().unwrap();
        pending.insert(project_name.to_ascii_lowercase(), request);
    }

    /// Remove and return the request that was inserted first among currently
    /// pending entries, or `None` if the registry is empty.
    ///
    /// Known limitation: with several requests outstanding, the completion
    /// signal is paired with the oldest entry regardless of which build
    /// actually finished.
    pub fn take_oldest(&self) -> Option<PendingBuildRequest> {
        let mut pending = self.pending.lock().unwrap();
        pending.shift_remove_index(0).map(|(_, request)| request)
    }

    /// Discard all pending requests.
    pub fn clear(&self) {
        self.pending.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }
}
