use std::collections::VecDeque;

use serde::Serialize;

/// Shown for every boundary decode failure; details go to the log only.
pub const GENERIC_ERROR: &str = "Oops! An error has occurred. Check the console for more details.";

pub const MISSING_ACTIVITY_AND_PROPERTY: &str =
    "Please select an activity and a property before generating standards.";
pub const MISSING_ACTIVITY: &str = "Please select an activity before generating standards.";
pub const MISSING_PROPERTY: &str =
    "Please select a property on the map before generating standards.";

/// Handle for one queued error, used by its expiry timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ErrorId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransientError {
    pub id: ErrorId,
    pub message: String,
}

/// FIFO of user-visible errors. Each entry leaves exactly once, when the
/// timer scheduled for its own id fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorQueue {
    entries: VecDeque<TransientError>,
    #[serde(skip)]
    next_id: u64,
}

impl ErrorQueue {
    pub fn push(&mut self, message: impl Into<String>) -> ErrorId {
        let id = ErrorId(self.next_id);
        self.next_id += 1;
        self.entries.push_back(TransientError {
            id,
            message: message.into(),
        });
        id
    }

    /// Remove the entry with `id`. Returns `None` when it already left.
    pub fn expire(&mut self, id: ErrorId) -> Option<TransientError> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries.remove(position)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransientError> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused() {
        let mut queue = ErrorQueue::default();
        let first = queue.push("first");
        assert!(queue.expire(first).is_some());
        let second = queue.push("second");
        assert_ne!(first, second);
        assert!(queue.expire(first).is_none());
        assert_eq!(queue.messages().collect::<Vec<_>>(), vec!["second"]);
    }

    #[test]
    fn expiring_twice_removes_once() {
        let mut queue = ErrorQueue::default();
        let id = queue.push("only");
        queue.push("later");
        assert_eq!(queue.expire(id).map(|entry| entry.message), Some("only".to_string()));
        assert!(queue.expire(id).is_none());
        assert_eq!(queue.len(), 1);
    }
}
